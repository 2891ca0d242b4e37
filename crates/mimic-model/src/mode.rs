use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Where the code of a colliding source method is spliced into the
/// destination method of the same signature.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum MimicMode {
    /// First statement of the destination body.
    AtBeginning,
    /// Right before every return point of the destination body.
    BeforeReturn,
    /// Right before each `super.<method>(..)` call.
    BeforeSuper,
    /// Right after each `super.<method>(..)` call.
    #[default]
    AfterSuper,
    /// In place of each `super.<method>(..)` call.
    ReplaceSuper,
    /// Right before each call to the configured insertion point.
    Before,
    /// Right after each call to the configured insertion point.
    After,
}

impl MimicMode {
    pub const ALL: [MimicMode; 7] = [
        MimicMode::AtBeginning,
        MimicMode::BeforeReturn,
        MimicMode::BeforeSuper,
        MimicMode::AfterSuper,
        MimicMode::ReplaceSuper,
        MimicMode::Before,
        MimicMode::After,
    ];

    /// Modes anchored on a `super` call to the method itself.
    #[must_use]
    pub fn is_super_mode(self) -> bool {
        matches!(
            self,
            MimicMode::BeforeSuper | MimicMode::AfterSuper | MimicMode::ReplaceSuper
        )
    }

    /// Modes anchored on a named insertion point.
    #[must_use]
    pub fn uses_insertion_point(self) -> bool {
        matches!(self, MimicMode::Before | MimicMode::After)
    }

    /// Whether the splice needs at least one matching call site.
    #[must_use]
    pub fn requires_call_site(self) -> bool {
        self.is_super_mode() || self.uses_insertion_point()
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MimicMode::AtBeginning => "at_beginning",
            MimicMode::BeforeReturn => "before_return",
            MimicMode::BeforeSuper => "before_super",
            MimicMode::AfterSuper => "after_super",
            MimicMode::ReplaceSuper => "replace_super",
            MimicMode::Before => "before",
            MimicMode::After => "after",
        }
    }
}

impl fmt::Display for MimicMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do when an anchored mode finds no call site to splice around.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum MissingCallSitePolicy {
    /// Abort the composition with an error.
    #[default]
    Fail,
    /// Keep the clone, leave the destination body untouched and log a warning.
    Skip,
}

/// Per-method override of the default [`MimicMode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct MethodOverride {
    /// Name of the source method this override applies to (all overloads).
    #[serde(rename = "name")]
    pub method: String,
    #[serde(default)]
    pub mode: MimicMode,
    /// Anchor method for `before` / `after`.
    #[serde(default)]
    pub insertion_point: Option<String>,
}

impl MethodOverride {
    pub fn new(method: impl Into<String>, mode: MimicMode) -> Self {
        Self {
            method: method.into(),
            mode,
            insertion_point: None,
        }
    }

    #[must_use]
    pub fn with_insertion_point(mut self, name: impl Into<String>) -> Self {
        self.insertion_point = Some(name.into());
        self
    }
}
