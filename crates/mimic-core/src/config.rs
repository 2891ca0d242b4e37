use std::collections::HashMap;

use mimic_model::{MethodOverride, MimicMode, MissingCallSitePolicy};

/// Settings for one composition run.
///
/// The disambiguation key, when set, is part of every clone name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositionConfig {
    key: Option<String>,
    default_mode: MimicMode,
    overrides: HashMap<String, MethodOverride>,
    missing_call_site: MissingCallSitePolicy,
}

impl CompositionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty key is the same as no key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.key = (!key.is_empty()).then_some(key);
        self
    }

    #[must_use]
    pub fn with_default_mode(mut self, mode: MimicMode) -> Self {
        self.default_mode = mode;
        self
    }

    /// Later overrides for the same method name replace earlier ones.
    #[must_use]
    pub fn with_override(mut self, method_override: MethodOverride) -> Self {
        self.overrides
            .insert(method_override.method.clone(), method_override);
        self
    }

    #[must_use]
    pub fn with_overrides(self, overrides: impl IntoIterator<Item = MethodOverride>) -> Self {
        overrides.into_iter().fold(self, Self::with_override)
    }

    #[must_use]
    pub fn with_missing_call_site(mut self, policy: MissingCallSitePolicy) -> Self {
        self.missing_call_site = policy;
        self
    }

    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    #[must_use]
    pub fn default_mode(&self) -> MimicMode {
        self.default_mode
    }

    #[must_use]
    pub fn missing_call_site(&self) -> MissingCallSitePolicy {
        self.missing_call_site
    }

    /// Mode to use for `method`, and the insertion point configured with it.
    ///
    /// Blank insertion point names count as unset.
    #[must_use]
    pub fn effective_mode(&self, method: &str) -> (MimicMode, Option<&str>) {
        match self.overrides.get(method) {
            Some(o) => (
                o.mode,
                o.insertion_point
                    .as_deref()
                    .map(str::trim)
                    .filter(|name| !name.is_empty()),
            ),
            None => (self.default_mode, None),
        }
    }

    /// `copy_<key>_<member>`, or `copy_<member>` without a key.
    #[must_use]
    pub fn clone_name(&self, member: &str) -> String {
        match &self.key {
            Some(key) => format!("copy_{key}_{member}"),
            None => format!("copy_{member}"),
        }
    }
}
