//! Declarative configuration for mimic runs (`mimic.toml`).
//!
//! A config lists one `[[mimic]]` directive per destination type, naming the
//! source type it should mimic and how colliding methods are spliced. It also
//! carries the `[logging]` table used by [`init_tracing`].

use std::path::Path;
use std::sync::OnceLock;

use mimic_core::CompositionConfig;
use mimic_model::{MethodOverride, MimicMode, MissingCallSitePolicy};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod diagnostics;
mod logging;
mod schema;
mod validation;

pub use diagnostics::{
    ConfigDiagnostics, ConfigValidationError, ConfigWarning, ValidationDiagnostics,
};
pub use logging::{init_tracing, LoggingConfig};
pub use schema::json_schema;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct MimicConfig {
    /// Logging settings for the mimic crates.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// One entry per destination type.
    #[serde(default)]
    pub mimic: Vec<MimicDirective>,
}

/// Makes `target` mimic `source`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct MimicDirective {
    /// Qualified name of the destination type.
    pub target: String,

    /// Qualified name of the type whose members are copied.
    pub source: String,

    /// Disambiguation key threaded into clone names (`copy_<key>_<member>`).
    #[serde(default)]
    pub key: Option<String>,

    /// Mode for colliding methods without a `[[mimic.methods]]` entry.
    #[serde(default)]
    pub default_mode: MimicMode,

    #[serde(default = "default_true")]
    pub mimic_interfaces: bool,

    #[serde(default = "default_true")]
    pub mimic_fields: bool,

    #[serde(default = "default_true")]
    pub mimic_constructors: bool,

    #[serde(default = "default_true")]
    pub mimic_methods: bool,

    /// What to do when a call-site mode finds nothing to splice around.
    #[serde(default)]
    pub missing_call_site: MissingCallSitePolicy,

    /// Per-method mode overrides.
    #[serde(default)]
    pub methods: Vec<MethodOverride>,
}

fn default_true() -> bool {
    true
}

impl MimicDirective {
    pub fn new(target: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            source: source.into(),
            key: None,
            default_mode: MimicMode::default(),
            mimic_interfaces: true,
            mimic_fields: true,
            mimic_constructors: true,
            mimic_methods: true,
            missing_call_site: MissingCallSitePolicy::default(),
            methods: Vec::new(),
        }
    }

    /// Engine settings for this directive.
    #[must_use]
    pub fn composition_config(&self) -> CompositionConfig {
        let config = CompositionConfig::new()
            .with_default_mode(self.default_mode)
            .with_missing_call_site(self.missing_call_site)
            .with_overrides(self.methods.iter().cloned());
        match &self.key {
            Some(key) => config.with_key(key.clone()),
            None => config,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

fn sanitize_toml_error_message(message: &str) -> String {
    // Parse errors can quote user-provided values, e.g.
    // `invalid type: string "x", expected a boolean`.
    static QUOTED_STRING_RE: OnceLock<Option<regex::Regex>> = OnceLock::new();
    static BACKTICKED_VALUE_RE: OnceLock<Option<regex::Regex>> = OnceLock::new();

    let quoted = QUOTED_STRING_RE
        .get_or_init(|| regex::Regex::new(r#""(?:\\.|[^"\\])*"|'(?:\\.|[^'\\])*'"#).ok());
    let mut out = match quoted {
        Some(re) => re.replace_all(message, r#""<redacted>""#).into_owned(),
        None => message.to_owned(),
    };

    // `unknown field `x``, `unknown variant `x`` and `invalid value: .. `x``
    // carry user input in backticks; `missing field `x`` names schema keys only.
    let user_backticks = out.starts_with("unknown field")
        || out.starts_with("unknown variant")
        || out.starts_with("invalid type:")
        || out.starts_with("invalid value:");
    if user_backticks {
        let boundary = out.find(", expected").unwrap_or(out.len());
        let backticked = BACKTICKED_VALUE_RE.get_or_init(|| regex::Regex::new(r"`[^`]*`").ok());
        if let Some(re) = backticked {
            let head = re.replace(&out[..boundary], "`<redacted>`").into_owned();
            out = format!("{head}{}", &out[boundary..]);
        }
    }

    out
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // `Display` includes a snippet of the input; keep only the message.
        ConfigError::Toml(sanitize_toml_error_message(err.message()))
    }
}

impl MimicConfig {
    /// Load a config file from TOML.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = read_config(path.as_ref())?;
        Self::load_from_str(&text)
    }

    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        let config: MimicConfig = toml::from_str(text)?;
        tracing::debug!(
            target: "mimic.config",
            directives = config.mimic.len(),
            "loaded config"
        );
        Ok(config)
    }

    /// Load a config file and report unknown keys and validation failures.
    pub fn load_from_path_with_diagnostics(
        path: impl AsRef<Path>,
    ) -> Result<(Self, ConfigDiagnostics), ConfigError> {
        let text = read_config(path.as_ref())?;
        Self::load_from_str_with_diagnostics(&text)
    }

    pub fn load_from_str_with_diagnostics(
        text: &str,
    ) -> Result<(Self, ConfigDiagnostics), ConfigError> {
        let (config, unknown_keys) =
            diagnostics::deserialize_toml_with_unknown_keys::<MimicConfig>(text)?;

        let mut diagnostics = ConfigDiagnostics {
            unknown_keys,
            ..ConfigDiagnostics::default()
        };
        diagnostics.extend_validation(config.validate());

        for key in &diagnostics.unknown_keys {
            tracing::warn!(target: "mimic.config", %key, "unknown config key");
        }
        Ok((config, diagnostics))
    }

    /// The directive targeting `target`, if any.
    #[must_use]
    pub fn directive_for(&self, target: &str) -> Option<&MimicDirective> {
        self.mimic.iter().find(|d| d.target == target)
    }
}

fn read_config(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })
}
