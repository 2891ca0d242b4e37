use std::fmt;

use mimic_model::MimicMode;
use serde::de::DeserializeOwned;

/// Combined diagnostics produced while loading and validating a mimic config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDiagnostics {
    /// Keys present in the input TOML that the schema does not know, as
    /// dotted paths (`mimic[0].methods[1].insertion`).
    pub unknown_keys: Vec<String>,
    pub warnings: Vec<ConfigWarning>,
    /// The config is internally inconsistent; running it would fail or
    /// silently do something else than asked.
    pub errors: Vec<ConfigValidationError>,
}

impl ConfigDiagnostics {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.unknown_keys.is_empty() && self.warnings.is_empty() && self.errors.is_empty()
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn extend_validation(&mut self, validation: ValidationDiagnostics) {
        self.warnings.extend(validation.warnings);
        self.errors.extend(validation.errors);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationDiagnostics {
    pub warnings: Vec<ConfigWarning>,
    pub errors: Vec<ConfigValidationError>,
}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// `insertion_point` is set for a mode that does not use one.
    InsertionPointIgnored {
        toml_path: String,
        mode: MimicMode,
    },
    LoggingLevelInvalid {
        value: String,
        normalized: String,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigWarning::InsertionPointIgnored { toml_path, mode } => {
                write!(f, "{toml_path}: insertion point is ignored by mode {mode}")
            }
            ConfigWarning::LoggingLevelInvalid { value, normalized } => write!(
                f,
                "logging.level: `{value}` (normalized to `{normalized}`) is not a valid filter"
            ),
        }
    }
}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// Two directives name the same destination type.
    DuplicateTarget { target: String },
    /// A type cannot mimic itself.
    SelfMimic { toml_path: String, target: String },
    /// Two overrides in one directive name the same method.
    DuplicateMethodOverride { toml_path: String, method: String },
    /// `before` / `after` override without an insertion point.
    MissingInsertionPoint {
        toml_path: String,
        method: String,
        mode: MimicMode,
    },
    /// The directive uses `before` / `after` as its default mode, which needs a
    /// per-method insertion point.
    DefaultModeNeedsInsertionPoint { toml_path: String, mode: MimicMode },
    InvalidValue { toml_path: String, message: String },
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValidationError::DuplicateTarget { target } => {
                write!(f, "more than one [[mimic]] entry targets {target}")
            }
            ConfigValidationError::SelfMimic { toml_path, target } => {
                write!(f, "{toml_path}: {target} cannot mimic itself")
            }
            ConfigValidationError::DuplicateMethodOverride { toml_path, method } => {
                write!(f, "{toml_path}: method `{method}` is configured more than once")
            }
            ConfigValidationError::MissingInsertionPoint {
                toml_path,
                method,
                mode,
            } => write!(
                f,
                "{toml_path}: method `{method}` uses mode {mode} but has no insertion point"
            ),
            ConfigValidationError::DefaultModeNeedsInsertionPoint { toml_path, mode } => write!(
                f,
                "{toml_path}: default mode {mode} needs an insertion point, set it per method"
            ),
            ConfigValidationError::InvalidValue { toml_path, message } => {
                write!(f, "{toml_path}: {message}")
            }
        }
    }
}

pub(crate) fn deserialize_toml_with_unknown_keys<T: DeserializeOwned>(
    text: &str,
) -> Result<(T, Vec<String>), toml::de::Error> {
    let mut unknown = Vec::<String>::new();
    let deserializer = toml::de::Deserializer::new(text);
    let value = serde_ignored::deserialize(deserializer, |path| {
        unknown.push(normalize_serde_ignored_path(path));
    })?;
    unknown.sort();
    unknown.dedup();
    Ok((value, unknown))
}

/// `serde_ignored` renders `.mimic.0.typo`; TOML users expect `mimic[0].typo`.
fn normalize_serde_ignored_path(path: serde_ignored::Path) -> String {
    let raw = path.to_string();
    let raw = raw.trim_start_matches('.');

    raw.split('.')
        .enumerate()
        .fold(String::new(), |mut out, (idx, segment)| {
            let is_index =
                idx > 0 && !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit());
            if is_index {
                out.push('[');
                out.push_str(segment);
                out.push(']');
                return out;
            }
            if !out.is_empty() {
                out.push('.');
            }
            out.push_str(segment);
            out
        })
}
