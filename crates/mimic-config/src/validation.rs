use std::collections::HashSet;

use crate::diagnostics::{ConfigValidationError, ConfigWarning, ValidationDiagnostics};
use crate::{LoggingConfig, MimicConfig, MimicDirective};

impl MimicConfig {
    /// Validate semantic invariants for a configuration.
    ///
    /// Validation is best-effort: it attempts to report as many problems as possible in one pass.
    #[must_use]
    pub fn validate(&self) -> ValidationDiagnostics {
        let mut out = ValidationDiagnostics::default();

        validate_logging(self, &mut out);
        validate_targets(self, &mut out);
        for (idx, directive) in self.mimic.iter().enumerate() {
            validate_directive(&format!("mimic[{idx}]"), directive, &mut out);
        }

        out
    }
}

fn validate_logging(config: &MimicConfig, out: &mut ValidationDiagnostics) {
    let normalized = LoggingConfig::normalize_level_directives(&config.logging.level);
    if !config.logging.level.trim().is_empty()
        && tracing_subscriber::EnvFilter::try_new(normalized.clone()).is_err()
    {
        out.warnings.push(ConfigWarning::LoggingLevelInvalid {
            value: config.logging.level.clone(),
            normalized,
        });
    }
}

fn validate_targets(config: &MimicConfig, out: &mut ValidationDiagnostics) {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for directive in &config.mimic {
        let target = directive.target.as_str();
        if !seen.insert(target) && reported.insert(target) {
            out.errors.push(ConfigValidationError::DuplicateTarget {
                target: target.to_owned(),
            });
        }
    }
}

fn validate_directive(path: &str, directive: &MimicDirective, out: &mut ValidationDiagnostics) {
    for (key, value) in [("target", &directive.target), ("source", &directive.source)] {
        if value.trim().is_empty() {
            out.errors.push(ConfigValidationError::InvalidValue {
                toml_path: format!("{path}.{key}"),
                message: "must name a type".to_owned(),
            });
        }
    }

    if !directive.target.trim().is_empty() && directive.target == directive.source {
        out.errors.push(ConfigValidationError::SelfMimic {
            toml_path: path.to_owned(),
            target: directive.target.clone(),
        });
    }

    if directive.mimic_methods && directive.default_mode.uses_insertion_point() {
        out.errors
            .push(ConfigValidationError::DefaultModeNeedsInsertionPoint {
                toml_path: format!("{path}.default_mode"),
                mode: directive.default_mode,
            });
    }

    let mut seen = HashSet::new();
    for (idx, method) in directive.methods.iter().enumerate() {
        let toml_path = format!("{path}.methods[{idx}]");
        if !seen.insert(method.method.as_str()) {
            out.errors
                .push(ConfigValidationError::DuplicateMethodOverride {
                    toml_path: toml_path.clone(),
                    method: method.method.clone(),
                });
        }

        let insertion_point = method
            .insertion_point
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty());
        match (method.mode.uses_insertion_point(), insertion_point) {
            (true, None) => out.errors.push(ConfigValidationError::MissingInsertionPoint {
                toml_path,
                method: method.method.clone(),
                mode: method.mode,
            }),
            (false, Some(_)) => out.warnings.push(ConfigWarning::InsertionPointIgnored {
                toml_path,
                mode: method.mode,
            }),
            _ => {}
        }
    }
}
