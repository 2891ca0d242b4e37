use mimic_config::ConfigValidationError;
use mimic_core::MimicError;

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("type {name} is not in the type pool")]
    UnknownType { name: String },

    #[error("invalid mimic config: {}", render_errors(.0))]
    Config(Vec<ConfigValidationError>),

    #[error("failed to make {target} mimic {source_type}")]
    Mimic {
        target: String,
        source_type: String,
        #[source]
        source: MimicError,
    },
}

fn render_errors(errors: &[ConfigValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
