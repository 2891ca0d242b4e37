use mimic_model::MimicMode;

pub type Result<T, E = MimicError> = std::result::Result<T, E>;

/// Errors produced while composing one source type into one destination type.
///
/// Any error aborts the composition of that (source, destination) pair.
/// Members copied before the failing step stay copied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MimicError {
    #[error("type {type_name} already has a field named {field}")]
    DuplicateField { type_name: String, field: String },

    #[error("cannot resolve {description} on type {type_name}")]
    MemberNotResolvable {
        type_name: String,
        description: String,
    },

    #[error(
        "no call site to splice into {type_name}.{method} with mode {mode} \
         (expected a call to `{anchor}`)"
    )]
    MissingCallSite {
        type_name: String,
        method: String,
        mode: MimicMode,
        anchor: String,
    },

    #[error("type {type_name} already declares {signature}, cannot add clone")]
    CloneConflict {
        type_name: String,
        signature: String,
    },

    #[error("cannot rewrite {type_name}.{member}: {source}")]
    UnderlyingTransform {
        type_name: String,
        member: String,
        #[source]
        source: TransformError,
    },
}

/// A member body could not be cloned or rewritten.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    #[error("member has no body")]
    MissingBody,
    #[error("a `return` without a value cannot carry the spliced result")]
    ValuelessReturn,
    #[error("mode {mode} needs a call site to anchor on")]
    MissingAnchor { mode: MimicMode },
}
