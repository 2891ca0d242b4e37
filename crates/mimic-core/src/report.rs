use mimic_model::{ConstructorSignature, MethodSignature, MimicMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstructorOutcome {
    /// No collision: the constructor was added as a new overload.
    Copied(ConstructorSignature),
    /// Collision: the source body became method `clone`, called at the end of
    /// the destination constructor.
    Chained {
        signature: ConstructorSignature,
        clone: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodOutcome {
    /// No collision: the method was added as is.
    Copied(MethodSignature),
    /// Collision: a clone was added and called from `sites` points of the
    /// destination method.
    Spliced {
        signature: MethodSignature,
        clone: String,
        mode: MimicMode,
        sites: usize,
    },
    /// Collision without a call site to splice at; only the clone was added.
    ClonedOnly {
        signature: MethodSignature,
        clone: String,
        mode: MimicMode,
    },
}

impl MethodOutcome {
    #[must_use]
    pub fn signature(&self) -> &MethodSignature {
        match self {
            MethodOutcome::Copied(signature)
            | MethodOutcome::Spliced { signature, .. }
            | MethodOutcome::ClonedOnly { signature, .. } => signature,
        }
    }

    #[must_use]
    pub fn clone_name(&self) -> Option<&str> {
        match self {
            MethodOutcome::Copied(_) => None,
            MethodOutcome::Spliced { clone, .. } | MethodOutcome::ClonedOnly { clone, .. } => {
                Some(clone)
            }
        }
    }
}

/// What one composition did to the destination, aspect by aspect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositionReport {
    /// Interfaces newly added to the destination.
    pub interfaces: Vec<String>,
    /// Fields copied into the destination.
    pub fields: Vec<String>,
    pub constructors: Vec<ConstructorOutcome>,
    pub methods: Vec<MethodOutcome>,
}

impl CompositionReport {
    /// Number of members (of any kind) the destination gained.
    #[must_use]
    pub fn members_added(&self) -> usize {
        self.fields.len() + self.constructors.len() + self.methods.len()
    }
}
