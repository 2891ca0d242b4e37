use std::fmt;

use crate::TypeRef;

fn write_param_descriptor(params: &[TypeRef], out: &mut String) {
    out.push('(');
    for param in params {
        param.write_descriptor(out);
    }
    out.push(')');
}

/// Structural identity of a constructor: its ordered parameter types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConstructorSignature {
    pub params: Vec<TypeRef>,
}

impl ConstructorSignature {
    pub fn new(params: Vec<TypeRef>) -> Self {
        Self { params }
    }

    #[must_use]
    pub fn descriptor(&self) -> String {
        let mut out = String::new();
        write_param_descriptor(&self.params, &mut out);
        out
    }
}

impl fmt::Display for ConstructorSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<init>{}", self.descriptor())
    }
}

/// Structural identity of a method: name plus ordered parameter types.
///
/// The return type is not part of the signature: two methods
/// that differ only in return type collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSignature {
    pub name: String,
    pub params: Vec<TypeRef>,
}

impl MethodSignature {
    pub fn new(name: impl Into<String>, params: Vec<TypeRef>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    #[must_use]
    pub fn descriptor(&self) -> String {
        let mut out = String::new();
        write_param_descriptor(&self.params, &mut out);
        out
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.descriptor())
    }
}
