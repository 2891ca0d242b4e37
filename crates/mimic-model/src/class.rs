use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::{Body, ConstructorSignature, Expr, MethodSignature, Modifiers, TypeRef};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub ty: TypeRef,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub initializer: Option<Expr>,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            modifiers: Modifiers::NONE,
            initializer: None,
        }
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub fn with_initializer(mut self, initializer: Expr) -> Self {
        self.initializer = Some(initializer);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub ty: TypeRef,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

fn param_types(params: &[Param]) -> Vec<TypeRef> {
    params.iter().map(|p| p.ty.clone()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constructor {
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub body: Body,
}

impl Constructor {
    pub fn new(params: Vec<Param>, body: impl Into<Body>) -> Self {
        Self {
            params,
            modifiers: Modifiers::PUBLIC,
            body: body.into(),
        }
    }

    #[must_use]
    pub fn signature(&self) -> ConstructorSignature {
        ConstructorSignature::new(param_types(&self.params))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    #[serde(default)]
    pub params: Vec<Param>,
    /// `None` for `void`.
    #[serde(default)]
    pub return_type: Option<TypeRef>,
    #[serde(default)]
    pub modifiers: Modifiers,
    /// `None` for abstract/native methods.
    #[serde(default)]
    pub body: Option<Body>,
}

impl Method {
    pub fn new(
        name: impl Into<String>,
        params: Vec<Param>,
        return_type: Option<TypeRef>,
        body: impl Into<Body>,
    ) -> Self {
        Self {
            name: name.into(),
            params,
            return_type,
            modifiers: Modifiers::PUBLIC,
            body: Some(body.into()),
        }
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub fn signature(&self) -> MethodSignature {
        MethodSignature::new(self.name.clone(), param_types(&self.params))
    }

    #[must_use]
    pub fn header(&self) -> MethodHeader {
        MethodHeader {
            name: self.name.clone(),
            params: param_types(&self.params),
            return_type: self.return_type.clone(),
            modifiers: self.modifiers,
        }
    }

    #[must_use]
    pub fn returns_value(&self) -> bool {
        self.return_type.is_some()
    }
}

/// Body-less view of a method, used for inherited members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodHeader {
    pub name: String,
    #[serde(default)]
    pub params: Vec<TypeRef>,
    #[serde(default)]
    pub return_type: Option<TypeRef>,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl MethodHeader {
    #[must_use]
    pub fn signature(&self) -> MethodSignature {
        MethodSignature::new(self.name.clone(), self.params.clone())
    }
}

/// Read-only view of the members a type inherits from its ancestors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InheritedMembers {
    #[serde(default)]
    pub methods: Vec<MethodHeader>,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl InheritedMembers {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty() && self.fields.is_empty()
    }
}

/// Where a method name was found by [`TypeDef::resolve_method_name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodOrigin {
    Declared,
    Inherited,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDef {
    /// Qualified (dotted) name.
    pub name: String,
    #[serde(default)]
    pub superclass: Option<String>,
    #[serde(default)]
    pub interfaces: IndexSet<String>,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub constructors: Vec<Constructor>,
    #[serde(default)]
    pub methods: Vec<Method>,
    #[serde(default, skip_serializing_if = "InheritedMembers::is_empty")]
    pub inherited: InheritedMembers,
}

impl TypeDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            superclass: None,
            interfaces: IndexSet::new(),
            fields: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
            inherited: InheritedMembers::default(),
        }
    }

    /// The unqualified name, e.g. `Foo` for `com.example.Foo`.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    #[must_use]
    pub fn has_interface(&self, name: &str) -> bool {
        self.interfaces.contains(name)
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    #[must_use]
    pub fn method(&self, sig: &MethodSignature) -> Option<&Method> {
        self.methods.iter().find(|m| &m.signature() == sig)
    }

    pub fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Method> + 'a {
        self.methods.iter().filter(move |m| m.name == name)
    }

    /// Looks a method name up among declared methods first, then inherited ones.
    #[must_use]
    pub fn resolve_method_name(&self, name: &str) -> Option<MethodOrigin> {
        if self.methods.iter().any(|m| m.name == name) {
            return Some(MethodOrigin::Declared);
        }
        if self.inherited.methods.iter().any(|m| m.name == name) {
            return Some(MethodOrigin::Inherited);
        }
        None
    }
}
