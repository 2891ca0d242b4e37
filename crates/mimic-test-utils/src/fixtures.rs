//! Terse builders for test types and bodies.

use mimic_model::{
    AssignOp, BinaryOp, Body, CallExpr, Constructor, Expr, Field, Method, MethodHeader, Modifiers,
    Param, Stmt, TypeDef, TypeRef,
};

/// Fluent builder over [`TypeDef`].
#[derive(Debug, Clone)]
pub struct TypeBuilder {
    ty: TypeDef,
}

impl TypeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            ty: TypeDef::new(name),
        }
    }

    #[must_use]
    pub fn extends(mut self, superclass: impl Into<String>) -> Self {
        self.ty.superclass = Some(superclass.into());
        self
    }

    #[must_use]
    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.ty.interfaces.insert(interface.into());
        self
    }

    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.ty.fields.push(field);
        self
    }

    #[must_use]
    pub fn constructor(mut self, ctor: Constructor) -> Self {
        self.ty.constructors.push(ctor);
        self
    }

    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.ty.methods.push(method);
        self
    }

    /// Records `header` as visible through inheritance.
    #[must_use]
    pub fn inherits(mut self, header: MethodHeader) -> Self {
        self.ty.inherited.methods.push(header);
        self
    }

    #[must_use]
    pub fn build(self) -> TypeDef {
        self.ty
    }
}

pub fn int_field(name: &str) -> Field {
    Field::new(name, TypeRef::INT).with_modifiers(Modifiers::PRIVATE)
}

pub fn bool_field(name: &str) -> Field {
    Field::new(name, TypeRef::BOOLEAN).with_modifiers(Modifiers::PRIVATE)
}

pub fn void_method(name: &str, stmts: Vec<Stmt>) -> Method {
    Method::new(name, vec![], None, stmts)
}

pub fn value_method(name: &str, ret_ty: TypeRef, stmts: Vec<Stmt>) -> Method {
    Method::new(name, vec![], Some(ret_ty), stmts)
}

/// Bodyless `abstract` method.
pub fn abstract_method(name: &str, params: Vec<Param>, ret_ty: Option<TypeRef>) -> Method {
    let mut method = Method::new(name, params, ret_ty, Body::default())
        .with_modifiers(Modifiers::PUBLIC | Modifiers::ABSTRACT);
    method.body = None;
    method
}

pub fn void_header(name: &str) -> MethodHeader {
    MethodHeader {
        name: name.to_string(),
        params: vec![],
        return_type: None,
        modifiers: Modifiers::PUBLIC,
    }
}

/// `this.<name> = value;`
pub fn set_field(name: &str, value: i64) -> Stmt {
    Stmt::Expr(Expr::assign_field(name, AssignOp::Assign, Expr::int(value)))
}

/// `this.<name> += value;`
pub fn add_field(name: &str, value: i64) -> Stmt {
    Stmt::Expr(Expr::assign_field(name, AssignOp::Add, Expr::int(value)))
}

/// `this.<name> *= value;`
pub fn mul_field(name: &str, value: i64) -> Stmt {
    Stmt::Expr(Expr::assign_field(name, AssignOp::Mul, Expr::int(value)))
}

/// `super.<name>()`
pub fn super_call(name: &str) -> Expr {
    CallExpr::super_(name, vec![]).into()
}

/// `super.<name>();`
pub fn super_stmt(name: &str) -> Stmt {
    Stmt::Expr(super_call(name))
}

/// `this.<name>()`
pub fn call(name: &str) -> Expr {
    CallExpr::this(name, vec![]).into()
}

/// `this.<name>();`
pub fn call_stmt(name: &str) -> Stmt {
    Stmt::Expr(call(name))
}

pub fn ret(value: Expr) -> Stmt {
    Stmt::Return(Some(value))
}

/// `this.<name> == value`
pub fn field_eq(name: &str, value: i64) -> Expr {
    Expr::binary(BinaryOp::Eq, Expr::field(name), Expr::int(value))
}
