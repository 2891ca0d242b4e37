//! Collision detection between source and destination members.
//!
//! Methods collide on `(name, parameter types)`, constructors on parameter
//! types, fields on name and interfaces on qualified name. Nothing else
//! (return types, modifiers, parameter names) takes part.

use mimic_model::{Constructor, Field, Method, TypeDef};

/// Index of the destination constructor with the same parameter types.
pub fn colliding_constructor(dst: &TypeDef, ctor: &Constructor) -> Option<usize> {
    let sig = ctor.signature();
    dst.constructors.iter().position(|c| c.signature() == sig)
}

/// Index of the destination method with the same name and parameter types.
pub fn colliding_method(dst: &TypeDef, method: &Method) -> Option<usize> {
    let sig = method.signature();
    dst.methods.iter().position(|m| m.signature() == sig)
}

pub fn colliding_field<'a>(dst: &'a TypeDef, field: &Field) -> Option<&'a Field> {
    dst.field(&field.name)
}

pub fn has_interface(dst: &TypeDef, interface: &str) -> bool {
    dst.has_interface(interface)
}
