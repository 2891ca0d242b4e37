//! Duplicating source members into the destination.
//!
//! Copies are deep: the destination owns every member it receives and never
//! shares structure with the source.

use mimic_model::{Constructor, Field, Method, TypeDef};

use crate::error::TransformError;

pub fn copy_interface(dst: &mut TypeDef, interface: &str) -> bool {
    dst.interfaces.insert(interface.to_string())
}

pub fn copy_field(dst: &mut TypeDef, field: &Field) {
    dst.fields.push(field.clone());
}

pub fn copy_constructor(dst: &mut TypeDef, ctor: &Constructor) {
    dst.constructors.push(ctor.clone());
}

pub fn copy_method(dst: &mut TypeDef, method: &Method) {
    dst.methods.push(method.clone());
}

/// A renamed, behavior-preserving copy of `method`.
pub fn clone_method(method: &Method, name: String) -> Result<Method, TransformError> {
    let body = method.body.clone().ok_or(TransformError::MissingBody)?;
    Ok(Method {
        name,
        params: method.params.clone(),
        return_type: method.return_type.clone(),
        modifiers: method.modifiers,
        body: Some(body),
    })
}

/// Turns a constructor into a plain `void` method carrying the same body.
pub fn constructor_as_method(ctor: &Constructor, name: String) -> Method {
    Method {
        name,
        params: ctor.params.clone(),
        return_type: None,
        modifiers: ctor.modifiers,
        body: Some(ctor.body.clone()),
    }
}
