//! In-memory representation of the types mimic composes.
//!
//! A [`TypeDef`] is an owned tree: ordered fields, constructors and methods,
//! a set of implemented interfaces, and a read-only view of inherited members.
//! Member bodies are small statement/expression trees ([`Body`]) that are rich
//! enough to find call sites and return points and splice new calls in.

#![forbid(unsafe_code)]

mod body;
mod class;
mod mode;
mod signature;
mod types;

pub use crate::body::{
    AssignOp, BinaryOp, Body, CallExpr, Dispatch, Expr, Literal, Place, Stmt,
};
pub use crate::class::{
    Constructor, Field, InheritedMembers, Method, MethodHeader, MethodOrigin, Param, TypeDef,
};
pub use crate::mode::{MethodOverride, MimicMode, MissingCallSitePolicy};
pub use crate::signature::{ConstructorSignature, MethodSignature};
pub use crate::types::{Modifiers, PrimitiveType, TypeRef};
