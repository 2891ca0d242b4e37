//! Utilities shared by mimic tests.
//!
//! [`fixtures`] builds small types and bodies without the struct-literal
//! noise; [`Interpreter`] runs them so tests can assert on behavior after a
//! composition rather than on tree shape alone.

pub mod fixtures;
pub mod interpreter;

pub use interpreter::{Instance, Interpreter, Value};
