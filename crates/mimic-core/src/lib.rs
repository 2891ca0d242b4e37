//! Type composition engine.
//!
//! Lets a destination type acquire the full behavior of a source type without
//! extending it: interfaces, fields, constructors and methods of the source are
//! copied into the destination, and members that collide by signature are
//! cloned under a new name and spliced into the destination's own member
//! according to a [`MimicMode`](mimic_model::MimicMode).
//!
//! ```text
//! src:  class Src { int a; Src() {..}  void b() {..}  void c() {..} }
//! dst:  class Dst { void c() {..} }
//!
//! after mimicking:
//!       class Dst {
//!           int a;
//!           Dst() {..}                       // copied
//!           void b() {..}                    // copied
//!           void c() {.. copy_c() ..}        // spliced per mode
//!           void copy_c() {..}               // clone of Src.c
//!       }
//! ```

#![forbid(unsafe_code)]

mod config;
mod copier;
mod creator;
mod error;
mod matcher;
mod report;
mod splice;

pub use crate::config::CompositionConfig;
pub use crate::creator::MimicCreator;
pub use crate::error::{MimicError, Result, TransformError};
pub use crate::report::{CompositionReport, ConstructorOutcome, MethodOutcome};
pub use crate::splice::{Anchor, Spliced, Splicer};
