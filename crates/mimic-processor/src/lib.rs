//! Applies `mimic.toml` directives to a pool of type definitions.
//!
//! The processor is the glue between configuration and the composition
//! engine: it resolves each directive's source and destination in a
//! [`TypePool`], fills in the destination's inherited-member view from its
//! superclass chain, runs the enabled aspects and stores the result.

#![forbid(unsafe_code)]

mod error;
mod pool;
mod processor;

pub use crate::error::ProcessError;
pub use crate::pool::{MemoryTypePool, TypePool};
pub use crate::processor::{MimicProcessor, ProcessReport, TypeReport};
