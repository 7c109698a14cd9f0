//! Common vocabulary shared across the graphmatch workspace.
//!
//! This crate provides the property value model, the graph store
//! collaborator trait, an in-memory store, and the search configuration.

mod config;
mod error;
mod memory;
mod store;
mod value;

pub use crate::config::*;
pub use crate::error::*;
pub use crate::memory::*;
pub use crate::store::*;
pub use crate::value::*;
