//! Reference domains
//!
//! The three namespaces an inline reference can resolve against:
//! - Tags (`key`), read-only
//! - Global variables (`name`), append-only from this subsystem
//! - Functions, read-only, selected by function blocks

mod entity;
pub mod repository;
mod snapshot;

pub use entity::{
    Candidate, FunctionArgument, FunctionDescriptor, ReferenceDomain, Tag, Variable, VariableType,
};
pub use repository::{FunctionRepository, TagRepository, VariableRepository};
pub use snapshot::ReferenceSnapshot;
