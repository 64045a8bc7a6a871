//! Schema subsystem for shapebind
//!
//! Per CONTRACT.md, schemas are first-class artifacts authored once and
//! registered before any traffic flows.
//!
//! # Design Principles
//!
//! - One entry per (id, version), append-only (C1)
//! - Declaration order is contract order: violations and documentation
//!   follow it
//! - References resolve only through the registry
//! - No nulls, no defaults, no implicit coercion

mod errors;
mod registry;
mod types;

pub use errors::{ContractError, ContractResult};
pub use registry::SchemaRegistry;
pub use types::{Constraint, FieldDescriptor, FieldDocs, FieldKind, Schema, SchemaRef};
