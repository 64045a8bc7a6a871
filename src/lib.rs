//! shapebind - a strict, deterministic API contract layer
//!
//! One schema drives both runtime validation and published documentation,
//! so the two can never drift.

pub mod binder;
pub mod docgen;
pub mod schema;
pub mod validate;
