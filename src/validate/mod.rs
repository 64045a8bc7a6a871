//! Validation engine for shapebind
//!
//! Pure, deterministic conformance checking of raw values against
//! registered schemas (C2). Rejection is a value, never an error: every
//! violation found in a call is reported with a dotted field path and a
//! human-readable reason.

mod engine;
mod report;

pub use engine::{ValidationResult, Validator, Violation, ViolationCode};
pub use report::RejectionBody;
