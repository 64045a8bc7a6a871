//! Contract error types following ERRORS.md
//!
//! Error codes:
//! - CONTRACT_DUPLICATE_SCHEMA (FATAL)
//! - CONTRACT_UNKNOWN_SCHEMA (FATAL)
//! - CONTRACT_INVALID_SCHEMA (FATAL)
//! - CONTRACT_REBIND (FATAL)
//! - CONTRACT_UNBOUND_OPERATION (FATAL)
//! - CONTRACT_NO_REQUEST_SCHEMA (FATAL)
//!
//! Every variant is a configuration-time error: it signals that the wiring
//! of schemas and operations is internally inconsistent and must be fixed
//! at the source, not caught and retried. A value failing validation is
//! never an error; it is a `Rejected` result carried as data.

use thiserror::Error;

use super::types::SchemaRef;

/// Configuration-time contract errors.
#[derive(Debug, Clone, Error)]
pub enum ContractError {
    /// A schema with this `(id, version)` is already registered (C1)
    #[error("schema {schema_ref} is already registered")]
    DuplicateSchema {
        /// The colliding reference
        schema_ref: SchemaRef,
    },

    /// No schema registered under this `(id, version)`
    #[error("schema {schema_ref} is not registered")]
    UnknownSchema {
        /// The unresolvable reference
        schema_ref: SchemaRef,
    },

    /// Schema failed its structural self-checks at registration
    #[error("schema '{id}' is structurally invalid: {reason}")]
    InvalidSchema {
        /// Offending schema id
        id: String,
        /// What the structural check found
        reason: String,
    },

    /// Operation is already bound; bindings are immutable (C4)
    #[error("operation '{operation}' is already bound")]
    Rebind {
        /// Operation identifier
        operation: String,
    },

    /// Operation was never bound
    #[error("operation '{operation}' is not bound")]
    UnboundOperation {
        /// Operation identifier
        operation: String,
    },

    /// Operation was bound without a request schema
    #[error("operation '{operation}' declares no request schema")]
    NoRequestSchema {
        /// Operation identifier
        operation: String,
    },
}

impl ContractError {
    /// Returns the stable string code as defined in ERRORS.md
    pub fn code(&self) -> &'static str {
        match self {
            ContractError::DuplicateSchema { .. } => "CONTRACT_DUPLICATE_SCHEMA",
            ContractError::UnknownSchema { .. } => "CONTRACT_UNKNOWN_SCHEMA",
            ContractError::InvalidSchema { .. } => "CONTRACT_INVALID_SCHEMA",
            ContractError::Rebind { .. } => "CONTRACT_REBIND",
            ContractError::UnboundOperation { .. } => "CONTRACT_UNBOUND_OPERATION",
            ContractError::NoRequestSchema { .. } => "CONTRACT_NO_REQUEST_SCHEMA",
        }
    }
}

/// Result type for contract operations
pub type ContractResult<T> = Result<T, ContractError>;
