//! Contract binder per CONTRACT.md
//!
//! Binds operation identifiers to request/response schemas. A binding is
//! immutable once established (C4): an operation's contract cannot change
//! without a new deployment. Validation and documentation for an
//! operation resolve through the same stored `SchemaRef`, so what is
//! checked at runtime and what is published can never drift.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;

use crate::docgen::{DocDescriptor, DocSynthesizer};
use crate::schema::{ContractError, ContractResult, SchemaRef, SchemaRegistry};
use crate::validate::{ValidationResult, Validator};

/// Request/response schema references declared at bind time.
#[derive(Debug, Clone)]
pub struct OperationShapes {
    /// Request schema, absent for operations without a body
    pub request: Option<SchemaRef>,
    /// Response schema, always present
    pub response: SchemaRef,
}

impl OperationShapes {
    /// Shapes for an operation with a response body only.
    pub fn response_only(response: SchemaRef) -> Self {
        Self {
            request: None,
            response,
        }
    }

    /// Shapes for an operation with both request and response bodies.
    pub fn request_response(request: SchemaRef, response: SchemaRef) -> Self {
        Self {
            request: Some(request),
            response,
        }
    }
}

/// Immutable association of an operation with its schemas.
#[derive(Debug, Clone)]
pub struct ContractBinding {
    operation_id: String,
    request: Option<SchemaRef>,
    response: SchemaRef,
}

impl ContractBinding {
    /// Operation identifier
    pub fn operation_id(&self) -> &str {
        &self.operation_id
    }

    /// Request schema reference, if declared
    pub fn request(&self) -> Option<&SchemaRef> {
        self.request.as_ref()
    }

    /// Response schema reference
    pub fn response(&self) -> &SchemaRef {
        &self.response
    }
}

/// Synthesized documentation for one bound operation.
#[derive(Debug, Clone, serde::Serialize)]
pub struct OperationDoc {
    /// Operation identifier
    pub operation_id: String,
    /// Request documentation, if a request schema is bound
    pub request: Option<DocDescriptor>,
    /// Response documentation
    pub response: DocDescriptor,
}

/// Process-wide binder mapping operation ids to contract bindings.
///
/// Populated during startup, read-only thereafter; binding serializes
/// behind the write lock, lookups take the read lock concurrently.
pub struct ContractBinder {
    registry: Arc<SchemaRegistry>,
    bindings: RwLock<HashMap<String, ContractBinding>>,
}

impl ContractBinder {
    /// Creates a binder over the given schema registry.
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self {
            registry,
            bindings: RwLock::new(HashMap::new()),
        }
    }

    /// The backing schema registry.
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Binds an operation to its request/response schemas.
    ///
    /// Fails with `UnknownSchema` if a declared ref does not resolve, and
    /// `Rebind` if the operation is already bound; the loser of a
    /// concurrent bind race fails rather than overwriting. On any failure
    /// the binder is unchanged.
    pub fn bind(
        &self,
        operation_id: impl Into<String>,
        shapes: OperationShapes,
    ) -> ContractResult<ContractBinding> {
        let operation_id = operation_id.into();

        // Refs must resolve at bind time; a dangling contract is a
        // deployment mistake, not a per-request condition.
        if let Some(request) = &shapes.request {
            self.registry.resolve(request)?;
        }
        self.registry.resolve(&shapes.response)?;

        let binding = ContractBinding {
            operation_id: operation_id.clone(),
            request: shapes.request,
            response: shapes.response,
        };

        let mut bindings = self.bindings.write().expect("binder lock poisoned");
        if bindings.contains_key(&operation_id) {
            return Err(ContractError::Rebind {
                operation: operation_id,
            });
        }

        tracing::info!(
            operation = %operation_id,
            response = %binding.response,
            "operation bound"
        );
        bindings.insert(operation_id, binding.clone());
        Ok(binding)
    }

    /// Looks up the binding for an operation.
    pub fn binding(&self, operation_id: &str) -> ContractResult<ContractBinding> {
        let bindings = self.bindings.read().expect("binder lock poisoned");
        bindings
            .get(operation_id)
            .cloned()
            .ok_or_else(|| ContractError::UnboundOperation {
                operation: operation_id.to_string(),
            })
    }

    /// Validates an inbound request body against the bound request schema.
    ///
    /// A `Rejected` result means the value must not cross the operation
    /// boundary.
    pub fn validate_request(
        &self,
        operation_id: &str,
        value: &Value,
    ) -> ContractResult<ValidationResult> {
        let binding = self.binding(operation_id)?;
        let request = binding
            .request
            .as_ref()
            .ok_or_else(|| ContractError::NoRequestSchema {
                operation: operation_id.to_string(),
            })?;
        let schema = self.registry.resolve(request)?;
        Validator::new(&self.registry).validate(&schema, value)
    }

    /// Validates an outbound response body against the bound response schema.
    pub fn validate_response(
        &self,
        operation_id: &str,
        value: &Value,
    ) -> ContractResult<ValidationResult> {
        let binding = self.binding(operation_id)?;
        let schema = self.registry.resolve(&binding.response)?;
        Validator::new(&self.registry).validate(&schema, value)
    }

    /// Synthesizes documentation for a bound operation.
    ///
    /// Derived from the same refs validation uses; the published contract
    /// and the enforced contract are one artifact.
    pub fn document(&self, operation_id: &str) -> ContractResult<OperationDoc> {
        let binding = self.binding(operation_id)?;
        let synthesizer = DocSynthesizer::new(&self.registry);

        let request = match &binding.request {
            Some(request) => {
                let schema = self.registry.resolve(request)?;
                Some(synthesizer.synthesize(&schema)?)
            }
            None => None,
        };
        let response_schema = self.registry.resolve(&binding.response)?;
        let response = synthesizer.synthesize(&response_schema)?;

        Ok(OperationDoc {
            operation_id: binding.operation_id,
            request,
            response,
        })
    }

    /// Returns every bound operation id, sorted for deterministic output.
    pub fn operation_ids(&self) -> Vec<String> {
        let bindings = self.bindings.read().expect("binder lock poisoned");
        let mut ids: Vec<_> = bindings.keys().cloned().collect();
        ids.sort();
        ids
    }
}
