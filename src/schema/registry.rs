//! Append-only schema registry.
//!
//! Per CONTRACT.md §registry:
//! - One entry per `(id, version)`, registered at most once (C1)
//! - No deletion, no in-place edit; a changed shape is a new version
//! - Populate during startup, read-only thereafter
//!
//! The registry is an explicit object, not a process singleton, so tests
//! construct isolated registries. Share one via `Arc` across request
//! handlers; registration serializes behind the write lock, steady-state
//! resolution takes the read lock concurrently.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::errors::{ContractError, ContractResult};
use super::types::{Schema, SchemaRef};

/// In-memory registry mapping `(id, version)` to registered schemas.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: RwLock<HashMap<(String, u32), Arc<Schema>>>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a schema, returning its reference.
    ///
    /// Fails with `InvalidSchema` if the schema's structural self-checks
    /// fail, `UnknownSchema` if any referenced schema is not already
    /// registered, and `DuplicateSchema` if `(id, version)` exists. On any
    /// failure the registry is unchanged. Requiring references to resolve
    /// against already-registered schemas makes reference cycles
    /// unconstructible.
    pub fn register(&self, schema: Schema) -> ContractResult<SchemaRef> {
        schema
            .validate_structure()
            .map_err(|reason| ContractError::InvalidSchema {
                id: schema.id.clone(),
                reason,
            })?;

        let schema_ref = schema.schema_ref();
        let mut schemas = self.schemas.write().expect("registry lock poisoned");

        for target in schema.references() {
            if !schemas.contains_key(&(target.id.clone(), target.version)) {
                return Err(ContractError::UnknownSchema {
                    schema_ref: target.clone(),
                });
            }
        }

        let key = (schema.id.clone(), schema.version);
        if schemas.contains_key(&key) {
            return Err(ContractError::DuplicateSchema { schema_ref });
        }

        tracing::info!(schema = %schema_ref, fields = schema.fields.len(), "schema registered");
        schemas.insert(key, Arc::new(schema));
        Ok(schema_ref)
    }

    /// Resolves a reference to its registered schema.
    pub fn resolve(&self, schema_ref: &SchemaRef) -> ContractResult<Arc<Schema>> {
        let schemas = self.schemas.read().expect("registry lock poisoned");
        schemas
            .get(&(schema_ref.id.clone(), schema_ref.version))
            .cloned()
            .ok_or_else(|| ContractError::UnknownSchema {
                schema_ref: schema_ref.clone(),
            })
    }

    /// Checks whether `(id, version)` is registered.
    pub fn exists(&self, id: &str, version: u32) -> bool {
        let schemas = self.schemas.read().expect("registry lock poisoned");
        schemas.contains_key(&(id.to_string(), version))
    }

    /// Checks whether any version of `id` is registered.
    pub fn id_exists(&self, id: &str) -> bool {
        let schemas = self.schemas.read().expect("registry lock poisoned");
        schemas.keys().any(|(schema_id, _)| schema_id == id)
    }

    /// Returns the highest registered version of `id`, if any.
    pub fn latest_version(&self, id: &str) -> Option<u32> {
        let schemas = self.schemas.read().expect("registry lock poisoned");
        schemas
            .keys()
            .filter(|(schema_id, _)| schema_id == id)
            .map(|(_, version)| *version)
            .max()
    }

    /// Returns the number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.read().expect("registry lock poisoned").len()
    }

    /// Returns whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::{FieldDescriptor, FieldKind};

    fn sample_schema() -> Schema {
        Schema::new(
            "user",
            1,
            vec![
                FieldDescriptor::required("name", FieldKind::String),
                FieldDescriptor::optional("age", FieldKind::Int),
            ],
        )
    }

    #[test]
    fn test_register_and_resolve() {
        let registry = SchemaRegistry::new();
        let schema_ref = registry.register(sample_schema()).unwrap();

        let schema = registry.resolve(&schema_ref).unwrap();
        assert_eq!(schema.id, "user");
        assert_eq!(schema.version, 1);
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let registry = SchemaRegistry::new();
        registry.register(sample_schema()).unwrap();

        let result = registry.register(sample_schema());
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().code(), "CONTRACT_DUPLICATE_SCHEMA");
        // Failed call leaves the registry unchanged
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_new_version_is_a_new_entry() {
        let registry = SchemaRegistry::new();
        registry.register(sample_schema()).unwrap();

        let mut v2 = sample_schema();
        v2.version = 2;
        registry.register(v2).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.latest_version("user"), Some(2));
    }

    #[test]
    fn test_unknown_ref_rejected() {
        let registry = SchemaRegistry::new();
        let result = registry.resolve(&SchemaRef::new("nope", 1));
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().code(), "CONTRACT_UNKNOWN_SCHEMA");
    }

    #[test]
    fn test_invalid_schema_rejected() {
        let registry = SchemaRegistry::new();
        let result = registry.register(Schema::new("empty", 1, vec![]));
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().code(), "CONTRACT_INVALID_SCHEMA");
        assert!(registry.is_empty());
    }

    #[test]
    fn test_dangling_reference_rejected_at_registration() {
        let registry = SchemaRegistry::new();
        let schema = Schema::new(
            "order",
            1,
            vec![FieldDescriptor::required(
                "customer",
                FieldKind::reference(SchemaRef::new("customer", 1)),
            )],
        );

        let result = registry.register(schema);
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().code(), "CONTRACT_UNKNOWN_SCHEMA");
        assert!(registry.is_empty());
    }

    #[test]
    fn test_reference_to_registered_schema_accepted() {
        let registry = SchemaRegistry::new();
        registry
            .register(Schema::new(
                "customer",
                1,
                vec![FieldDescriptor::required("name", FieldKind::String)],
            ))
            .unwrap();

        let order = Schema::new(
            "order",
            1,
            vec![FieldDescriptor::required(
                "customer",
                FieldKind::reference(SchemaRef::new("customer", 1)),
            )],
        );
        assert!(registry.register(order).is_ok());
    }

    #[test]
    fn test_id_exists_across_versions() {
        let registry = SchemaRegistry::new();
        registry.register(sample_schema()).unwrap();

        assert!(registry.id_exists("user"));
        assert!(!registry.id_exists("ghost"));
        assert!(registry.exists("user", 1));
        assert!(!registry.exists("user", 2));
    }

    #[test]
    fn test_concurrent_registration_single_winner() {
        use std::sync::Arc;
        use std::thread;

        let registry = Arc::new(SchemaRegistry::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let registry = Arc::clone(&registry);
            handles.push(thread::spawn(move || registry.register(sample_schema())));
        }

        let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let winners = outcomes.iter().filter(|r| r.is_ok()).count();
        assert_eq!(winners, 1);
        assert_eq!(registry.len(), 1);
    }
}
