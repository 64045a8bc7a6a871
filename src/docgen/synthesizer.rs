//! Documentation synthesis per CONTRACT.md
//!
//! A schema's published documentation is derived from its field
//! descriptors and nothing else (C3): no runtime data, no hand edits.
//! Output is a JSON-Schema-compatible object (`type`, `properties`,
//! `required`, `description`, `example`) so third-party renderers consume
//! it unmodified. Synthesis is idempotent; two calls for the same schema
//! version produce byte-identical output, so descriptors can be diffed
//! and cached.

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::schema::{
    Constraint, ContractResult, FieldDescriptor, FieldKind, Schema, SchemaRegistry,
};

/// Derived documentation for one schema version.
///
/// Lifecycle is 1:1 with the source schema version; a new schema version
/// yields a new descriptor, never a mutated one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocDescriptor {
    /// Source schema id
    pub schema_id: String,
    /// Source schema version
    pub schema_version: u32,
    /// JSON-Schema-compatible documentation tree
    pub root: Value,
}

impl DocDescriptor {
    /// Convert to a JSON string (stable across calls for one version)
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.root).expect("DocDescriptor serialization cannot fail")
    }
}

/// Documentation synthesizer backed by a schema registry.
///
/// The registry is consulted only to inline `ref` fields.
pub struct DocSynthesizer<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> DocSynthesizer<'a> {
    /// Creates a synthesizer resolving references through the given registry.
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Synthesizes the documentation descriptor for a schema.
    ///
    /// The `Err` channel carries configuration errors only (an
    /// unresolvable `ref` on a schema that never went through
    /// registration).
    pub fn synthesize(&self, schema: &Schema) -> ContractResult<DocDescriptor> {
        Ok(DocDescriptor {
            schema_id: schema.id.clone(),
            schema_version: schema.version,
            root: Value::Object(self.object_node(schema)?),
        })
    }

    /// Builds the object node for a schema: type, title, version,
    /// properties in field-declaration order, required list.
    fn object_node(&self, schema: &Schema) -> ContractResult<Map<String, Value>> {
        let mut node = Map::new();
        node.insert("type".into(), json!("object"));
        node.insert("title".into(), json!(schema.id));
        node.insert("version".into(), json!(schema.version));
        if let Some(description) = &schema.description {
            node.insert("description".into(), json!(description));
        }

        let mut properties = Map::new();
        let mut required = Vec::new();
        for field in &schema.fields {
            properties.insert(field.name.clone(), self.field_node(field)?);
            if field.required {
                required.push(json!(field.name));
            }
        }
        node.insert("properties".into(), Value::Object(properties));
        node.insert("required".into(), Value::Array(required));

        Ok(node)
    }

    /// Builds the node for one field: kind shape, documentation metadata,
    /// then constraint keys in constraint-declaration order.
    fn field_node(&self, field: &FieldDescriptor) -> ContractResult<Value> {
        let mut node = self.kind_node(&field.kind)?;

        if let Some(description) = &field.docs.description {
            node.insert("description".into(), json!(description));
        }
        if let Some(example) = &field.docs.example {
            node.insert("example".into(), example.clone());
        }
        if let Some(note) = &field.docs.deprecated {
            node.insert("deprecated".into(), json!(true));
            node.insert("deprecationNote".into(), json!(note));
        }

        for constraint in &field.constraints {
            let (key, value) = constraint_entry(constraint);
            node.insert(key.into(), value);
        }

        Ok(Value::Object(node))
    }

    fn kind_node(&self, kind: &FieldKind) -> ContractResult<Map<String, Value>> {
        let mut node = Map::new();
        match kind {
            FieldKind::String => {
                node.insert("type".into(), json!("string"));
            }
            FieldKind::Int => {
                node.insert("type".into(), json!("integer"));
            }
            FieldKind::Bool => {
                node.insert("type".into(), json!("boolean"));
            }
            FieldKind::Float => {
                node.insert("type".into(), json!("number"));
            }
            FieldKind::Enum { allowed } => {
                node.insert("type".into(), json!("string"));
                node.insert("enum".into(), json!(allowed));
            }
            FieldKind::Ref { target } => {
                // Nested schemas are inlined; cycles are unconstructible
                // because registration requires references to resolve
                // against already-registered schemas.
                let schema = self.registry.resolve(target)?;
                node = self.object_node(&schema)?;
            }
            FieldKind::Sequence { element } => {
                node.insert("type".into(), json!("array"));
                node.insert("items".into(), Value::Object(self.kind_node(element)?));
            }
        }
        Ok(node)
    }
}

/// Maps a constraint to its JSON-Schema key and value.
fn constraint_entry(constraint: &Constraint) -> (&'static str, Value) {
    match constraint {
        Constraint::MinLength(n) => ("minLength", json!(n)),
        Constraint::MaxLength(n) => ("maxLength", json!(n)),
        Constraint::Pattern(regex) => ("pattern", json!(regex.as_str())),
        Constraint::Minimum(n) => ("minimum", json!(n)),
        Constraint::Maximum(n) => ("maximum", json!(n)),
        Constraint::MinItems(n) => ("minItems", json!(n)),
        Constraint::MaxItems(n) => ("maxItems", json!(n)),
        Constraint::AllowedValues(values) => ("enum", json!(values)),
    }
}
