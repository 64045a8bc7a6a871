//! Schema type definitions per CONTRACT.md
//!
//! Supported field kinds:
//! - string: UTF-8 string
//! - int: 64-bit signed integer
//! - bool: Boolean
//! - float: 64-bit floating point (accepts integral JSON numbers)
//! - enum: closed set of string values
//! - ref: reference to another registered schema
//! - sequence: homogeneous array with a single element kind

use regex::Regex;
use serde_json::Value;

/// Reference to a registered schema: `(id, version)`.
///
/// A `SchemaRef` is the only way schemas name each other; resolution always
/// goes through the registry, never through an embedded copy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaRef {
    /// Schema identifier
    pub id: String,
    /// Schema version (monotonically increasing, starts at 1)
    pub version: u32,
}

impl SchemaRef {
    /// Create a reference to schema `id` at `version`.
    pub fn new(id: impl Into<String>, version: u32) -> Self {
        Self {
            id: id.into(),
            version,
        }
    }
}

impl std::fmt::Display for SchemaRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@v{}", self.id, self.version)
    }
}

/// Supported field kinds as defined in CONTRACT.md
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// UTF-8 string
    String,
    /// 64-bit signed integer
    Int,
    /// Boolean
    Bool,
    /// 64-bit floating point
    Float,
    /// Closed set of allowed string values
    Enum {
        /// Allowed values, in declaration order
        allowed: Vec<String>,
    },
    /// Reference to another registered schema
    Ref {
        /// Target schema reference
        target: SchemaRef,
    },
    /// Homogeneous sequence with a single element kind
    Sequence {
        /// Element kind (boxed to allow recursive kinds)
        element: Box<FieldKind>,
    },
}

impl FieldKind {
    /// Returns the kind name for error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Int => "int",
            FieldKind::Bool => "bool",
            FieldKind::Float => "float",
            FieldKind::Enum { .. } => "enum",
            FieldKind::Ref { .. } => "object",
            FieldKind::Sequence { .. } => "sequence",
        }
    }

    /// Sequence of the given element kind.
    pub fn sequence_of(element: FieldKind) -> Self {
        FieldKind::Sequence {
            element: Box::new(element),
        }
    }

    /// Reference to another registered schema.
    pub fn reference(target: SchemaRef) -> Self {
        FieldKind::Ref { target }
    }

    /// Enum over the given allowed string values.
    pub fn one_of<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldKind::Enum {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }
}

/// A single constraint predicate attached to a field.
///
/// Constraints apply only to values already conforming to the field's kind,
/// and are checked in declaration order.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Minimum string length in characters
    MinLength(usize),
    /// Maximum string length in characters
    MaxLength(usize),
    /// Regex the string value must match
    Pattern(Regex),
    /// Inclusive numeric lower bound
    Minimum(f64),
    /// Inclusive numeric upper bound
    Maximum(f64),
    /// Minimum sequence length
    MinItems(usize),
    /// Maximum sequence length
    MaxItems(usize),
    /// Closed set of allowed values
    AllowedValues(Vec<Value>),
}

impl Constraint {
    /// Returns the constraint name for error messages
    pub fn name(&self) -> &'static str {
        match self {
            Constraint::MinLength(_) => "min-length",
            Constraint::MaxLength(_) => "max-length",
            Constraint::Pattern(_) => "pattern",
            Constraint::Minimum(_) => "minimum",
            Constraint::Maximum(_) => "maximum",
            Constraint::MinItems(_) => "min-items",
            Constraint::MaxItems(_) => "max-items",
            Constraint::AllowedValues(_) => "allowed-values",
        }
    }

    /// Whether this constraint is structurally applicable to the given kind.
    ///
    /// Checked at registration so a mis-attached constraint is a
    /// configuration error, never a silent no-op at validation time.
    pub fn applies_to(&self, kind: &FieldKind) -> bool {
        match self {
            Constraint::MinLength(_) | Constraint::MaxLength(_) | Constraint::Pattern(_) => {
                matches!(kind, FieldKind::String)
            }
            Constraint::Minimum(_) | Constraint::Maximum(_) => {
                matches!(kind, FieldKind::Int | FieldKind::Float)
            }
            Constraint::MinItems(_) | Constraint::MaxItems(_) => {
                matches!(kind, FieldKind::Sequence { .. })
            }
            Constraint::AllowedValues(_) => matches!(
                kind,
                FieldKind::String | FieldKind::Int | FieldKind::Float | FieldKind::Bool
            ),
        }
    }
}

/// Documentation metadata carried on a field descriptor.
///
/// Flows verbatim into the synthesized documentation; never consulted by
/// the validator.
#[derive(Debug, Clone, Default)]
pub struct FieldDocs {
    /// Human-readable description
    pub description: Option<String>,
    /// Example value shown in published documentation
    pub example: Option<Value>,
    /// Deprecation note; deprecation is metadata, not a lifecycle state
    pub deprecated: Option<String>,
}

/// Field descriptor as per CONTRACT.md
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Field name, non-empty and unique within its schema
    pub name: String,
    /// Field kind
    pub kind: FieldKind,
    /// Whether the field must be present
    pub required: bool,
    /// Whether in-kind coercion is permitted (e.g. "42" -> 42 for int).
    /// Default is no coercion.
    pub coerce: bool,
    /// Constraint predicates, applied in declaration order
    pub constraints: Vec<Constraint>,
    /// Documentation metadata
    pub docs: FieldDocs,
}

impl FieldDescriptor {
    /// Create a required field of the given kind
    pub fn required(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
            coerce: false,
            constraints: Vec::new(),
            docs: FieldDocs::default(),
        }
    }

    /// Create an optional field of the given kind
    pub fn optional(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            required: false,
            ..Self::required(name, kind)
        }
    }

    /// Opt this field into in-kind coercion
    pub fn coercing(mut self) -> Self {
        self.coerce = true;
        self
    }

    /// Append a constraint (constraints apply in declaration order)
    pub fn constrain(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Attach a description for published documentation
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.docs.description = Some(description.into());
        self
    }

    /// Attach an example value for published documentation
    pub fn example(mut self, example: Value) -> Self {
        self.docs.example = Some(example);
        self
    }

    /// Mark the field deprecated with a note
    pub fn deprecate(mut self, note: impl Into<String>) -> Self {
        self.docs.deprecated = Some(note.into());
        self
    }
}

/// Complete schema definition as per CONTRACT.md
///
/// Fields are an ordered sequence; declaration order drives violation order
/// and documentation order. Immutable once registered (invariant C1):
/// changes require a new version, never in-place mutation.
#[derive(Debug, Clone)]
pub struct Schema {
    /// Unique schema identifier
    pub id: String,
    /// Schema version, monotonically increasing from 1
    pub version: u32,
    /// Optional description for published documentation
    pub description: Option<String>,
    /// Ordered field descriptors
    pub fields: Vec<FieldDescriptor>,
}

impl Schema {
    /// Create a new schema
    pub fn new(id: impl Into<String>, version: u32, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            id: id.into(),
            version,
            description: None,
            fields,
        }
    }

    /// Attach a schema-level description
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the reference key for this schema
    pub fn schema_ref(&self) -> SchemaRef {
        SchemaRef::new(self.id.clone(), self.version)
    }

    /// Look up a field descriptor by name
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validates the schema structure itself (not a value).
    ///
    /// Checks: non-empty id, version >= 1, at least one field, non-empty
    /// unique field names, non-empty enum vocabularies, and every
    /// constraint structurally applicable to its field's kind. Reference
    /// resolvability is the registry's job at registration time.
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.id.is_empty() {
            return Err("schema id must be non-empty".into());
        }
        if self.version == 0 {
            return Err("schema version must be >= 1".into());
        }
        if self.fields.is_empty() {
            return Err("schema must declare at least one field".into());
        }

        let mut seen = std::collections::HashSet::new();
        for field in &self.fields {
            if field.name.is_empty() {
                return Err("field name must be non-empty".into());
            }
            if !seen.insert(field.name.as_str()) {
                return Err(format!("duplicate field name '{}'", field.name));
            }
            check_kind(&field.name, &field.kind)?;
            for constraint in &field.constraints {
                if !constraint.applies_to(&field.kind) {
                    return Err(format!(
                        "constraint '{}' does not apply to kind '{}' on field '{}'",
                        constraint.name(),
                        field.kind.kind_name(),
                        field.name
                    ));
                }
            }
        }

        Ok(())
    }

    /// Collects every schema reference reachable from this schema's fields.
    pub fn references(&self) -> Vec<&SchemaRef> {
        let mut refs = Vec::new();
        for field in &self.fields {
            collect_refs(&field.kind, &mut refs);
        }
        refs
    }
}

fn check_kind(field_name: &str, kind: &FieldKind) -> Result<(), String> {
    match kind {
        FieldKind::Enum { allowed } => {
            if allowed.is_empty() {
                return Err(format!("enum field '{}' has no allowed values", field_name));
            }
        }
        FieldKind::Sequence { element } => check_kind(field_name, element)?,
        _ => {}
    }
    Ok(())
}

fn collect_refs<'a>(kind: &'a FieldKind, refs: &mut Vec<&'a SchemaRef>) {
    match kind {
        FieldKind::Ref { target } => refs.push(target),
        FieldKind::Sequence { element } => collect_refs(element, refs),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

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
    fn test_schema_structure_valid() {
        assert!(sample_schema().validate_structure().is_ok());
    }

    #[test]
    fn test_empty_fields_rejected() {
        let schema = Schema::new("user", 1, vec![]);
        assert!(schema.validate_structure().is_err());
    }

    #[test]
    fn test_version_zero_rejected() {
        let schema = Schema::new(
            "user",
            0,
            vec![FieldDescriptor::required("name", FieldKind::String)],
        );
        let result = schema.validate_structure();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("version"));
    }

    #[test]
    fn test_duplicate_field_name_rejected() {
        let schema = Schema::new(
            "user",
            1,
            vec![
                FieldDescriptor::required("name", FieldKind::String),
                FieldDescriptor::optional("name", FieldKind::Int),
            ],
        );
        let result = schema.validate_structure();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("duplicate"));
    }

    #[test]
    fn test_empty_field_name_rejected() {
        let schema = Schema::new("user", 1, vec![FieldDescriptor::required("", FieldKind::Bool)]);
        assert!(schema.validate_structure().is_err());
    }

    #[test]
    fn test_empty_enum_rejected() {
        let schema = Schema::new(
            "ticket",
            1,
            vec![FieldDescriptor::required(
                "status",
                FieldKind::Enum { allowed: vec![] },
            )],
        );
        assert!(schema.validate_structure().is_err());
    }

    #[test]
    fn test_misapplied_constraint_rejected() {
        let schema = Schema::new(
            "user",
            1,
            vec![FieldDescriptor::required("age", FieldKind::Int)
                .constrain(Constraint::MinLength(3))],
        );
        let result = schema.validate_structure();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("min-length"));
    }

    #[test]
    fn test_numeric_bounds_apply_to_int() {
        let schema = Schema::new(
            "user",
            1,
            vec![FieldDescriptor::required("age", FieldKind::Int)
                .constrain(Constraint::Minimum(0.0))
                .constrain(Constraint::Maximum(150.0))],
        );
        assert!(schema.validate_structure().is_ok());
    }

    #[test]
    fn test_references_collected_through_sequences() {
        let schema = Schema::new(
            "order",
            1,
            vec![
                FieldDescriptor::required(
                    "customer",
                    FieldKind::reference(SchemaRef::new("customer", 2)),
                ),
                FieldDescriptor::required(
                    "lines",
                    FieldKind::sequence_of(FieldKind::reference(SchemaRef::new("line", 1))),
                ),
            ],
        );
        let refs = schema.references();
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0], &SchemaRef::new("customer", 2));
        assert_eq!(refs[1], &SchemaRef::new("line", 1));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(FieldKind::String.kind_name(), "string");
        assert_eq!(FieldKind::Int.kind_name(), "int");
        assert_eq!(FieldKind::Bool.kind_name(), "bool");
        assert_eq!(FieldKind::Float.kind_name(), "float");
        assert_eq!(FieldKind::one_of(["a"]).kind_name(), "enum");
        assert_eq!(
            FieldKind::sequence_of(FieldKind::Int).kind_name(),
            "sequence"
        );
    }

    #[test]
    fn test_builder_metadata() {
        let field = FieldDescriptor::optional("nickname", FieldKind::String)
            .describe("Short display name")
            .example(json!("ada"))
            .deprecate("use display_name");
        assert_eq!(field.docs.description.as_deref(), Some("Short display name"));
        assert_eq!(field.docs.example, Some(json!("ada")));
        assert!(field.docs.deprecated.is_some());
        assert!(!field.required);
    }

    #[test]
    fn test_schema_ref_display() {
        assert_eq!(SchemaRef::new("user", 3).to_string(), "user@v3");
    }
}
