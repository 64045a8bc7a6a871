//! Validation engine per CONTRACT.md
//!
//! Validation semantics:
//! - Fields are checked in declaration order
//! - Every violation in the value is reported in one call (C2)
//! - Constraint checks short-circuit per field, never per value
//! - Nested violations carry dotted paths ("perk.title", "items.1")
//! - No nulls, no undeclared fields, no implicit coercion
//!
//! Validation is a pure function of (schema, value): no side effects,
//! identical inputs always produce identical results (C2). An accepted
//! value is returned in normalized form, with per-field opt-in coercions
//! applied.

use serde_json::{Map, Value};

use crate::schema::{
    Constraint, ContractResult, FieldDescriptor, FieldKind, SchemaRegistry, Schema,
};

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Violation {
    /// Dotted field path, e.g. `perk.title` or `items.1`
    pub path: String,
    /// Machine-readable reason
    #[serde(rename = "reason")]
    pub code: ViolationCode,
    /// Human-readable explanation
    pub message: String,
}

impl Violation {
    fn new(path: impl Into<String>, code: ViolationCode, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            code,
            message: message.into(),
        }
    }
}

/// Machine-readable violation reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationCode {
    /// Required field absent
    MissingField,
    /// Value does not conform to the declared kind
    TypeMismatch,
    /// Null is never a valid value; optionality is absence
    NullValue,
    /// Key not declared in the schema
    UnknownField,
    /// String not in the enum's allowed set
    EnumMismatch,
    /// A constraint predicate failed
    ConstraintViolated,
}

impl ViolationCode {
    /// Returns the kebab-case reason string
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationCode::MissingField => "missing-field",
            ViolationCode::TypeMismatch => "type-mismatch",
            ViolationCode::NullValue => "null-value",
            ViolationCode::UnknownField => "unknown-field",
            ViolationCode::EnumMismatch => "enum-mismatch",
            ViolationCode::ConstraintViolated => "constraint-violated",
        }
    }
}

/// Outcome of validating one value against one schema.
///
/// `Accepted` and `Rejected` are mutually exclusive; a `Rejected` result
/// never carries an empty violation list. Rejection is data, not an error:
/// the caller maps it to a structured error body, never to control flow.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    /// Value conforms; carries the normalized value
    Accepted(Value),
    /// Value does not conform; carries every violation found
    Rejected(Vec<Violation>),
}

impl ValidationResult {
    /// Whether the value was accepted
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationResult::Accepted(_))
    }

    /// The normalized value, if accepted
    pub fn accepted(&self) -> Option<&Value> {
        match self {
            ValidationResult::Accepted(value) => Some(value),
            ValidationResult::Rejected(_) => None,
        }
    }

    /// The violations, if rejected
    pub fn violations(&self) -> Option<&[Violation]> {
        match self {
            ValidationResult::Accepted(_) => None,
            ValidationResult::Rejected(violations) => Some(violations),
        }
    }
}

/// Validation engine backed by a schema registry.
///
/// The registry is consulted only to resolve `ref` fields; the engine
/// holds no mutable state and may run freely in parallel.
pub struct Validator<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> Validator<'a> {
    /// Creates a validator resolving references through the given registry.
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Validates a value against a schema.
    ///
    /// The `Err` channel carries configuration errors only (an
    /// unresolvable `ref` on a schema that never went through
    /// registration); a value failing validation is an `Ok(Rejected)`.
    pub fn validate(&self, schema: &Schema, value: &Value) -> ContractResult<ValidationResult> {
        let obj = match value.as_object() {
            Some(obj) => obj,
            None => {
                return Ok(ValidationResult::Rejected(vec![Violation::new(
                    "$root",
                    ViolationCode::TypeMismatch,
                    format!("expected object, got {}", json_kind_name(value)),
                )]));
            }
        };

        let mut violations = Vec::new();
        let normalized = self.check_fields(&schema.fields, obj, "", &mut violations)?;

        if violations.is_empty() {
            Ok(ValidationResult::Accepted(Value::Object(normalized)))
        } else {
            Ok(ValidationResult::Rejected(violations))
        }
    }

    /// Walks declared fields in order, then scans for undeclared keys.
    ///
    /// Returns the normalized object; it is meaningful only when no
    /// violations accumulated.
    fn check_fields(
        &self,
        fields: &[FieldDescriptor],
        obj: &Map<String, Value>,
        prefix: &str,
        violations: &mut Vec<Violation>,
    ) -> ContractResult<Map<String, Value>> {
        let mut normalized = Map::new();

        for field in fields {
            let path = make_path(prefix, &field.name);
            match obj.get(&field.name) {
                None => {
                    if field.required {
                        violations.push(Violation::new(
                            path,
                            ViolationCode::MissingField,
                            format!("required field '{}' is missing", field.name),
                        ));
                    }
                }
                Some(Value::Null) => {
                    violations.push(Violation::new(
                        path,
                        ViolationCode::NullValue,
                        "null is not a valid value; omit optional fields instead",
                    ));
                }
                Some(value) => {
                    let checked = self.check_value(&field.kind, field.coerce, value, &path, violations)?;
                    if let Some(value) = checked {
                        // Constraints run only on kind-conformant values,
                        // short-circuiting on the first failure per field.
                        if self.check_constraints(field, &value, &path, violations) {
                            normalized.insert(field.name.clone(), value);
                        }
                    }
                }
            }
        }

        // Undeclared keys are violations, reported after the declared walk.
        for key in obj.keys() {
            if !fields.iter().any(|f| &f.name == key) {
                violations.push(Violation::new(
                    make_path(prefix, key),
                    ViolationCode::UnknownField,
                    format!("field '{}' is not declared in the schema", key),
                ));
            }
        }

        Ok(normalized)
    }

    /// Checks one value against a kind, returning its normalized form.
    ///
    /// Pushes violations and returns `None` on non-conformance.
    fn check_value(
        &self,
        kind: &FieldKind,
        coerce: bool,
        value: &Value,
        path: &str,
        violations: &mut Vec<Violation>,
    ) -> ContractResult<Option<Value>> {
        match kind {
            FieldKind::String => {
                if value.is_string() {
                    return Ok(Some(value.clone()));
                }
                violations.push(type_mismatch(path, "string", value));
                Ok(None)
            }
            FieldKind::Int => {
                if value.is_i64() || value.is_u64() {
                    return Ok(Some(value.clone()));
                }
                if coerce {
                    if let Some(n) = value.as_str().and_then(|s| s.parse::<i64>().ok()) {
                        return Ok(Some(Value::from(n)));
                    }
                }
                violations.push(type_mismatch(path, "int", value));
                Ok(None)
            }
            FieldKind::Bool => {
                if value.is_boolean() {
                    return Ok(Some(value.clone()));
                }
                if coerce {
                    match value.as_str() {
                        Some("true") => return Ok(Some(Value::Bool(true))),
                        Some("false") => return Ok(Some(Value::Bool(false))),
                        _ => {}
                    }
                }
                violations.push(type_mismatch(path, "bool", value));
                Ok(None)
            }
            FieldKind::Float => {
                // Integral JSON numbers are acceptable floats
                if value.is_number() {
                    return Ok(Some(value.clone()));
                }
                if coerce {
                    if let Some(n) = value.as_str().and_then(|s| s.parse::<f64>().ok()) {
                        if n.is_finite() {
                            if let Some(number) = serde_json::Number::from_f64(n) {
                                return Ok(Some(Value::Number(number)));
                            }
                        }
                    }
                }
                violations.push(type_mismatch(path, "float", value));
                Ok(None)
            }
            FieldKind::Enum { allowed } => {
                let Some(s) = value.as_str() else {
                    violations.push(type_mismatch(path, "enum", value));
                    return Ok(None);
                };
                if allowed.iter().any(|a| a == s) {
                    Ok(Some(value.clone()))
                } else {
                    violations.push(Violation::new(
                        path,
                        ViolationCode::EnumMismatch,
                        format!("'{}' is not one of [{}]", s, allowed.join(", ")),
                    ));
                    Ok(None)
                }
            }
            FieldKind::Ref { target } => {
                let schema = self.registry.resolve(target)?;
                let Some(obj) = value.as_object() else {
                    violations.push(type_mismatch(path, "object", value));
                    return Ok(None);
                };
                let before = violations.len();
                let normalized = self.check_fields(&schema.fields, obj, path, violations)?;
                if violations.len() == before {
                    Ok(Some(Value::Object(normalized)))
                } else {
                    Ok(None)
                }
            }
            FieldKind::Sequence { element } => {
                let Some(arr) = value.as_array() else {
                    violations.push(type_mismatch(path, "sequence", value));
                    return Ok(None);
                };
                let before = violations.len();
                let mut normalized = Vec::with_capacity(arr.len());
                for (i, item) in arr.iter().enumerate() {
                    let item_path = format!("{}.{}", path, i);
                    if item.is_null() {
                        violations.push(Violation::new(
                            item_path,
                            ViolationCode::NullValue,
                            "null is not a valid element",
                        ));
                        continue;
                    }
                    if let Some(item) =
                        self.check_value(element, coerce, item, &item_path, violations)?
                    {
                        normalized.push(item);
                    }
                }
                if violations.len() == before {
                    Ok(Some(Value::Array(normalized)))
                } else {
                    Ok(None)
                }
            }
        }
    }

    /// Applies a field's constraints in declaration order to a
    /// kind-conformant value, stopping at the first failure. Returns
    /// whether every constraint passed.
    fn check_constraints(
        &self,
        field: &FieldDescriptor,
        value: &Value,
        path: &str,
        violations: &mut Vec<Violation>,
    ) -> bool {
        for constraint in &field.constraints {
            if let Some(message) = constraint_failure(constraint, value) {
                violations.push(Violation::new(
                    path,
                    ViolationCode::ConstraintViolated,
                    message,
                ));
                return false;
            }
        }
        true
    }
}

/// Returns a failure message if the value breaks the constraint.
///
/// Kind conformance is already established, so the value accessors here
/// cannot miss for a structurally valid schema.
fn constraint_failure(constraint: &Constraint, value: &Value) -> Option<String> {
    match constraint {
        Constraint::MinLength(min) => {
            let len = value.as_str().map_or(0, |s| s.chars().count());
            (len < *min).then(|| format!("length {} is below minimum {}", len, min))
        }
        Constraint::MaxLength(max) => {
            let len = value.as_str().map_or(0, |s| s.chars().count());
            (len > *max).then(|| format!("length {} exceeds maximum {}", len, max))
        }
        Constraint::Pattern(regex) => {
            let matched = value.as_str().is_some_and(|s| regex.is_match(s));
            (!matched).then(|| format!("value does not match pattern '{}'", regex.as_str()))
        }
        Constraint::Minimum(min) => {
            let n = value.as_f64().unwrap_or(f64::NAN);
            (n < *min).then(|| format!("{} is below minimum {}", n, min))
        }
        Constraint::Maximum(max) => {
            let n = value.as_f64().unwrap_or(f64::NAN);
            (n > *max).then(|| format!("{} exceeds maximum {}", n, max))
        }
        Constraint::MinItems(min) => {
            let len = value.as_array().map_or(0, Vec::len);
            (len < *min).then(|| format!("{} items is below minimum {}", len, min))
        }
        Constraint::MaxItems(max) => {
            let len = value.as_array().map_or(0, Vec::len);
            (len > *max).then(|| format!("{} items exceeds maximum {}", len, max))
        }
        Constraint::AllowedValues(allowed) => (!allowed.contains(value))
            .then(|| format!("value is not in the allowed set ({} entries)", allowed.len())),
    }
}

/// Returns the JSON kind name for error messages.
fn json_kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "object",
    }
}

/// Creates a field path from prefix and field name.
fn make_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

fn type_mismatch(path: &str, expected: &str, actual: &Value) -> Violation {
    Violation::new(
        path,
        ViolationCode::TypeMismatch,
        format!("expected {}, got {}", expected, json_kind_name(actual)),
    )
}
