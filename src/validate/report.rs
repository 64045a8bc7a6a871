//! Transport-facing rejection body.
//!
//! JSON formatting for a `Rejected` result. The transport layer maps this
//! to a structured 4xx/5xx error body; this layer only shapes it.

use serde::{Deserialize, Serialize};

use super::engine::{ValidationResult, Violation};

/// Serializable body enumerating every violation found in one call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectionBody {
    /// Always "rejected"
    pub status: String,
    /// Stable code for the rejection outcome
    pub code: String,
    /// Every violation, in field-declaration order
    pub violations: Vec<Violation>,
}

impl RejectionBody {
    /// Builds the body from a rejected result.
    ///
    /// Returns `None` for an accepted result; acceptance has no error body.
    pub fn from_result(result: &ValidationResult) -> Option<Self> {
        result.violations().map(|violations| Self {
            status: "rejected".to_string(),
            code: "CONTRACT_VALIDATION_REJECTED".to_string(),
            violations: violations.to_vec(),
        })
    }

    /// Convert to a JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("RejectionBody serialization cannot fail")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::engine::ViolationCode;
    use serde_json::{json, Value};

    #[test]
    fn test_accepted_has_no_body() {
        let result = ValidationResult::Accepted(json!({}));
        assert!(RejectionBody::from_result(&result).is_none());
    }

    #[test]
    fn test_body_enumerates_violations_with_paths_and_reasons() {
        let result = ValidationResult::Rejected(vec![
            Violation {
                path: "name".into(),
                code: ViolationCode::MissingField,
                message: "required field 'name' is missing".into(),
            },
            Violation {
                path: "items.1".into(),
                code: ViolationCode::TypeMismatch,
                message: "expected int, got string".into(),
            },
        ]);

        let body = RejectionBody::from_result(&result).unwrap();
        let value: Value = serde_json::from_str(&body.to_json()).unwrap();

        assert_eq!(value["status"], "rejected");
        assert_eq!(value["code"], "CONTRACT_VALIDATION_REJECTED");
        assert_eq!(value["violations"][0]["path"], "name");
        assert_eq!(value["violations"][0]["reason"], "missing-field");
        assert_eq!(value["violations"][1]["path"], "items.1");
        assert_eq!(value["violations"][1]["reason"], "type-mismatch");
    }
}
