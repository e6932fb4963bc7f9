//! Form field value objects

use super::transform::ValueTransform;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Type-safe field values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Int(i64),
    Bool(bool),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl FieldValue {
    /// Get the text value (returns empty string for non-text values)
    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(s) => s,
            _ => "",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// True for an empty text value
    pub fn is_blank(&self) -> bool {
        matches!(self, FieldValue::Text(s) if s.trim().is_empty())
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Int(n) => n.to_string(),
            FieldValue::Bool(b) => if *b { "yes" } else { "no" }.to_string(),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(s) => Value::from(s.clone()),
            FieldValue::Int(n) => Value::from(*n),
            FieldValue::Bool(b) => Value::from(*b),
        }
    }
}

/// A validation message attached to one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Checks run after every transform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validator {
    MaxLength(usize),
    /// Value must be an integer inside `[min, max]`
    IntRange { min: i64, max: i64 },
}

impl Validator {
    /// Error message for `value`, if it is invalid
    pub fn check(&self, value: &FieldValue) -> Option<String> {
        match (self, value) {
            (Validator::MaxLength(max), FieldValue::Text(s)) if s.chars().count() > *max => {
                Some(format!("Must be at most {max} characters."))
            }
            (Validator::MaxLength(_), _) => None,
            // blank is the required check's business
            (Validator::IntRange { .. }, v) if v.is_blank() => None,
            (Validator::IntRange { min, .. }, FieldValue::Int(n)) if n < min => {
                Some(format!("Must be at least {min}."))
            }
            (Validator::IntRange { max, .. }, FieldValue::Int(n)) if n > max => {
                Some(format!("Must be at most {max}."))
            }
            (Validator::IntRange { .. }, FieldValue::Int(_)) => None,
            (Validator::IntRange { .. }, _) => Some("Must be a number.".to_string()),
        }
    }
}

/// Declaration of one form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub transform: ValueTransform,
    pub validators: Vec<Validator>,
    pub required: bool,
    pub is_multiline: bool,
    pub initial: FieldValue,
}

impl FieldSpec {
    /// Create a new required text field
    pub fn text(name: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            transform: ValueTransform::Identity,
            validators: Vec::new(),
            required: true,
            is_multiline: false,
            initial: FieldValue::default(),
        }
    }

    /// Create a new required numeric field clamped into `[min, max]` while typing
    pub fn clamped(name: &str, label: &str, min: i64, max: i64) -> Self {
        Self {
            transform: ValueTransform::clamp(min, max),
            ..Self::text(name, label)
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn multiline(mut self) -> Self {
        self.is_multiline = true;
        self
    }

    pub fn with_transform(mut self, transform: ValueTransform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn with_initial(mut self, initial: FieldValue) -> Self {
        self.initial = initial;
        self
    }

    /// All errors for `value`; required-ness is skipped for optional fields
    pub fn validate(&self, value: &FieldValue) -> Vec<FieldError> {
        if value.is_blank() {
            if self.required {
                return vec![FieldError::new(&self.name, "Required field.")];
            }
            return Vec::new();
        }
        self.validators
            .iter()
            .filter_map(|v| v.check(value))
            .map(|message| FieldError::new(&self.name, message))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    mod field_value {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_default_is_empty_text() {
            assert_eq!(FieldValue::default(), FieldValue::Text(String::new()));
            assert!(FieldValue::default().is_blank());
        }

        #[test]
        fn test_display_value() {
            assert_eq!(FieldValue::Int(42).display_value(), "42");
            assert_eq!(FieldValue::Text("x".into()).display_value(), "x");
            assert_eq!(FieldValue::Bool(true).display_value(), "yes");
        }

        #[test]
        fn test_json_conversion() {
            assert_eq!(FieldValue::Int(5).to_json(), serde_json::json!(5));
            assert_eq!(FieldValue::Text("a".into()).to_json(), serde_json::json!("a"));
        }

        #[test]
        fn test_accessors() {
            assert_eq!(FieldValue::Int(3).as_int(), Some(3));
            assert_eq!(FieldValue::Int(3).as_text(), "");
            assert_eq!(FieldValue::Text("3".into()).as_int(), None);
        }
    }

    mod validators {
        use super::*;
        use pretty_assertions::assert_eq;

        const RANGE: Validator = Validator::IntRange { min: 5, max: 9000 };

        #[test]
        fn test_range_accepts_inside() {
            assert!(RANGE.check(&FieldValue::Int(5)).is_none());
            assert!(RANGE.check(&FieldValue::Int(9000)).is_none());
        }

        #[test]
        fn test_range_rejects_below_min() {
            assert_eq!(
                RANGE.check(&FieldValue::Int(1)),
                Some("Must be at least 5.".to_string())
            );
        }

        #[test]
        fn test_range_rejects_text() {
            assert_eq!(
                RANGE.check(&FieldValue::Text("abc".into())),
                Some("Must be a number.".to_string())
            );
        }

        #[test]
        fn test_range_ignores_blank() {
            assert!(RANGE.check(&FieldValue::Text(String::new())).is_none());
        }

        #[test]
        fn test_max_length() {
            let v = Validator::MaxLength(3);
            assert!(v.check(&FieldValue::Text("abc".into())).is_none());
            assert!(v.check(&FieldValue::Text("abcd".into())).is_some());
        }
    }

    mod field_spec {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_required_blank_is_an_error() {
            let spec = FieldSpec::text("name", "Name");
            assert_eq!(
                spec.validate(&FieldValue::Text("  ".into())),
                vec![FieldError::new("name", "Required field.")]
            );
        }

        #[test]
        fn test_optional_blank_is_valid() {
            let spec = FieldSpec::text("description", "Description").optional();
            assert!(spec.validate(&FieldValue::default()).is_empty());
        }

        #[test]
        fn test_optional_still_runs_other_validators() {
            let spec = FieldSpec::text("description", "Description")
                .optional()
                .with_validator(Validator::MaxLength(2));
            assert_eq!(spec.validate(&FieldValue::Text("long".into())).len(), 1);
        }

        #[test]
        fn test_clamped_uses_clamp_transform() {
            let spec = FieldSpec::clamped("timeoutMinutes", "Timeout", 1, 9000);
            assert_eq!(spec.transform, ValueTransform::clamp(1, 9000));
            assert!(spec.required);
        }
    }
}
