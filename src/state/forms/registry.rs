//! Field registry: name → current value, transform, validators and errors

use super::field::{FieldError, FieldSpec, FieldValue};
use crate::error::FormError;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// The single value object of a form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValue(BTreeMap<String, FieldValue>);

impl FormValue {
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }

    pub fn text(&self, field: &str) -> &str {
        self.get(field).map(FieldValue::as_text).unwrap_or("")
    }

    pub fn int(&self, field: &str) -> Option<i64> {
        self.get(field).and_then(FieldValue::as_int)
    }

    pub fn insert(&mut self, field: &str, value: FieldValue) {
        self.0.insert(field.to_string(), value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// JSON object suitable as a mutation input
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .0
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        Value::Object(map)
    }
}

/// Registered field with its live state
#[derive(Debug, Clone)]
pub struct FieldEntry {
    pub spec: FieldSpec,
    pub value: FieldValue,
    pub errors: Vec<FieldError>,
    /// Whether the field was validated since mount or reset
    pub touched: bool,
}

impl FieldEntry {
    fn new(spec: FieldSpec) -> Self {
        Self {
            value: spec.initial.clone(),
            spec,
            errors: Vec::new(),
            touched: false,
        }
    }

    fn revalidate(&mut self) {
        self.errors = self.spec.validate(&self.value);
        self.touched = true;
    }
}

/// Fields in registration order
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    entries: Vec<FieldEntry>,
}

impl FieldRegistry {
    /// Declare a field.
    ///
    /// Registering the same name again with the same transform is a no-op; a different
    /// transform is rejected.
    pub fn register(&mut self, spec: FieldSpec) -> Result<(), FormError> {
        if let Some(existing) = self.get(&spec.name) {
            if existing.spec.transform != spec.transform {
                return Err(FormError::ConflictingRegistration(spec.name));
            }
            return Ok(());
        }
        self.entries.push(FieldEntry::new(spec));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&FieldEntry> {
        self.entries.iter().find(|e| e.spec.name == name)
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut FieldEntry, FormError> {
        self.entries
            .iter_mut()
            .find(|e| e.spec.name == name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))
    }

    pub fn entries(&self) -> &[FieldEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Transform `raw`, store it and replace the field's errors
    pub fn set_value(&mut self, name: &str, raw: &str) -> Result<&[FieldError], FormError> {
        let entry = self.get_mut(name)?;
        entry.value = entry.spec.transform.apply(raw);
        entry.revalidate();
        Ok(&entry.errors)
    }

    /// Store an already-typed value, bypassing the transform
    pub fn restore_value(&mut self, name: &str, value: FieldValue) -> Result<(), FormError> {
        let entry = self.get_mut(name)?;
        entry.value = value;
        entry.revalidate();
        Ok(())
    }

    /// Replace a field's errors
    pub fn set_errors(&mut self, name: &str, errors: Vec<FieldError>) -> Result<(), FormError> {
        self.get_mut(name)?.errors = errors;
        Ok(())
    }

    pub fn errors(&self, name: &str) -> &[FieldError] {
        self.get(name).map(|e| e.errors.as_slice()).unwrap_or(&[])
    }

    /// Validate fields that were never edited
    pub fn validate_untouched(&mut self) {
        for entry in self.entries.iter_mut().filter(|e| !e.touched) {
            entry.revalidate();
        }
    }

    /// Names of fields that currently have errors, in registration order
    pub fn invalid_fields(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| !e.errors.is_empty())
            .map(|e| e.spec.name.clone())
            .collect()
    }

    pub fn value_object(&self) -> FormValue {
        let mut value = FormValue::default();
        for entry in &self.entries {
            value.insert(&entry.spec.name, entry.value.clone());
        }
        value
    }

    /// Return every field to its initial value with no errors
    pub fn reset(&mut self) {
        for entry in &mut self.entries {
            entry.value = entry.spec.initial.clone();
            entry.errors.clear();
            entry.touched = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::transform::ValueTransform;
    use pretty_assertions::assert_eq;

    fn registry() -> FieldRegistry {
        let mut registry = FieldRegistry::default();
        registry.register(FieldSpec::text("name", "Name")).unwrap();
        registry
            .register(FieldSpec::clamped("timeoutMinutes", "Timeout", 1, 9000))
            .unwrap();
        registry
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = registry();
        registry.register(FieldSpec::text("name", "Name")).unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_register_with_different_transform_fails() {
        let mut registry = registry();
        let err = registry
            .register(FieldSpec::text("name", "Name").with_transform(ValueTransform::Trim))
            .unwrap_err();
        assert_eq!(err, FormError::ConflictingRegistration("name".to_string()));
    }

    #[test]
    fn test_set_value_transforms_and_validates() {
        let mut registry = registry();
        let errors = registry.set_value("timeoutMinutes", "0").unwrap();
        assert!(errors.is_empty());
        assert_eq!(
            registry.get("timeoutMinutes").unwrap().value,
            FieldValue::Int(1)
        );
    }

    #[test]
    fn test_set_value_replaces_errors() {
        let mut registry = registry();
        assert_eq!(registry.set_value("name", "").unwrap().len(), 1);
        assert!(registry.set_value("name", "Backup").unwrap().is_empty());
        assert!(registry.errors("name").is_empty());
    }

    #[test]
    fn test_unknown_field() {
        let mut registry = registry();
        assert_eq!(
            registry.set_value("nope", "x").unwrap_err(),
            FormError::UnknownField("nope".to_string())
        );
        assert!(registry.errors("nope").is_empty());
    }

    #[test]
    fn test_value_object_and_json() {
        let mut registry = registry();
        registry.set_value("name", "Backup").unwrap();
        registry.set_value("timeoutMinutes", "30").unwrap();

        let value = registry.value_object();
        assert_eq!(value.text("name"), "Backup");
        assert_eq!(value.int("timeoutMinutes"), Some(30));
        assert_eq!(
            value.to_json(),
            serde_json::json!({ "name": "Backup", "timeoutMinutes": 30 })
        );
    }

    #[test]
    fn test_validate_untouched_keeps_existing_errors() {
        let mut registry = registry();
        registry.set_value("timeoutMinutes", "10").unwrap();
        registry
            .set_errors("timeoutMinutes", vec![FieldError::new("timeoutMinutes", "server")])
            .unwrap();

        registry.validate_untouched();

        assert_eq!(registry.invalid_fields(), vec!["name", "timeoutMinutes"]);
        assert_eq!(registry.errors("timeoutMinutes")[0].message, "server");
    }

    #[test]
    fn test_reset() {
        let mut registry = registry();
        registry.set_value("name", "").unwrap();
        registry.reset();
        assert!(registry.invalid_fields().is_empty());
        assert!(!registry.get("name").unwrap().touched);
    }
}
