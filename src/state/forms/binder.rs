//! Form binder: one value object, field-scoped errors, gated submission

use super::field::{FieldError, FieldSpec, FieldValue};
use super::registry::{FieldEntry, FieldRegistry, FormValue};
use crate::error::FormError;

/// Trait for common form navigation
pub trait Form {
    fn field_count(&self) -> usize;
    fn active_field(&self) -> usize;
    fn set_active_field(&mut self, index: usize);
    fn next_field(&mut self) {
        let count = self.field_count();
        if count == 0 {
            return;
        }
        let current = self.active_field();
        self.set_active_field((current + 1) % count);
    }
    fn prev_field(&mut self) {
        let count = self.field_count();
        if count == 0 {
            return;
        }
        let current = self.active_field();
        if current == 0 {
            self.set_active_field(count - 1);
        } else {
            self.set_active_field(current - 1);
        }
    }
}

/// Owns a single form's fields and errors
#[derive(Debug, Clone)]
pub struct FormBinder {
    title: String,
    registry: FieldRegistry,
    /// Errors that could not be routed to a field
    form_errors: Vec<String>,
    optional_labels: bool,
    active_field_index: usize,
    mounted: bool,
}

impl FormBinder {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            registry: FieldRegistry::default(),
            form_errors: Vec::new(),
            optional_labels: false,
            active_field_index: 0,
            mounted: true,
        }
    }

    /// Mark non-required fields as "(optional)" in their labels
    pub fn with_optional_labels(mut self) -> Self {
        self.optional_labels = true;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn register(&mut self, spec: FieldSpec) -> Result<(), FormError> {
        self.registry.register(spec)
    }

    pub fn fields(&self) -> &[FieldEntry] {
        self.registry.entries()
    }

    pub fn field(&self, name: &str) -> Option<&FieldEntry> {
        self.registry.get(name)
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.registry.get(name).map(|e| &e.value)
    }

    /// Label as rendered, with the optional suffix when enabled
    pub fn label(&self, name: &str) -> Option<String> {
        let entry = self.registry.get(name)?;
        if self.optional_labels && !entry.spec.required {
            Some(format!("{} (optional)", entry.spec.label))
        } else {
            Some(entry.spec.label.clone())
        }
    }

    /// Run the field's transform over `raw`, store it and revalidate the field
    pub fn set_value(&mut self, name: &str, raw: &str) -> Result<(), FormError> {
        if !self.mounted {
            return Err(FormError::Unmounted);
        }
        self.registry.set_value(name, raw)?;
        Ok(())
    }

    pub fn errors(&self, name: &str) -> &[FieldError] {
        self.registry.errors(name)
    }

    pub fn form_errors(&self) -> &[String] {
        &self.form_errors
    }

    pub fn has_errors(&self) -> bool {
        !self.registry.invalid_fields().is_empty()
    }

    /// Route backend errors to their fields; unknown fields become form-level errors
    pub fn apply_server_errors(&mut self, errors: Vec<FieldError>) {
        self.form_errors.clear();
        let mut by_field: Vec<(String, Vec<FieldError>)> = Vec::new();
        for error in errors {
            if self.registry.get(&error.field).is_none() {
                self.form_errors.push(error.message);
                continue;
            }
            match by_field.iter_mut().find(|(name, _)| *name == error.field) {
                Some((_, list)) => list.push(error),
                None => by_field.push((error.field.clone(), vec![error])),
            }
        }
        for (name, list) in by_field {
            if let Err(err) = self.registry.set_errors(&name, list) {
                tracing::warn!("cannot attach server errors: {err}");
            }
        }
    }

    pub fn set_form_error(&mut self, message: impl Into<String>) {
        self.form_errors = vec![message.into()];
    }

    /// Hand out the whole value object, or nothing.
    ///
    /// Fields that were never edited are validated first. On success the form is reset.
    pub fn submit(&mut self) -> Result<FormValue, FormError> {
        if !self.mounted {
            return Err(FormError::Unmounted);
        }
        self.registry.validate_untouched();
        let invalid = self.registry.invalid_fields();
        if !invalid.is_empty() {
            tracing::debug!(fields = ?invalid, "submission blocked");
            return Err(FormError::ValidationBlocked { fields: invalid });
        }
        let value = self.registry.value_object();
        self.registry.reset();
        self.form_errors.clear();
        self.active_field_index = 0;
        Ok(value)
    }

    /// Put a previously submitted value back, e.g. after the mutation failed
    pub fn restore(&mut self, value: FormValue) {
        for (name, field_value) in value.iter() {
            if let Err(err) = self.registry.restore_value(name, field_value.clone()) {
                tracing::warn!("cannot restore form value: {err}");
            }
        }
    }

    /// Stop accepting edits; the view is gone
    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn active_field_name(&self) -> Option<&str> {
        self.registry
            .entries()
            .get(self.active_field_index)
            .map(|e| e.spec.name.as_str())
    }

    /// Append a character to the active field's raw text
    pub fn push_char(&mut self, c: char) -> Result<(), FormError> {
        let Some(name) = self.active_field_name().map(str::to_string) else {
            return Ok(());
        };
        let mut raw = self.value(&name).map(FieldValue::display_value).unwrap_or_default();
        raw.push(c);
        self.set_value(&name, &raw)
    }

    /// Remove the last character of the active field's raw text
    pub fn pop_char(&mut self) -> Result<(), FormError> {
        let Some(name) = self.active_field_name().map(str::to_string) else {
            return Ok(());
        };
        let mut raw = self.value(&name).map(FieldValue::display_value).unwrap_or_default();
        raw.pop();
        self.set_value(&name, &raw)
    }

    pub fn is_active_field_multiline(&self) -> bool {
        self.registry
            .entries()
            .get(self.active_field_index)
            .is_some_and(|e| e.spec.is_multiline)
    }
}

impl Form for FormBinder {
    fn field_count(&self) -> usize {
        self.registry.len()
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(self.registry.len().saturating_sub(1));
    }
}
