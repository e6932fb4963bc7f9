//! Create dialog: a form binder plus the mutation that persists it

use super::binder::FormBinder;
use super::registry::FormValue;
use crate::api::RecordSink;
use crate::error::{FormError, MutationError};
use crate::state::{CreateAffordance, CreatedRecord, DialogResult};
use serde_json::Value;

/// Builds the mutation input from a submitted value
pub type InputBuilder = Box<dyn Fn(&FormValue) -> Value + Send>;

/// A submission handed to the backend; keeps the value so it can be restored on failure
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmit {
    pub mutation: &'static str,
    pub input: Value,
    value: FormValue,
}

pub struct FormDialog {
    label: &'static str,
    mutation: &'static str,
    build_form: fn() -> FormBinder,
    build_input: InputBuilder,
    form: Option<FormBinder>,
    in_flight: Option<FormValue>,
    result: Option<DialogResult>,
}

impl FormDialog {
    pub fn new(
        label: &'static str,
        mutation: &'static str,
        build_form: fn() -> FormBinder,
        build_input: InputBuilder,
    ) -> Self {
        Self {
            label,
            mutation,
            build_form,
            build_input,
            form: None,
            in_flight: None,
            result: None,
        }
    }

    pub fn form(&self) -> Option<&FormBinder> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut FormBinder> {
        self.form.as_mut()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Close without creating anything
    pub fn cancel(&mut self) {
        if let Some(mut form) = self.form.take() {
            form.unmount();
        }
        self.in_flight = None;
        self.result = Some(DialogResult::Cancelled);
    }

    /// Validate and take the form value; `Ok(None)` when closed or already submitting
    pub fn begin_submit(&mut self) -> Result<Option<PendingSubmit>, FormError> {
        if self.in_flight.is_some() {
            return Ok(None);
        }
        let Some(form) = self.form.as_mut() else {
            return Ok(None);
        };
        let value = form.submit()?;
        let input = (self.build_input)(&value);
        self.in_flight = Some(value.clone());
        Ok(Some(PendingSubmit {
            mutation: self.mutation,
            input,
            value,
        }))
    }

    /// Settle a submission started by `begin_submit`.
    ///
    /// Success closes the dialog; failures reopen the form with the submitted values
    /// and the backend's errors.
    pub fn finish_submit(&mut self, result: Result<CreatedRecord, MutationError>) {
        let Some(value) = self.in_flight.take() else {
            tracing::debug!("ignoring mutation result for a closed dialog");
            return;
        };
        let Some(form) = self.form.as_mut() else {
            return;
        };
        match result {
            Ok(record) => {
                tracing::info!(id = %record.id, "{} created", self.label);
                if let Some(mut form) = self.form.take() {
                    form.unmount();
                }
                self.result = Some(DialogResult::Created(record));
            }
            Err(MutationError::Fields(errors)) => {
                form.restore(value);
                form.apply_server_errors(errors);
            }
            Err(MutationError::Fetch(err)) => {
                tracing::warn!("create {} failed: {err}", self.label);
                form.restore(value);
                form.set_form_error(err.to_string());
            }
        }
    }

    /// Submit through `sink` and settle the result
    pub async fn submit<S: RecordSink + ?Sized>(&mut self, sink: &S) -> Result<(), FormError> {
        if let Some(pending) = self.begin_submit()? {
            let result = sink.create(pending.mutation, pending.input).await;
            self.finish_submit(result);
        }
        Ok(())
    }
}

impl CreateAffordance for FormDialog {
    fn label(&self) -> &str {
        self.label
    }

    fn open(&mut self) {
        self.form = Some((self.build_form)());
        self.in_flight = None;
        self.result = None;
    }

    fn is_open(&self) -> bool {
        self.form.is_some()
    }

    fn take_result(&mut self) -> Option<DialogResult> {
        self.result.take()
    }
}
