//! Form domain layer
//!
//! Field registration against a single value object, per-field transforms and
//! validation, gated submission, and the create dialogs built on top.

mod binder;
mod dialog;
mod field;
mod registry;
mod schemas;
mod transform;

pub use binder::{Form, FormBinder};
pub use dialog::{FormDialog, InputBuilder, PendingSubmit};
pub use field::{FieldError, FieldSpec, FieldValue, Validator};
pub use registry::{FieldEntry, FieldRegistry, FormValue};
pub use schemas::{
    heartbeat_monitor_form, heartbeat_monitor_input, rotation_form, rotation_input,
    CREATE_HEARTBEAT_MONITOR_MUTATION, CREATE_ROTATION_MUTATION, HEARTBEAT_TIMEOUT_MAX,
    HEARTBEAT_TIMEOUT_MIN,
};
pub use transform::{Transformed, ValueTransform};
