//! Field schemas for the create dialogs

use super::binder::FormBinder;
use super::field::{FieldSpec, Validator};
use super::registry::FormValue;
use serde_json::{json, Value};

/// Minimum accepted heartbeat timeout
pub const HEARTBEAT_TIMEOUT_MIN: i64 = 5;
/// Maximum accepted heartbeat timeout
pub const HEARTBEAT_TIMEOUT_MAX: i64 = 9000;

pub const CREATE_HEARTBEAT_MONITOR_MUTATION: &str = r#"
mutation createHeartbeatMonitor($input: CreateHeartbeatMonitorInput!) {
  data: createHeartbeatMonitor(input: $input) {
    id
    name
    timeoutMinutes
  }
}
"#;

pub const CREATE_ROTATION_MUTATION: &str = r#"
mutation createRotation($input: CreateRotationInput!) {
  data: createRotation(input: $input) {
    id
    name
    description
    isFavorite
  }
}
"#;

/// A binder with `fields` registered in order; rejected registrations are logged and skipped
fn build_form(title: &str, fields: impl IntoIterator<Item = FieldSpec>) -> FormBinder {
    let mut form = FormBinder::new(title).with_optional_labels();
    for spec in fields {
        if let Err(err) = form.register(spec) {
            tracing::warn!("{title}: {err}");
        }
    }
    form
}

/// Heartbeat monitor: name plus a timeout in minutes.
///
/// The timeout clamps to 1 rather than the real minimum so "10" can be typed
/// digit by digit; the range validator enforces the real bounds.
pub fn heartbeat_monitor_form() -> FormBinder {
    build_form(
        "Create Heartbeat Monitor",
        [
            FieldSpec::text("name", "Name"),
            FieldSpec::clamped("timeoutMinutes", "Timeout (minutes)", 1, HEARTBEAT_TIMEOUT_MAX)
                .with_validator(Validator::IntRange {
                    min: HEARTBEAT_TIMEOUT_MIN,
                    max: HEARTBEAT_TIMEOUT_MAX,
                }),
        ],
    )
}

pub fn heartbeat_monitor_input(value: &FormValue, service_id: Option<&str>) -> Value {
    let mut input = json!({
        "name": value.text("name").trim(),
        "timeoutMinutes": value.int("timeoutMinutes"),
    });
    if let Some(service_id) = service_id {
        input["serviceID"] = Value::from(service_id);
    }
    input
}

/// Rotation: required name, optional description
pub fn rotation_form() -> FormBinder {
    build_form(
        "Create Rotation",
        [
            FieldSpec::text("name", "Name").with_validator(Validator::MaxLength(255)),
            FieldSpec::text("description", "Description")
                .optional()
                .multiline()
                .with_validator(Validator::MaxLength(1000)),
        ],
    )
}

pub fn rotation_input(value: &FormValue) -> Value {
    json!({
        "name": value.text("name").trim(),
        "description": value.text("description"),
        "timeZone": "Etc/UTC",
        "type": "weekly",
        "shiftLength": 1,
    })
}
