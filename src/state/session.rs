//! Session identity and configuration values
//!
//! Both are supplied by the backend and are read-only for the rest of the client.
//! They are threaded explicitly into the screens that need them.

use serde_json::Value;
use std::collections::BTreeMap;

/// Identity of the signed-in user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub is_admin: bool,
}

/// Session state; `Pending` until the backend has answered
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionInfo {
    #[default]
    Pending,
    Ready(Identity),
}

impl SessionInfo {
    pub fn is_ready(&self) -> bool {
        matches!(self, SessionInfo::Ready(_))
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            SessionInfo::Ready(identity) => Some(&identity.user_id),
            SessionInfo::Pending => None,
        }
    }

    /// Privileged; always false while pending
    pub fn is_admin(&self) -> bool {
        matches!(self, SessionInfo::Ready(identity) if identity.is_admin)
    }
}

/// Named configuration values (e.g. `General.NotificationDisclaimer`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigValues(BTreeMap<String, Value>);

impl ConfigValues {
    pub fn new(values: BTreeMap<String, Value>) -> Self {
        Self(values)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn get_bool(&self, name: &str) -> bool {
        self.get(name).and_then(Value::as_bool).unwrap_or(false)
    }
}

/// Read-only context handed to controllers and binders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppContext {
    pub session: SessionInfo,
    pub config: ConfigValues,
}

impl AppContext {
    pub fn ready(identity: Identity, config: ConfigValues) -> Self {
        Self {
            session: SessionInfo::Ready(identity),
            config,
        }
    }
}
