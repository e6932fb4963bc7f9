//! Path → view resolution

/// A resolved location in the application
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Rotations,
    RotationDetail(String),
    HeartbeatMonitors,
    /// Anything that doesn't match a known view
    NotFound(String),
}

impl Route {
    /// Resolve a path such as `/rotations/abc?tab=1`
    pub fn resolve(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] | ["rotations"] => Self::Rotations,
            ["rotations", id] => Self::RotationDetail((*id).to_string()),
            ["heartbeat-monitors"] => Self::HeartbeatMonitors,
            _ => Self::NotFound(path.to_string()),
        }
    }

    /// Resolve a path served under `prefix`
    pub fn resolve_prefixed(prefix: &str, path: &str) -> Self {
        let prefix = prefix.trim_end_matches('/');
        match path.strip_prefix(prefix) {
            Some(rest) if prefix.is_empty() || rest.is_empty() || rest.starts_with('/') => {
                Self::resolve(rest)
            }
            _ => Self::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::Rotations => "/rotations".to_string(),
            Self::RotationDetail(id) => format!("/rotations/{id}"),
            Self::HeartbeatMonitors => "/heartbeat-monitors".to_string(),
            Self::NotFound(path) => path.clone(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Rotations => "Rotations",
            Self::RotationDetail(_) => "Rotation",
            Self::HeartbeatMonitors => "Heartbeat Monitors",
            Self::NotFound(_) => "Not Found",
        }
    }
}
