//! Logout
//!
//! Ending the session is best effort: whatever happens to the request, local auth
//! state is cleared and the caller gets a redirect target.

use crate::api::LogoutTransport;
use crate::error::FetchError;

/// Local authentication state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthState {
    pub logged_in: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self { logged_in: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogoutMode {
    /// Skip the server call; the session already ended elsewhere
    Immediate,
    #[default]
    WithRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutOutcome {
    /// Result of the server call, `None` in immediate mode
    pub request: Option<Result<(), FetchError>>,
    pub redirect: String,
}

/// End the session, then clear local state and redirect regardless of the request outcome
pub async fn logout<T: LogoutTransport + ?Sized>(
    transport: &T,
    mode: LogoutMode,
    auth: &mut AuthState,
    redirect: &str,
) -> LogoutOutcome {
    let request = match mode {
        LogoutMode::Immediate => None,
        LogoutMode::WithRequest => {
            let result = transport.end_session().await;
            if let Err(err) = &result {
                tracing::warn!("logout request failed: {err}");
            }
            Some(result)
        }
    };

    auth.logged_in = false;
    tracing::info!(redirect, "logged out");

    LogoutOutcome {
        request,
        redirect: redirect.to_string(),
    }
}
