//! Engagement error taxonomy.
//!
//! ERROR HANDLING
//! ==============
//! Every variant is recovered at the controller boundary. Synchronous
//! failures come back from `toggle`; failures of a settled confirmation are
//! broadcast as notices after the state has been rolled back.

use crate::remote::RemoteError;
use crate::session::LoginRedirect;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngagementError {
    /// No credential available locally.
    #[error("login required")]
    Unauthenticated,

    /// The backend rejected the credential.
    #[error("credential rejected by server")]
    Unauthorized,

    /// The subject no longer exists.
    #[error("subject not found")]
    NotFound,

    /// Transport failure or non-success response.
    #[error("network or server error: {0}")]
    NetworkOrServer(String),

    /// The controller was torn down.
    #[error("controller disposed")]
    Disposed,

    /// `toggle` was called outside a Tokio runtime, so no timer can run.
    #[error("no tokio runtime available")]
    NoRuntime,
}

impl EngagementError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "E_UNAUTHENTICATED",
            Self::Unauthorized => "E_UNAUTHORIZED",
            Self::NotFound => "E_NOT_FOUND",
            Self::NetworkOrServer(_) => "E_NETWORK_OR_SERVER",
            Self::Disposed => "E_DISPOSED",
            Self::NoRuntime => "E_NO_RUNTIME",
        }
    }

    /// Whether invoking `toggle` again may succeed without host action.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::NetworkOrServer(_))
    }

    /// Login redirect for auth failures; `None` for everything else.
    #[must_use]
    pub fn login_redirect(&self, from: &str) -> Option<LoginRedirect> {
        match self {
            Self::Unauthenticated => Some(LoginRedirect::login_required(from)),
            Self::Unauthorized => Some(LoginRedirect::session_expired(from)),
            _ => None,
        }
    }
}

impl From<RemoteError> for EngagementError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Unauthorized => Self::Unauthorized,
            RemoteError::NotFound => Self::NotFound,
            other => Self::NetworkOrServer(other.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
