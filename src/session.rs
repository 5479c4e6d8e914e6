//! Session credential and login redirect.
//!
//! SYSTEM CONTEXT
//! ==============
//! The host owns the session. It passes the bearer credential into every
//! controller call; the controller forwards it to the remote and never stores
//! it beyond the cycle that needs it.

use std::fmt;

pub const LOGIN_PATH: &str = "/auth/LogIn";
pub const LOGIN_REQUIRED_MESSAGE: &str = "Please log in to access this event";
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired, please log in again";

/// Opaque bearer token supplied by the host.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a stored token. Blank tokens count as logged out.
    #[must_use]
    pub fn from_token(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Where to send a user who must log in, and where to bring them back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRedirect {
    pub path: &'static str,
    pub from: String,
    pub message: &'static str,
}

impl LoginRedirect {
    #[must_use]
    pub fn login_required(from: impl Into<String>) -> Self {
        Self { path: LOGIN_PATH, from: from.into(), message: LOGIN_REQUIRED_MESSAGE }
    }

    #[must_use]
    pub fn session_expired(from: impl Into<String>) -> Self {
        Self { path: LOGIN_PATH, from: from.into(), message: SESSION_EXPIRED_MESSAGE }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
