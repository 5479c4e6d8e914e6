//! Remote authority for engagement state.
//!
//! DESIGN
//! ======
//! Controllers talk to the backend only through `EngagementRemote`. The
//! trait is object safe (`async_trait`) so a registry can share one
//! `Arc<dyn EngagementRemote>` across every (subject, kind) pair.

pub mod http;

use async_trait::async_trait;

use crate::engagement::state::{EngagementKind, SubjectId};
use crate::session::Credential;

/// Authoritative (flag, counter) pair as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteStatus {
    pub active: bool,
    pub count: u64,
}

impl RemoteStatus {
    #[must_use]
    pub const fn new(active: bool, count: u64) -> Self {
        Self { active, count }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    #[error("credential rejected")]
    Unauthorized,

    #[error("subject not found")]
    NotFound,

    #[error("server error: status {status}: {message}")]
    Server { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("response parse failed: {0}")]
    Parse(String),
}

#[async_trait]
pub trait EngagementRemote: Send + Sync {
    /// Viewer-specific flag and global counter.
    async fn check_status(
        &self,
        subject: &SubjectId,
        kind: EngagementKind,
        credential: &Credential,
    ) -> Result<RemoteStatus, RemoteError>;

    /// Flip the viewer's engagement on the server and return the new values.
    async fn confirm_toggle(
        &self,
        subject: &SubjectId,
        kind: EngagementKind,
        credential: &Credential,
    ) -> Result<RemoteStatus, RemoteError>;
}
