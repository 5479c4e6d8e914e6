//! Engagement toggles for S Event.
//!
//! DESIGN
//! ======
//! A user's "liked" and "saved" flags on an event are toggled optimistically:
//! the local flag and counter flip immediately, a debounced task confirms the
//! final intent against the backend, and the result either overwrites local
//! state (server wins) or rolls the last flip back. One `ToggleController`
//! owns one (event, kind) pair; `EngagementRegistry` keeps them keyed.
//!
//! The backend is reached only through the `EngagementRemote` trait, so hosts
//! and tests can swap `HttpRemote` for anything else.

pub mod config;
pub mod engagement;
pub mod error;
pub mod remote;
pub mod session;

pub use config::EngagementConfig;
pub use engagement::controller::{EngagementNotice, ToggleController};
pub use engagement::registry::EngagementRegistry;
pub use engagement::state::{EngagementKey, EngagementKind, EngagementState, Phase, SubjectId};
pub use error::EngagementError;
pub use remote::http::HttpRemote;
pub use remote::{EngagementRemote, RemoteError, RemoteStatus};
pub use session::{Credential, LoginRedirect};
