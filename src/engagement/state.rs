//! Engagement identifiers and the per-pair state snapshot.
//!
//! DESIGN
//! ======
//! `EngagementState` is what a host renders: the viewer's flag, the global
//! counter, and whether a confirmation is still outstanding. Counters are
//! unsigned and decrements saturate, so a stale or inconsistent starting
//! count can never render as negative.

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// KIND
// =============================================================================

/// The engagement a toggle controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementKind {
    Like,
    Save,
}

impl EngagementKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Save => "save",
        }
    }

    /// Path segment of the REST toggle endpoint under `/events/{id}/`.
    #[must_use]
    pub const fn toggle_path(self) -> &'static str {
        match self {
            Self::Like => "toggle-like",
            Self::Save => "toggle-save",
        }
    }

    /// JSON field holding the viewer's flag in event documents.
    #[must_use]
    pub const fn active_field(self) -> &'static str {
        match self {
            Self::Like => "isLiked",
            Self::Save => "isSaved",
        }
    }

    /// JSON field holding the global counter in event documents.
    #[must_use]
    pub const fn count_field(self) -> &'static str {
        match self {
            Self::Like => "interestingCount",
            Self::Save => "saveCount",
        }
    }
}

impl fmt::Display for EngagementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// SUBJECT
// =============================================================================

/// Opaque identifier of the engaged subject (an event).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(String);

impl SubjectId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for 24 hex digits, the shape of backend event ids.
    #[must_use]
    pub fn looks_like_object_id(&self) -> bool {
        self.0.len() == 24 && self.0.bytes().all(|b| b.is_ascii_hexdigit())
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubjectId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SubjectId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One (subject, kind) pair. Each pair owns exactly one controller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EngagementKey {
    pub subject: SubjectId,
    pub kind: EngagementKind,
}

impl EngagementKey {
    #[must_use]
    pub fn new(subject: impl Into<SubjectId>, kind: EngagementKind) -> Self {
        Self { subject: subject.into(), kind }
    }
}

impl fmt::Display for EngagementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.subject, self.kind)
    }
}

// =============================================================================
// STATE
// =============================================================================

/// Controller phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    /// Flipped locally; a confirmation is scheduled or in flight.
    OptimisticPending,
}

/// Renderable snapshot for one (subject, kind) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EngagementState {
    pub active: bool,
    pub count: u64,
    pub pending: bool,
}

impl EngagementState {
    #[must_use]
    pub const fn new(active: bool, count: u64) -> Self {
        Self { active, count, pending: false }
    }

    /// Invert `active` and move `count` one step in the same direction.
    #[must_use]
    pub const fn flipped(self) -> Self {
        let active = !self.active;
        let count = if active { self.count.saturating_add(1) } else { self.count.saturating_sub(1) };
        Self { active, count, pending: self.pending }
    }

    #[must_use]
    pub const fn values(self) -> (bool, u64) {
        (self.active, self.count)
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
