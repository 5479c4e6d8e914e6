//! Registry of toggle controllers, one per (subject, kind) pair.
//!
//! SYSTEM CONTEXT
//! ==============
//! Event cards and the event page share controllers through the registry
//! rather than each keeping its own like/save state. Removing a subject
//! disposes all of its controllers.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::controller::ToggleController;
use super::state::{EngagementKey, EngagementState, SubjectId};
use crate::error::EngagementError;
use crate::remote::EngagementRemote;
use crate::session::Credential;

pub struct EngagementRegistry {
    remote: Arc<dyn EngagementRemote>,
    debounce: Duration,
    controllers: HashMap<EngagementKey, ToggleController>,
}

impl EngagementRegistry {
    #[must_use]
    pub fn new(remote: Arc<dyn EngagementRemote>, debounce: Duration) -> Self {
        Self { remote, debounce, controllers: HashMap::new() }
    }

    /// Controller for `key`, created from the given values if absent.
    pub fn open(&mut self, key: EngagementKey, active: bool, count: u64) -> &ToggleController {
        let remote = &self.remote;
        let debounce = self.debounce;
        self.controllers
            .entry(key)
            .or_insert_with_key(|key| ToggleController::init(key.clone(), active, count, Arc::clone(remote), debounce))
    }

    /// Controller for `key`, seeded from the remote status if absent.
    pub async fn load(&mut self, key: EngagementKey, credential: Option<&Credential>) -> &ToggleController {
        if !self.controllers.contains_key(&key) {
            let controller =
                ToggleController::load(key.clone(), credential, Arc::clone(&self.remote), self.debounce).await;
            self.controllers.insert(key.clone(), controller);
        }
        &self.controllers[&key]
    }

    #[must_use]
    pub fn get(&self, key: &EngagementKey) -> Option<&ToggleController> {
        self.controllers.get(key)
    }

    #[must_use]
    pub fn state(&self, key: &EngagementKey) -> Option<EngagementState> {
        self.get(key).map(ToggleController::state)
    }

    /// Toggle the controller registered for `key`.
    ///
    /// # Errors
    ///
    /// `NotFound` if no controller is registered, otherwise whatever
    /// `ToggleController::toggle` returns.
    pub fn toggle(&self, key: &EngagementKey, credential: Option<&Credential>) -> Result<EngagementState, EngagementError> {
        self.get(key).ok_or(EngagementError::NotFound)?.toggle(credential)
    }

    /// Dispose and forget every controller of `subject`. Returns how many were removed.
    pub fn dispose_subject(&mut self, subject: &SubjectId) -> usize {
        let before = self.controllers.len();
        self.controllers.retain(|key, controller| {
            if &key.subject == subject {
                controller.dispose();
                false
            } else {
                true
            }
        });
        let removed = before - self.controllers.len();
        debug!(%subject, removed, "subject engagement disposed");
        removed
    }

    pub fn dispose_all(&mut self) {
        for controller in self.controllers.values() {
            controller.dispose();
        }
        self.controllers.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }
}

impl Drop for EngagementRegistry {
    fn drop(&mut self) {
        self.dispose_all();
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
