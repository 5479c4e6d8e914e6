//! Optimistic toggle controller for one (subject, kind) pair.
//!
//! DESIGN
//! ======
//! `toggle` flips the local flag and counter synchronously, then (re)arms a
//! single debounce timer. When the timer fires, one confirmation request
//! goes out for whatever the flag is at that moment, so a burst of clicks
//! costs one request. On success the server's values replace the local ones;
//! on failure the last optimistic flip is rolled back and a notice is
//! broadcast. A cycle that only re-read the status has nothing to roll back
//! and keeps the displayed intent when the read fails.
//!
//! Every toggle bumps a generation counter. A confirmation only applies its
//! result if its generation is still current and the controller has not been
//! disposed; otherwise the result is discarded. Confirmations for a pair are
//! serialized through an async mutex, so a newer cycle waits for an older
//! in-flight request instead of racing it.
//!
//! The backend toggle endpoint flips server state rather than setting it.
//! The controller therefore tracks the last server-confirmed flag: a cycle
//! whose final intent already matches it re-reads the status instead of
//! flipping. Stale successes still update that baseline, because the server
//! acted on them even though their values are no longer rendered.
//!
//! LOCKING
//! =======
//! `inner` is a blocking mutex and is never held across an `.await`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::state::{EngagementKey, EngagementState, Phase};
use crate::error::EngagementError;
use crate::remote::{EngagementRemote, RemoteError, RemoteStatus};
use crate::session::Credential;

const NOTICE_CAPACITY: usize = 16;

/// Error surfaced by a settled confirmation cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngagementNotice {
    pub key: EngagementKey,
    pub error: EngagementError,
}

// =============================================================================
// CONTROLLER
// =============================================================================

/// Host-facing handle. Dropping it disposes the controller.
pub struct ToggleController {
    shared: Arc<Shared>,
}

struct Shared {
    key: EngagementKey,
    remote: Arc<dyn EngagementRemote>,
    debounce: Duration,
    inner: Mutex<Inner>,
    /// Held for the duration of one remote call.
    flight: tokio::sync::Mutex<()>,
    state_tx: watch::Sender<EngagementState>,
    notice_tx: broadcast::Sender<EngagementNotice>,
}

struct Inner {
    state: EngagementState,
    phase: Phase,
    generation: u64,
    /// Last flag value the server reported.
    confirmed_active: bool,
    /// Values before the most recent optimistic flip.
    rollback: (bool, u64),
    credential: Option<Credential>,
    /// Debounce timer that has not fired yet.
    timer: Option<JoinHandle<()>>,
    disposed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Confirmation {
    Flip,
    Refresh,
}

impl ToggleController {
    /// Create a controller from known initial values. No I/O.
    #[must_use]
    pub fn init(
        key: EngagementKey,
        initial_active: bool,
        initial_count: u64,
        remote: Arc<dyn EngagementRemote>,
        debounce: Duration,
    ) -> Self {
        let state = EngagementState::new(initial_active, initial_count);
        let (state_tx, _) = watch::channel(state);
        let (notice_tx, _) = broadcast::channel(NOTICE_CAPACITY);
        let inner = Inner {
            state,
            phase: Phase::Idle,
            generation: 0,
            confirmed_active: initial_active,
            rollback: state.values(),
            credential: None,
            timer: None,
            disposed: false,
        };
        Self {
            shared: Arc::new(Shared {
                key,
                remote,
                debounce,
                inner: Mutex::new(inner),
                flight: tokio::sync::Mutex::new(()),
                state_tx,
                notice_tx,
            }),
        }
    }

    /// Create a controller seeded from the remote status.
    ///
    /// Falls back to `(false, 0)` when there is no credential or the status
    /// lookup fails.
    pub async fn load(
        key: EngagementKey,
        credential: Option<&Credential>,
        remote: Arc<dyn EngagementRemote>,
        debounce: Duration,
    ) -> Self {
        let initial = match credential {
            None => RemoteStatus::new(false, 0),
            Some(credential) => match remote.check_status(&key.subject, key.kind, credential).await {
                Ok(status) => status,
                Err(e) => {
                    warn!(subject = %key.subject, kind = %key.kind, error = %e, "engagement status check failed");
                    RemoteStatus::new(false, 0)
                }
            },
        };
        Self::init(key, initial.active, initial.count, remote, debounce)
    }

    #[must_use]
    pub fn key(&self) -> &EngagementKey {
        &self.shared.key
    }

    #[must_use]
    pub fn debounce(&self) -> Duration {
        self.shared.debounce
    }

    #[must_use]
    pub fn state(&self) -> EngagementState {
        self.shared.lock().state
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.shared.lock().phase
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.shared.lock().disposed
    }

    /// Snapshot stream; every flip, reconcile and rollback is published.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<EngagementState> {
        self.shared.state_tx.subscribe()
    }

    /// Errors from confirmation cycles that settled with a failure.
    #[must_use]
    pub fn notices(&self) -> broadcast::Receiver<EngagementNotice> {
        self.shared.notice_tx.subscribe()
    }

    /// Flip the engagement optimistically and schedule its confirmation.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` without a credential, `NoRuntime` outside a Tokio
    /// runtime and `Disposed` after teardown. State is untouched in all three.
    pub fn toggle(&self, credential: Option<&Credential>) -> Result<EngagementState, EngagementError> {
        let key = &self.shared.key;
        let Some(credential) = credential else {
            debug!(subject = %key.subject, kind = %key.kind, "toggle without credential");
            return Err(EngagementError::Unauthenticated);
        };

        let Ok(runtime) = Handle::try_current() else {
            warn!(subject = %key.subject, kind = %key.kind, "toggle outside a tokio runtime");
            return Err(EngagementError::NoRuntime);
        };

        let mut inner = self.shared.lock();
        if inner.disposed {
            return Err(EngagementError::Disposed);
        }

        inner.rollback = inner.state.values();
        let mut next = inner.state.flipped();
        next.pending = true;
        inner.state = next;
        inner.phase = Phase::OptimisticPending;
        inner.generation += 1;
        inner.credential = Some(credential.clone());

        let generation = inner.generation;
        if let Some(timer) = inner.timer.take() {
            timer.abort();
        }
        inner.timer = Some(Shared::schedule(&runtime, Arc::clone(&self.shared), generation));
        self.shared.state_tx.send_replace(next);
        drop(inner);

        debug!(
            subject = %key.subject,
            kind = %key.kind,
            generation,
            active = next.active,
            count = next.count,
            "optimistic toggle"
        );
        Ok(next)
    }

    /// Cancel pending work. Results of an in-flight request are ignored.
    pub fn dispose(&self) {
        let mut inner = self.shared.lock();
        if inner.disposed {
            return;
        }
        inner.disposed = true;
        inner.generation += 1;
        inner.phase = Phase::Idle;
        inner.credential = None;
        if let Some(timer) = inner.timer.take() {
            timer.abort();
        }
        debug!(subject = %self.shared.key.subject, kind = %self.shared.key.kind, "engagement controller disposed");
    }
}

impl Drop for ToggleController {
    fn drop(&mut self) {
        self.dispose();
    }
}

// =============================================================================
// CONFIRMATION CYCLE
// =============================================================================

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_current(inner: &Inner, generation: u64) -> bool {
        !inner.disposed && inner.generation == generation
    }

    fn schedule(runtime: &Handle, shared: Arc<Self>, generation: u64) -> JoinHandle<()> {
        runtime.spawn(async move {
            tokio::time::sleep(shared.debounce).await;
            shared.confirm(generation).await;
        })
    }

    async fn confirm(&self, generation: u64) {
        // Leave the timer slot: from here on a newer toggle supersedes this
        // cycle through the generation check instead of aborting it.
        {
            let mut inner = self.lock();
            if !Self::is_current(&inner, generation) {
                return;
            }
            inner.timer = None;
        }

        let _flight = self.flight.lock().await;

        let (confirmation, credential) = {
            let inner = self.lock();
            if !Self::is_current(&inner, generation) {
                debug!(subject = %self.key.subject, kind = %self.key.kind, generation, "superseded before request");
                return;
            }
            let Some(credential) = inner.credential.clone() else {
                return;
            };
            let confirmation = if inner.state.active == inner.confirmed_active {
                Confirmation::Refresh
            } else {
                Confirmation::Flip
            };
            (confirmation, credential)
        };

        let result = match confirmation {
            Confirmation::Flip => {
                self.remote
                    .confirm_toggle(&self.key.subject, self.key.kind, &credential)
                    .await
            }
            Confirmation::Refresh => {
                self.remote
                    .check_status(&self.key.subject, self.key.kind, &credential)
                    .await
            }
        };

        self.settle(generation, confirmation, result);
    }

    fn settle(&self, generation: u64, confirmation: Confirmation, result: Result<RemoteStatus, RemoteError>) {
        let key = &self.key;
        let mut inner = self.lock();
        match result {
            Ok(status) => {
                inner.confirmed_active = status.active;
                if !Self::is_current(&inner, generation) {
                    debug!(subject = %key.subject, kind = %key.kind, generation, "discarding stale confirmation");
                    return;
                }
                let settled = EngagementState::new(status.active, status.count);
                self.finish(&mut inner, settled);
                info!(
                    subject = %key.subject,
                    kind = %key.kind,
                    generation,
                    ?confirmation,
                    active = status.active,
                    count = status.count,
                    "engagement confirmed"
                );
            }
            Err(err) => {
                if !Self::is_current(&inner, generation) {
                    debug!(subject = %key.subject, kind = %key.kind, generation, error = %err, "discarding stale failure");
                    return;
                }
                // A failed re-read changed nothing on the server, so the
                // displayed intent stands; only a failed flip is rolled back.
                let settled = match confirmation {
                    Confirmation::Flip => {
                        let (active, count) = inner.rollback;
                        EngagementState::new(active, count)
                    }
                    Confirmation::Refresh => EngagementState::new(inner.state.active, inner.state.count),
                };
                self.finish(&mut inner, settled);
                drop(inner);
                warn!(
                    subject = %key.subject,
                    kind = %key.kind,
                    generation,
                    ?confirmation,
                    error = %err,
                    "engagement confirmation failed"
                );
                let _ = self.notice_tx.send(EngagementNotice { key: key.clone(), error: err.into() });
            }
        }
    }

    fn finish(&self, inner: &mut Inner, settled: EngagementState) {
        inner.state = settled;
        inner.phase = Phase::Idle;
        inner.credential = None;
        self.state_tx.send_replace(settled);
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
