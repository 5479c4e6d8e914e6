use std::sync::Mutex;

use async_trait::async_trait;

use super::*;
use crate::engagement::state::EngagementKind;
use crate::remote::{RemoteError, RemoteStatus};

const DEBOUNCE: Duration = Duration::from_millis(300);

/// Server that flips a per-kind flag and records which kinds it saw.
#[derive(Default)]
struct FlippingRemote {
    toggled: Mutex<Vec<EngagementKind>>,
}

#[async_trait]
impl EngagementRemote for FlippingRemote {
    async fn check_status(
        &self,
        _subject: &SubjectId,
        kind: EngagementKind,
        _credential: &Credential,
    ) -> Result<RemoteStatus, RemoteError> {
        match kind {
            EngagementKind::Like => Ok(RemoteStatus::new(true, 3)),
            EngagementKind::Save => Ok(RemoteStatus::new(false, 1)),
        }
    }

    async fn confirm_toggle(
        &self,
        _subject: &SubjectId,
        kind: EngagementKind,
        _credential: &Credential,
    ) -> Result<RemoteStatus, RemoteError> {
        self.toggled.lock().unwrap().push(kind);
        Ok(RemoteStatus::new(true, 100))
    }
}

fn registry() -> (Arc<FlippingRemote>, EngagementRegistry) {
    let fake = Arc::new(FlippingRemote::default());
    let remote: Arc<dyn EngagementRemote> = fake.clone();
    (fake, EngagementRegistry::new(remote, DEBOUNCE))
}

fn cred() -> Credential {
    Credential::from_token("token").unwrap()
}

#[tokio::test(start_paused = true)]
async fn open_is_idempotent_per_key() {
    let (_fake, mut reg) = registry();
    let key = EngagementKey::new("E1", EngagementKind::Like);

    reg.open(key.clone(), false, 5);
    reg.open(key.clone(), true, 99);

    assert_eq!(reg.len(), 1);
    assert_eq!(reg.state(&key), Some(EngagementState::new(false, 5)));
}

#[tokio::test(start_paused = true)]
async fn like_and_save_are_independent() {
    let (fake, mut reg) = registry();
    let like = EngagementKey::new("E1", EngagementKind::Like);
    let save = EngagementKey::new("E1", EngagementKind::Save);
    reg.open(like.clone(), false, 5);
    reg.open(save.clone(), false, 2);

    reg.toggle(&save, Some(&cred())).unwrap();

    assert_eq!(reg.state(&like).unwrap().values(), (false, 5));
    assert_eq!(reg.state(&save).unwrap().values(), (true, 3));

    tokio::time::sleep(DEBOUNCE * 2).await;
    assert_eq!(*fake.toggled.lock().unwrap(), vec![EngagementKind::Save]);
    assert_eq!(reg.state(&like), Some(EngagementState::new(false, 5)));
}

#[tokio::test(start_paused = true)]
async fn toggle_unknown_key_is_not_found() {
    let (_fake, reg) = registry();
    let key = EngagementKey::new("missing", EngagementKind::Like);
    assert_eq!(reg.toggle(&key, Some(&cred())), Err(EngagementError::NotFound));
}

#[tokio::test(start_paused = true)]
async fn load_seeds_from_remote() {
    let (_fake, mut reg) = registry();
    let key = EngagementKey::new("E1", EngagementKind::Like);

    let state = reg.load(key.clone(), Some(&cred())).await.state();

    assert_eq!(state, EngagementState::new(true, 3));
}

#[tokio::test(start_paused = true)]
async fn dispose_subject_stops_all_kinds() {
    let (fake, mut reg) = registry();
    let e1_like = EngagementKey::new("E1", EngagementKind::Like);
    let e1_save = EngagementKey::new("E1", EngagementKind::Save);
    let e2_like = EngagementKey::new("E2", EngagementKind::Like);
    for key in [&e1_like, &e1_save, &e2_like] {
        reg.open(key.clone(), false, 0);
    }

    reg.toggle(&e1_like, Some(&cred())).unwrap();
    reg.toggle(&e1_save, Some(&cred())).unwrap();
    assert_eq!(reg.dispose_subject(&SubjectId::new("E1")), 2);

    tokio::time::sleep(DEBOUNCE * 2).await;
    assert!(fake.toggled.lock().unwrap().is_empty());
    assert_eq!(reg.len(), 1);
    assert!(reg.get(&e2_like).is_some());
}

#[tokio::test(start_paused = true)]
async fn dispose_all_empties_registry() {
    let (fake, mut reg) = registry();
    let key = EngagementKey::new("E1", EngagementKind::Like);
    reg.open(key.clone(), false, 0);
    reg.toggle(&key, Some(&cred())).unwrap();

    reg.dispose_all();
    tokio::time::sleep(DEBOUNCE * 2).await;

    assert!(reg.is_empty());
    assert!(fake.toggled.lock().unwrap().is_empty());
}
