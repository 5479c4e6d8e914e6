use super::*;

#[test]
fn flip_inactive_increments_count() {
    let state = EngagementState::new(false, 5).flipped();
    assert_eq!(state.values(), (true, 6));
}

#[test]
fn flip_active_decrements_count() {
    let state = EngagementState::new(true, 6).flipped();
    assert_eq!(state.values(), (false, 5));
}

#[test]
fn flip_never_goes_below_zero() {
    // Server said "liked" with a zero counter; unliking must not underflow.
    let state = EngagementState::new(true, 0).flipped();
    assert_eq!(state.values(), (false, 0));
}

#[test]
fn double_flip_nets_out() {
    let start = EngagementState::new(false, 5);
    assert_eq!(start.flipped().flipped(), start);
}

#[test]
fn flip_preserves_pending_flag() {
    let state = EngagementState { active: false, count: 1, pending: true }.flipped();
    assert!(state.pending);
}

#[test]
fn kind_wire_names() {
    assert_eq!(EngagementKind::Like.toggle_path(), "toggle-like");
    assert_eq!(EngagementKind::Save.toggle_path(), "toggle-save");
    assert_eq!(EngagementKind::Like.active_field(), "isLiked");
    assert_eq!(EngagementKind::Like.count_field(), "interestingCount");
    assert_eq!(EngagementKind::Save.active_field(), "isSaved");
    assert_eq!(EngagementKind::Save.count_field(), "saveCount");
}

#[test]
fn object_id_shape() {
    assert!(SubjectId::new("65a1f0c2b3d4e5f601234567").looks_like_object_id());
    assert!(!SubjectId::new("65a1f0c2b3d4e5f60123456").looks_like_object_id());
    assert!(!SubjectId::new("65a1f0c2b3d4e5f60123456z").looks_like_object_id());
    assert!(!SubjectId::new("").looks_like_object_id());
}

#[test]
fn key_display() {
    let key = EngagementKey::new("e1", EngagementKind::Save);
    assert_eq!(key.to_string(), "e1:save");
}

#[test]
fn state_serializes_flat() {
    let json = serde_json::to_value(EngagementState::new(true, 3)).unwrap();
    assert_eq!(json, serde_json::json!({ "active": true, "count": 3, "pending": false }));
}
