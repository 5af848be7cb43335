//! Integration tests for weft-types.

use weft_types::{GroupMask, WeftError};

// ─── GroupMask Tests ──────────────────────────────────────────

#[test]
fn mask_intersection() {
    let panel_a = GroupMask(0b01);
    let panel_b = GroupMask(0b10);
    let both = GroupMask(0b11);

    assert!(!panel_a.intersects(panel_b));
    assert!(panel_a.intersects(both));
    assert!(both.intersects(panel_b));
}

#[test]
fn mask_all_matches_everything() {
    assert!(GroupMask::ALL.intersects(GroupMask(1)));
    assert!(GroupMask::ALL.intersects(GroupMask(1 << 31)));
    assert!(!GroupMask::ALL.intersects(GroupMask::NONE));
}

#[test]
fn mask_union() {
    let merged = GroupMask(0b01).union(GroupMask(0b10));
    assert_eq!(merged, GroupMask(0b11));
}

#[test]
fn empty_mask_promotes_to_all() {
    assert_eq!(GroupMask::NONE.or_all(), GroupMask::ALL);
    assert_eq!(GroupMask(0b10).or_all(), GroupMask(0b10));
}

#[test]
fn mask_serialization() {
    let mask = GroupMask(0xdead_beef);
    let json = serde_json::to_string(&mask).unwrap();
    let recovered: GroupMask = serde_json::from_str(&json).unwrap();
    assert_eq!(recovered, mask);
}

// ─── Error Tests ──────────────────────────────────────────────

#[test]
fn error_messages_carry_context() {
    let err = WeftError::InvalidMesh("normals missing".into());
    assert_eq!(err.to_string(), "Invalid mesh: normals missing");

    let err = WeftError::InvalidConfig("angle out of range".into());
    assert!(err.to_string().contains("angle out of range"));
}
