use super::*;

fn record(email: &str, role: &str) -> UserRecord {
    UserRecord {
        id: format!("u-{email}"),
        email: email.to_owned(),
        role: role.to_owned(),
        name: None,
    }
}

// =============================================================
// Role parsing
// =============================================================

#[test]
fn admin_marker_is_privileged() {
    assert_eq!(Role::parse("admin"), Role::Privileged);
    assert_eq!(Role::parse("Admin"), Role::Privileged);
}

#[test]
fn anything_else_is_regular() {
    assert_eq!(Role::parse("user"), Role::Regular);
    assert_eq!(Role::parse("teacher"), Role::Regular);
    assert_eq!(Role::parse(""), Role::Regular);
}

#[test]
fn first_record_wins() {
    let records = vec![record("a@x.com", "admin"), record("a@x.com", "user")];
    assert_eq!(Role::from_records(&records), Some(Role::Privileged));
}

#[test]
fn empty_lookup_resolves_to_none() {
    assert_eq!(Role::from_records(&[]), None);
}

// =============================================================
// Lookup lifecycle
// =============================================================

#[test]
fn begin_lookup_sets_pending_for_email() {
    let mut state = RoleState::default();
    assert_eq!(state.status, RoleStatus::Unknown);

    state.begin_lookup("a@x.com");
    assert_eq!(state.status, RoleStatus::Pending);
    assert!(state.is_current("a@x.com"));
}

#[test]
fn current_lookup_applies() {
    let mut state = RoleState::default();
    state.begin_lookup("a@x.com");

    assert!(state.apply_lookup("a@x.com", Some(Role::Privileged)));
    assert_eq!(state.status, RoleStatus::Resolved(Role::Privileged));
}

#[test]
fn stale_lookup_never_applies_to_new_email() {
    let mut state = RoleState::default();
    state.begin_lookup("a@x.com");
    state.begin_lookup("b@x.com");

    // The response for the previous principal arrives late.
    assert!(!state.apply_lookup("a@x.com", Some(Role::Privileged)));
    assert_eq!(state.status, RoleStatus::Pending);

    assert!(state.apply_lookup("b@x.com", Some(Role::Regular)));
    assert_eq!(state.status, RoleStatus::Resolved(Role::Regular));
}

#[test]
fn failed_lookup_resolves_failed() {
    let mut state = RoleState::default();
    state.begin_lookup("a@x.com");

    assert!(state.apply_lookup("a@x.com", None));
    assert_eq!(state.status, RoleStatus::Failed);
}

#[test]
fn reset_drops_cached_role() {
    let mut state = RoleState::default();
    state.begin_lookup("a@x.com");
    state.apply_lookup("a@x.com", Some(Role::Privileged));

    state.reset();
    assert_eq!(state.status, RoleStatus::Unknown);
    assert!(!state.is_current("a@x.com"));
}
