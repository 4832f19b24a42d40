use super::*;

fn principal(email: &str) -> Principal {
    Principal {
        uid: format!("uid-{email}"),
        email: email.to_owned(),
        display_name: None,
        avatar_url: None,
        token: format!("token-{email}"),
    }
}

// =============================================================
// Defaults
// =============================================================

#[test]
fn session_starts_loading_without_principal() {
    let state = SessionState::default();
    assert!(state.loading);
    assert!(state.principal.is_none());
    assert!(!state.is_authenticated());
}

// =============================================================
// Operation ordering
// =============================================================

#[test]
fn completed_op_applies_outcome() {
    let mut state = SessionState::default();
    let token = state.begin_op();
    assert!(state.loading);

    assert!(state.complete_op(token, Some(principal("a@x.com"))));
    assert!(!state.loading);
    assert_eq!(state.principal.as_ref().map(|p| p.email.as_str()), Some("a@x.com"));
}

#[test]
fn superseded_completion_is_ignored() {
    let mut state = SessionState::default();
    let first = state.begin_op();
    let second = state.begin_op();

    assert!(!state.complete_op(first, Some(principal("a@x.com"))));
    assert!(state.loading);
    assert!(state.principal.is_none());

    assert!(state.complete_op(second, None));
    assert!(!state.loading);
    assert!(state.principal.is_none());
}

#[test]
fn slow_sign_in_cannot_resurrect_after_sign_out() {
    let mut state = SessionState::default();

    // Sign-in issued first, sign-out second; sign-out completes first.
    let sign_in = state.begin_op();
    let sign_out = state.begin_op();
    assert!(state.complete_op(sign_out, None));

    // The slow sign-in completes afterwards and must be dropped.
    assert!(!state.complete_op(sign_in, Some(principal("stale@x.com"))));
    assert!(state.principal.is_none());
    assert!(!state.loading);
}

#[test]
fn settled_state_matches_last_completed_operation() {
    let mut state = SessionState::default();

    let first = state.begin_op();
    let second = state.begin_op();

    // Completion order is the reverse of issue order.
    assert!(state.complete_op(second, Some(principal("b@x.com"))));
    assert!(!state.complete_op(first, Some(principal("a@x.com"))));

    assert_eq!(state.principal.as_ref().map(|p| p.email.as_str()), Some("b@x.com"));
}

#[test]
fn failed_op_clears_loading_and_keeps_principal() {
    let mut state = SessionState::default();
    state.apply_provider_change(Some(principal("a@x.com")));

    let token = state.begin_op();
    assert!(state.loading);
    assert!(state.fail_op(token));
    assert!(!state.loading);
    assert_eq!(state.principal.as_ref().map(|p| p.email.as_str()), Some("a@x.com"));
}

#[test]
fn superseded_failure_is_ignored() {
    let mut state = SessionState::default();
    let first = state.begin_op();
    let _second = state.begin_op();

    assert!(!state.fail_op(first));
    assert!(state.loading);
}

// =============================================================
// Provider change stream
// =============================================================

#[test]
fn provider_change_applies_and_settles_loading() {
    let mut state = SessionState::default();
    state.apply_provider_change(Some(principal("a@x.com")));

    assert!(!state.loading);
    assert!(state.is_authenticated());

    state.apply_provider_change(None);
    assert!(!state.is_authenticated());
}

// =============================================================
// Forced sign-out
// =============================================================

#[test]
fn clear_removes_principal_and_supersedes_inflight_ops() {
    let mut state = SessionState::default();
    state.apply_provider_change(Some(principal("a@x.com")));

    let inflight = state.begin_op();
    state.clear();
    assert!(state.principal.is_none());
    assert!(!state.loading);

    assert!(!state.complete_op(inflight, Some(principal("a@x.com"))));
    assert!(state.principal.is_none());
}
