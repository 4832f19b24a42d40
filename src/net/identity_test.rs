use super::*;

use crate::state::session::Principal;

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
// Change stream subscriptions
// =============================================================

#[test]
fn emitted_changes_reach_subscribers() {
    let provider = MockIdentityProvider::new();
    let seen: Rc<RefCell<Vec<Option<String>>>> = Rc::new(RefCell::new(Vec::new()));

    let sink = seen.clone();
    let _sub = provider.subscribe(Rc::new(move |p: Option<Principal>| {
        sink.borrow_mut().push(p.map(|p| p.email));
    }));

    provider.emit(Some(principal("a@x.com")));
    provider.emit(None);

    assert_eq!(*seen.borrow(), vec![Some("a@x.com".to_owned()), None]);
}

#[test]
fn unsubscribe_stops_delivery_and_is_idempotent() {
    let provider = MockIdentityProvider::new();
    let seen: Rc<RefCell<Vec<Option<String>>>> = Rc::new(RefCell::new(Vec::new()));

    let sink = seen.clone();
    let sub = provider.subscribe(Rc::new(move |p: Option<Principal>| {
        sink.borrow_mut().push(p.map(|p| p.email));
    }));
    assert!(sub.is_active());

    sub.unsubscribe();
    sub.unsubscribe();
    assert!(!sub.is_active());
    assert_eq!(provider.listener_count(), 0);

    provider.emit(Some(principal("a@x.com")));
    assert!(seen.borrow().is_empty());
}

#[test]
fn dropping_the_handle_unsubscribes() {
    let provider = MockIdentityProvider::new();
    {
        let _sub = provider.subscribe(Rc::new(|_| {}));
        assert_eq!(provider.listener_count(), 1);
    }
    assert_eq!(provider.listener_count(), 0);
}

#[test]
fn every_subscriber_is_notified() {
    let provider = MockIdentityProvider::new();
    let count = Rc::new(Cell::new(0));

    let first = count.clone();
    let _a = provider.subscribe(Rc::new(move |_| first.set(first.get() + 1)));
    let second = count.clone();
    let _b = provider.subscribe(Rc::new(move |_| second.set(second.get() + 1)));

    provider.emit(None);
    assert_eq!(count.get(), 2);
}

// =============================================================
// Scripted operations
// =============================================================

#[test]
fn scripted_sign_in_pops_queued_results() {
    let provider = MockIdentityProvider::new();
    provider.queue_result(Ok(principal("a@x.com")));
    provider.queue_result(Err(AuthError::InvalidCredential));

    let first = futures::executor::block_on(provider.sign_in("a@x.com", "pw"));
    assert_eq!(first.map(|p| p.email), Ok("a@x.com".to_owned()));

    let second = futures::executor::block_on(provider.sign_in("a@x.com", "pw"));
    assert_eq!(second, Err(AuthError::InvalidCredential));
}

#[test]
fn unscripted_operation_fails() {
    let provider = MockIdentityProvider::new();
    let result = futures::executor::block_on(provider.sign_up("a@x.com", "pw"));
    assert!(matches!(result, Err(AuthError::Provider(_))));
}

// =============================================================
// Token payloads
// =============================================================

fn grant_json() -> &'static str {
    r#"{
        "idToken": "tok-1",
        "refreshToken": "refresh-1",
        "expiresIn": "3600",
        "localId": "uid-1",
        "email": "a@x.com",
        "displayName": "Ada",
        "photoUrl": "https://cdn.x.app/ada.png"
    }"#
}

#[test]
fn token_response_parses_provider_shape() {
    let grant: TokenResponse = serde_json::from_str(grant_json()).expect("token response");
    assert_eq!(grant.id_token, "tok-1");
    assert_eq!(grant.local_id, "uid-1");
    assert_eq!(grant.expires_in_secs(), 3600);
}

#[test]
fn expires_in_defaults_to_an_hour() {
    let grant: TokenResponse =
        serde_json::from_str(r#"{"idToken":"t","localId":"u"}"#).expect("token response");
    assert_eq!(grant.expires_in_secs(), 3600);

    let grant: TokenResponse =
        serde_json::from_str(r#"{"idToken":"t","localId":"u","expiresIn":"soon"}"#)
            .expect("token response");
    assert_eq!(grant.expires_in_secs(), 3600);
}

#[test]
fn principal_built_from_grant() {
    let grant: TokenResponse = serde_json::from_str(grant_json()).expect("token response");
    let principal = principal_from_token(&grant);

    assert_eq!(principal.uid, "uid-1");
    assert_eq!(principal.email, "a@x.com");
    assert_eq!(principal.display_name.as_deref(), Some("Ada"));
    assert_eq!(principal.token, "tok-1");
}

#[test]
fn principal_email_defaults_empty_when_absent() {
    let grant: TokenResponse =
        serde_json::from_str(r#"{"idToken":"t","localId":"u"}"#).expect("token response");
    assert_eq!(principal_from_token(&grant).email, "");
}

#[test]
fn popup_message_parses_flattened_grant() {
    let message: ProviderMessage = serde_json::from_str(
        r#"{"state":"nonce-1","idToken":"tok-1","localId":"uid-1","email":"a@x.com"}"#,
    )
    .expect("provider message");
    assert_eq!(message.state, "nonce-1");
    assert_eq!(message.token.id_token, "tok-1");
}

// =============================================================
// Error mapping
// =============================================================

#[test]
fn credential_codes_map_to_invalid_credential() {
    assert_eq!(auth_error_from_code("EMAIL_NOT_FOUND"), AuthError::InvalidCredential);
    assert_eq!(auth_error_from_code("INVALID_PASSWORD"), AuthError::InvalidCredential);
    assert_eq!(auth_error_from_code("INVALID_LOGIN_CREDENTIALS"), AuthError::InvalidCredential);
}

#[test]
fn account_codes_map_to_specific_errors() {
    assert_eq!(auth_error_from_code("EMAIL_EXISTS"), AuthError::EmailInUse);
    assert_eq!(
        auth_error_from_code("WEAK_PASSWORD : Password should be at least 6 characters"),
        AuthError::WeakPassword
    );
}

#[test]
fn unknown_codes_surface_as_provider_errors() {
    assert!(matches!(auth_error_from_code("SOMETHING_NEW"), AuthError::Provider(_)));
}

#[test]
fn error_body_parses_provider_code() {
    let body = r#"{"error":{"message":"EMAIL_EXISTS"}}"#;
    assert_eq!(auth_error_from_body(400, body), AuthError::EmailInUse);
}

#[test]
fn unreadable_error_body_falls_back_to_status() {
    let err = auth_error_from_body(502, "<html>bad gateway</html>");
    assert!(matches!(err, AuthError::Provider(ref m) if m.contains("502")));
}

// =============================================================
// Refresh scheduling
// =============================================================

#[test]
fn refresh_runs_a_minute_early_with_a_floor() {
    assert_eq!(refresh_delay_secs(3600), 3540);
    assert_eq!(refresh_delay_secs(120), 60);
    assert_eq!(refresh_delay_secs(60), 30);
    assert_eq!(refresh_delay_secs(10), 30);
}
