use super::*;

fn principal(token: &str) -> Principal {
    Principal {
        uid: "uid-1".to_owned(),
        email: "a@x.com".to_owned(),
        display_name: None,
        avatar_url: None,
        token: token.to_owned(),
    }
}

// =============================================================
// Bearer attachment
// =============================================================

#[test]
fn bearer_header_attached_iff_principal_present() {
    assert_eq!(bearer_header(None), None);

    let p = principal("tok-123");
    assert_eq!(bearer_header(Some(&p)), Some("Bearer tok-123".to_owned()));
}

// =============================================================
// Status classification
// =============================================================

#[test]
fn success_statuses_pass() {
    assert_eq!(classify_status(200), ResponseClass::Success);
    assert_eq!(classify_status(204), ResponseClass::Success);
    assert_eq!(classify_status(299), ResponseClass::Success);
}

#[test]
fn only_401_and_403_trigger_auth_interception() {
    assert_eq!(classify_status(401), ResponseClass::AuthRejected);
    assert_eq!(classify_status(403), ResponseClass::AuthRejected);

    assert_eq!(classify_status(400), ResponseClass::Failure);
    assert_eq!(classify_status(402), ResponseClass::Failure);
    assert_eq!(classify_status(404), ResponseClass::Failure);
    assert_eq!(classify_status(500), ResponseClass::Failure);
}

#[test]
fn redirects_and_informational_pass_through_as_failures() {
    assert_eq!(classify_status(101), ResponseClass::Failure);
    assert_eq!(classify_status(302), ResponseClass::Failure);
}

// =============================================================
// URL joining
// =============================================================

#[test]
fn join_url_handles_slash_combinations() {
    assert_eq!(join_url("https://api.x.app", "/lessons"), "https://api.x.app/lessons");
    assert_eq!(join_url("https://api.x.app/", "/lessons"), "https://api.x.app/lessons");
    assert_eq!(join_url("https://api.x.app", "lessons"), "https://api.x.app/lessons");
    assert_eq!(join_url("https://api.x.app/", "lessons"), "https://api.x.app/lessons");
}

#[test]
fn auth_rejection_message_tells_user_to_sign_in() {
    let err = ApiError::AuthRejected(401);
    assert!(err.to_string().contains("sign in"));
}
