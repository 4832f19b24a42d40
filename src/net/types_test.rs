use super::*;

// =============================================================
// User registry records
// =============================================================

#[test]
fn user_record_parses() {
    let record: UserRecord = serde_json::from_str(
        r#"{"id":"u-1","email":"a@x.com","role":"admin","name":"Ada"}"#,
    )
    .expect("user record");
    assert_eq!(record.role, "admin");
    assert_eq!(record.name.as_deref(), Some("Ada"));
}

#[test]
fn user_record_without_role_is_rejected() {
    // A registry row without a role is malformed; the lookup must fail
    // rather than default to a grant.
    let result = serde_json::from_str::<UserRecord>(r#"{"id":"u-1","email":"a@x.com"}"#);
    assert!(result.is_err());
}

#[test]
fn user_record_ignores_unknown_fields() {
    let record: UserRecord = serde_json::from_str(
        r#"{"id":"u-1","email":"a@x.com","role":"user","createdAt":"2024-01-01"}"#,
    )
    .expect("user record");
    assert_eq!(record.role, "user");
}

// =============================================================
// Lessons
// =============================================================

#[test]
fn lesson_optional_fields_default() {
    let lesson: Lesson =
        serde_json::from_str(r#"{"id":"l-1","title":"Intro to knots"}"#).expect("lesson");
    assert!(!lesson.premium);
    assert!(lesson.description.is_none());
    assert!(lesson.video_url.is_none());
    assert!(lesson.author_email.is_none());
}

#[test]
fn lesson_parses_full_shape() {
    let lesson: Lesson = serde_json::from_str(
        r#"{
            "id": "l-2",
            "title": "Advanced knots",
            "description": "Bowlines and beyond",
            "video_url": "https://cdn.x.app/l-2.mp4",
            "premium": true,
            "author_email": "a@x.com"
        }"#,
    )
    .expect("lesson");
    assert!(lesson.premium);
    assert_eq!(lesson.author_email.as_deref(), Some("a@x.com"));
}

// =============================================================
// Checkout
// =============================================================

#[test]
fn checkout_request_roots_callbacks_at_origin() {
    let request = CheckoutRequest::premium_for_origin("https://learnhub.app");
    assert_eq!(request.success_url, "https://learnhub.app/payment/success");
    assert_eq!(request.cancel_url, "https://learnhub.app/payment/cancel");
    assert_eq!(request.plan, "premium-monthly");
}

#[test]
fn checkout_request_trims_trailing_slash() {
    let request = CheckoutRequest::premium_for_origin("https://learnhub.app/");
    assert_eq!(request.success_url, "https://learnhub.app/payment/success");
}

#[test]
fn checkout_session_parses() {
    let session: CheckoutSession =
        serde_json::from_str(r#"{"url":"https://pay.example.com/cs_123"}"#).expect("session");
    assert_eq!(session.url, "https://pay.example.com/cs_123");
}
