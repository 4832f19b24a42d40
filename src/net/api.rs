//! REST endpoint helpers over the authenticated request gateway.
//!
//! Client-side (csr): real HTTP calls through the gateway.
//! Native builds: stubs so pages compile for tests without a browser.
//!
//! ERROR HANDLING
//! ==============
//! List fetches return `Option` so failures degrade to an empty state in the
//! UI; mutations return `Result` so forms can show the failure.

#![allow(clippy::unused_async)]

use crate::net::gateway::{ApiError, Gateway};
use crate::net::types::{CheckoutRequest, CheckoutSession, Lesson, NewLesson};
use crate::state::role::Role;

/// Resolve the role for `email` from the backend user registry.
///
/// Any failure (network, bad status, malformed records, or no matching
/// record) resolves to `None`; access control treats that as a denial.
pub async fn fetch_role_for_email(gateway: Gateway, email: String) -> Option<Role> {
    #[cfg(feature = "csr")]
    {
        use crate::net::types::UserRecord;

        let path = format!("/users?email={}", encode_query_component(&email));
        let records = match gateway.get_json::<Vec<UserRecord>>(&path).await {
            Ok(records) => records,
            Err(err) => {
                leptos::logging::warn!("role lookup for {email} failed: {err}");
                return None;
            }
        };
        Role::from_records(&records)
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (gateway, email);
        None
    }
}

/// Fetch the public lesson catalog. Returns `None` on any failure.
pub async fn fetch_lessons(gateway: Gateway) -> Option<Vec<Lesson>> {
    #[cfg(feature = "csr")]
    {
        gateway.get_json::<Vec<Lesson>>("/lessons").await.ok()
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = gateway;
        None
    }
}

/// Fetch the lessons authored by `email`.
pub async fn fetch_lessons_by_author(gateway: Gateway, email: String) -> Option<Vec<Lesson>> {
    #[cfg(feature = "csr")]
    {
        let path = format!("/lessons?author={}", encode_query_component(&email));
        gateway.get_json::<Vec<Lesson>>(&path).await.ok()
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (gateway, email);
        None
    }
}

/// Create a lesson.
///
/// # Errors
///
/// Returns the gateway error so the dialog can show it.
pub async fn create_lesson(gateway: Gateway, lesson: NewLesson) -> Result<Lesson, ApiError> {
    #[cfg(feature = "csr")]
    {
        gateway.post_json("/lessons", &lesson).await
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (gateway, lesson);
        Err(ApiError::Unavailable)
    }
}

/// Delete a lesson by id.
///
/// # Errors
///
/// Returns the gateway error so the management view can show it.
pub async fn delete_lesson(gateway: Gateway, id: String) -> Result<(), ApiError> {
    #[cfg(feature = "csr")]
    {
        gateway.delete(&format!("/lessons/{id}")).await
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (gateway, id);
        Err(ApiError::Unavailable)
    }
}

/// Create a premium checkout session; the caller redirects to the returned
/// URL.
///
/// # Errors
///
/// Returns the gateway error so the upgrade page can show it.
pub async fn create_checkout_session(
    gateway: Gateway,
    request: CheckoutRequest,
) -> Result<CheckoutSession, ApiError> {
    #[cfg(feature = "csr")]
    {
        gateway.post_json("/create-checkout-session", &request).await
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (gateway, request);
        Err(ApiError::Unavailable)
    }
}

#[cfg(feature = "csr")]
fn encode_query_component(raw: &str) -> String {
    js_sys::encode_uri_component(raw).into()
}
