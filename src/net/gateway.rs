//! Authenticated request gateway for the REST backend.
//!
//! Every outbound call carries the current principal's bearer credential when
//! one exists; a call with no principal proceeds unauthenticated and it is
//! the caller's job to guard the view. A 401 or 403 response forces a
//! sign-out on the session store and redirects to the sign-in entry point,
//! and the failing call still rejects so its caller can short-circuit. No
//! retries, no token refresh; refreshed tokens arrive through the provider
//! subscription.

#[cfg(test)]
#[path = "gateway_test.rs"]
mod gateway_test;

use leptos::prelude::*;
use thiserror::Error;

use crate::state::session::{Principal, SessionStore};

/// Route the gateway redirects to when the backend rejects a credential.
pub const SIGN_IN_ROUTE: &str = "/login";

/// Errors from backend calls.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// 401/403: the credential was rejected; the session has been cleared.
    #[error("your session has expired; please sign in again")]
    AuthRejected(u16),
    /// Any other non-success status, passed through for caller handling.
    #[error("the server responded with status {0}")]
    Status(u16),
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected response shape: {0}")]
    Decode(String),
    /// Browser-only operation invoked outside the browser.
    #[error("not available outside the browser")]
    Unavailable,
}

/// What the gateway does with a response status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseClass {
    Success,
    /// Credential rejected: force sign-out and redirect.
    AuthRejected,
    /// Pass through to the caller.
    Failure,
}

/// Classify a response status. Only 401 and 403 trigger the auth
/// interception path.
#[must_use]
pub fn classify_status(status: u16) -> ResponseClass {
    match status {
        200..=299 => ResponseClass::Success,
        401 | 403 => ResponseClass::AuthRejected,
        _ => ResponseClass::Failure,
    }
}

/// Bearer header value for the given principal, if any.
#[must_use]
pub fn bearer_header(principal: Option<&Principal>) -> Option<String> {
    principal.map(|p| format!("Bearer {}", p.token))
}

/// Join the backend base URL with a request path.
#[must_use]
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

/// Copyable handle wrapping backend access. Constructed once in `App` and
/// provided via context.
#[derive(Clone, Copy)]
pub struct Gateway {
    session: SessionStore,
    base_url: StoredValue<String>,
}

impl Gateway {
    #[must_use]
    pub fn new(session: SessionStore, base_url: String) -> Self {
        Self { session, base_url: StoredValue::new(base_url) }
    }

    fn url(&self, path: &str) -> String {
        self.base_url.with_value(|base| join_url(base, path))
    }

    fn bearer(&self) -> Option<String> {
        bearer_header(self.session.principal_untracked().as_ref())
    }

    /// Apply the interception policy to a status. On 401/403 the session is
    /// cleared and the user is sent to the sign-in page; the error is still
    /// returned so the caller stops its own flow.
    fn check_status(&self, status: u16) -> Result<(), ApiError> {
        match classify_status(status) {
            ResponseClass::Success => Ok(()),
            ResponseClass::AuthRejected => {
                leptos::logging::warn!("backend rejected credential ({status}); signing out");
                self.session.force_sign_out();
                redirect_to_sign_in();
                Err(ApiError::AuthRejected(status))
            }
            ResponseClass::Failure => Err(ApiError::Status(status)),
        }
    }
}

#[cfg(feature = "csr")]
fn redirect_to_sign_in() {
    if let Some(window) = web_sys::window() {
        let _ = window.location().set_href(SIGN_IN_ROUTE);
    }
}

#[cfg(not(feature = "csr"))]
fn redirect_to_sign_in() {}

#[cfg(feature = "csr")]
impl Gateway {
    fn apply_bearer(
        &self,
        request: gloo_net::http::RequestBuilder,
    ) -> gloo_net::http::RequestBuilder {
        match self.bearer() {
            Some(value) => request.header("Authorization", &value),
            None => request,
        }
    }

    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ApiError> {
        let request = self.apply_bearer(gloo_net::http::Request::get(&self.url(path)));
        let response =
            request.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
        self.check_status(response.status())?;
        response.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub async fn post_json<T: serde::de::DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self
            .apply_bearer(gloo_net::http::Request::post(&self.url(path)))
            .json(body)
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let response =
            request.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
        self.check_status(response.status())?;
        response.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let request = self.apply_bearer(gloo_net::http::Request::delete(&self.url(path)));
        let response =
            request.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
        self.check_status(response.status())
    }
}
