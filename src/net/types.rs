//! Explicit record shapes for backend payloads.
//!
//! The backend is loosely typed; everything it returns is parsed into these
//! structs and a shape mismatch surfaces as a decode error rather than
//! leaking `serde_json::Value` through the app.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Row from the backend user registry (`GET /users?email=`).
///
/// `role` is required: a registry row without one is a malformed record and
/// the lookup fails closed.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// A published lesson.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    /// Premium lessons require an active subscription to watch.
    #[serde(default)]
    pub premium: bool,
    #[serde(default)]
    pub author_email: Option<String>,
}

/// Payload for creating a lesson.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewLesson {
    pub title: String,
    pub description: Option<String>,
    pub premium: bool,
}

/// Checkout session created by the backend; the client redirects to `url`.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct CheckoutSession {
    pub url: String,
}

/// Request to start a premium checkout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CheckoutRequest {
    pub plan: String,
    pub success_url: String,
    pub cancel_url: String,
}

impl CheckoutRequest {
    /// Monthly premium checkout with callback URLs rooted at `origin`.
    #[must_use]
    pub fn premium_for_origin(origin: &str) -> Self {
        let origin = origin.trim_end_matches('/');
        Self {
            plan: "premium-monthly".to_owned(),
            success_url: format!("{origin}/payment/success"),
            cancel_url: format!("{origin}/payment/cancel"),
        }
    }
}
