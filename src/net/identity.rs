//! Identity provider client: sign-in/sign-up/sign-out operations and the
//! real-time principal change stream.
//!
//! ARCHITECTURE
//! ============
//! The provider sits behind the `IdentityProvider` trait so the session store
//! can be driven by the HTTP implementation in the browser and a scripted one
//! in tests. Change notifications fan out through a listener registry; the
//! returned `Subscription` unsubscribes idempotently and on drop.
//!
//! The HTTP implementation owns session persistence: it keeps the refresh
//! token in its own localStorage slot, exchanges it on startup, and schedules
//! token refresh ahead of expiry. Every principal change (sign-in, refresh,
//! expiry) is pushed through the change stream.

#[cfg(test)]
#[path = "identity_test.rs"]
mod identity_test;

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::state::session::Principal;

/// Errors surfaced to the user from auth operations. Never retried
/// automatically.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredential,
    #[error("an account with this email already exists")]
    EmailInUse,
    #[error("password is too weak")]
    WeakPassword,
    #[error("the sign-in window was blocked; allow popups and try again")]
    PopupBlocked,
    #[error("network unavailable; check your connection and try again")]
    Network,
    #[error("sign-in failed: {0}")]
    Provider(String),
}

/// Callback invoked with the new principal (or `None`) on every change.
pub type ChangeCallback = Rc<dyn Fn(Option<Principal>)>;

/// Registry of change-stream listeners.
#[derive(Default)]
pub struct Listeners {
    next_id: Cell<u64>,
    slots: RefCell<Vec<(u64, ChangeCallback)>>,
}

impl Listeners {
    fn add(&self, callback: ChangeCallback) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.slots.borrow_mut().push((id, callback));
        id
    }

    fn remove(&self, id: u64) {
        self.slots.borrow_mut().retain(|(slot_id, _)| *slot_id != id);
    }

    /// Notify every listener. Callbacks are cloned out first so a listener
    /// may unsubscribe from within its own callback.
    pub fn emit(&self, principal: Option<Principal>) {
        let callbacks: Vec<ChangeCallback> =
            self.slots.borrow().iter().map(|(_, cb)| cb.clone()).collect();
        for cb in callbacks {
            cb(principal.clone());
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }
}

/// Cancellable handle for a change-stream registration.
///
/// `unsubscribe` is idempotent; dropping the handle unsubscribes as well, so
/// a registration can never outlive its owner.
pub struct Subscription {
    listeners: Weak<Listeners>,
    id: u64,
    active: Cell<bool>,
}

impl Subscription {
    fn new(listeners: &Rc<Listeners>, id: u64) -> Self {
        Self { listeners: Rc::downgrade(listeners), id, active: Cell::new(true) }
    }

    pub fn unsubscribe(&self) {
        if self.active.replace(false) {
            if let Some(listeners) = self.listeners.upgrade() {
                listeners.remove(self.id);
            }
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

/// External identity provider operations.
#[async_trait(?Send)]
pub trait IdentityProvider {
    /// Register for principal change notifications. The stream delivers every
    /// change the provider originates: sign-in, token refresh, expiry.
    fn subscribe(&self, on_change: ChangeCallback) -> Subscription;

    /// Resume any session the provider itself persisted. Implementations
    /// must eventually emit a change notification (possibly `None`) so
    /// consumers can settle their loading state.
    fn resume(&self) {}

    async fn sign_up(&self, email: &str, password: &str) -> Result<Principal, AuthError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Principal, AuthError>;

    /// Federated sign-in through the provider's popup flow.
    async fn sign_in_with_provider(&self) -> Result<Principal, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;
}

/// Token grant returned by the provider's REST endpoints.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub id_token: String,
    pub refresh_token: Option<String>,
    /// Lifetime in seconds; the provider serializes it as a string.
    pub expires_in: Option<String>,
    pub local_id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

impl TokenResponse {
    /// Token lifetime in seconds, defaulting to an hour when absent or
    /// malformed.
    #[must_use]
    pub fn expires_in_secs(&self) -> u64 {
        self.expires_in
            .as_deref()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(3600)
    }
}

/// Payload posted back by the federated sign-in popup.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ProviderMessage {
    /// Anti-forgery nonce; must match the one the opener generated.
    pub state: String,
    #[serde(flatten)]
    pub token: TokenResponse,
}

/// Build a principal from a token grant.
#[must_use]
pub fn principal_from_token(token: &TokenResponse) -> Principal {
    Principal {
        uid: token.local_id.clone(),
        email: token.email.clone().unwrap_or_default(),
        display_name: token.display_name.clone(),
        avatar_url: token.photo_url.clone(),
        token: token.id_token.clone(),
    }
}

/// Map a provider error code onto the user-facing taxonomy.
#[must_use]
pub fn auth_error_from_code(code: &str) -> AuthError {
    match code {
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" | "USER_DISABLED" => {
            AuthError::InvalidCredential
        }
        "EMAIL_EXISTS" => AuthError::EmailInUse,
        code if code.starts_with("WEAK_PASSWORD") => AuthError::WeakPassword,
        "TOO_MANY_ATTEMPTS_TRY_LATER" => {
            AuthError::Provider("too many attempts; try again later".to_owned())
        }
        other => AuthError::Provider(other.to_owned()),
    }
}

/// Seconds to wait before refreshing a token that lives `expires_in_secs`.
/// Refresh runs a minute early, but never sooner than half a minute out.
#[must_use]
pub fn refresh_delay_secs(expires_in_secs: u64) -> u64 {
    expires_in_secs.saturating_sub(60).max(30)
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Parse the provider's error body into an `AuthError`. Unreadable bodies
/// fall back to a generic provider error with the HTTP status.
#[must_use]
pub fn auth_error_from_body(status: u16, body: &str) -> AuthError {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| auth_error_from_code(&b.error.message))
        .unwrap_or_else(|_| AuthError::Provider(format!("provider returned status {status}")))
}

// =============================================================================
// HTTP PROVIDER
// =============================================================================

#[cfg(feature = "csr")]
pub use http_provider::HttpIdentityProvider;

#[cfg(feature = "csr")]
mod http_provider {
    use super::*;
    use crate::config::IdentityConfig;

    const SESSION_STORAGE_KEY: &str = "learnhub.identity.session";

    #[derive(serde::Serialize)]
    struct PasswordGrant<'a> {
        email: &'a str,
        password: &'a str,
        #[serde(rename = "returnSecureToken")]
        return_secure_token: bool,
    }

    #[derive(serde::Serialize)]
    struct RefreshGrant<'a> {
        grant_type: &'static str,
        refresh_token: &'a str,
    }

    /// REST client for the identity provider.
    #[derive(Clone)]
    pub struct HttpIdentityProvider {
        config: IdentityConfig,
        listeners: Rc<Listeners>,
        current: Rc<RefCell<Option<Principal>>>,
        /// Bumped on sign-in/sign-out; stale refresh loops check it and stop.
        generation: Rc<Cell<u64>>,
    }

    impl HttpIdentityProvider {
        #[must_use]
        pub fn new(config: IdentityConfig) -> Self {
            Self {
                config,
                listeners: Rc::new(Listeners::default()),
                current: Rc::new(RefCell::new(None)),
                generation: Rc::new(Cell::new(0)),
            }
        }

        fn endpoint(&self, name: &str) -> String {
            format!("{}/{}?key={}", self.config.base_url, name, self.config.api_key)
        }

        fn emit_change(&self, principal: Option<Principal>) {
            *self.current.borrow_mut() = principal.clone();
            self.listeners.emit(principal);
        }

        fn stored_refresh_token() -> Option<String> {
            let storage = web_sys::window()?.local_storage().ok()??;
            storage.get_item(SESSION_STORAGE_KEY).ok()?
        }

        fn persist_refresh_token(token: Option<&str>) {
            let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten())
            else {
                return;
            };
            let _ = match token {
                Some(token) => storage.set_item(SESSION_STORAGE_KEY, token),
                None => storage.remove_item(SESSION_STORAGE_KEY),
            };
        }

        async fn token_request<B: serde::Serialize>(
            &self,
            endpoint: &str,
            body: &B,
        ) -> Result<TokenResponse, AuthError> {
            let request = gloo_net::http::Request::post(&self.endpoint(endpoint))
                .json(body)
                .map_err(|_| AuthError::Network)?;
            let response = request.send().await.map_err(|_| AuthError::Network)?;
            if !response.ok() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(auth_error_from_body(status, &body));
            }
            response.json::<TokenResponse>().await.map_err(|_| AuthError::Network)
        }

        /// Adopt a fresh grant: persist, notify, and schedule refresh.
        fn adopt_grant(&self, grant: &TokenResponse, generation: u64) -> Principal {
            let principal = principal_from_token(grant);
            if self.generation.get() != generation {
                // Superseded by a sign-out while the request was in flight;
                // do not resurrect the session.
                return principal;
            }
            Self::persist_refresh_token(grant.refresh_token.as_deref());
            self.emit_change(Some(principal.clone()));
            if let Some(refresh_token) = grant.refresh_token.clone() {
                self.schedule_refresh(refresh_token, grant.expires_in_secs(), generation);
            }
            principal
        }

        fn schedule_refresh(&self, refresh_token: String, expires_in_secs: u64, generation: u64) {
            let provider = self.clone();
            leptos::task::spawn_local(async move {
                let delay = std::time::Duration::from_secs(refresh_delay_secs(expires_in_secs));
                gloo_timers::future::sleep(delay).await;
                if provider.generation.get() != generation {
                    return;
                }
                provider.refresh(&refresh_token, generation).await;
            });
        }

        async fn refresh(&self, refresh_token: &str, generation: u64) {
            let grant = RefreshGrant { grant_type: "refresh_token", refresh_token };
            match self.token_request("token", &grant).await {
                Ok(response) => {
                    self.adopt_grant(&response, generation);
                }
                Err(err) => {
                    if self.generation.get() != generation {
                        return;
                    }
                    // The session expired elsewhere; surface it through the
                    // change stream.
                    leptos::logging::warn!("token refresh failed: {err}");
                    Self::persist_refresh_token(None);
                    self.emit_change(None);
                }
            }
        }

        async fn await_popup_message(
            &self,
            expected_state: &str,
        ) -> Result<ProviderMessage, AuthError> {
            use wasm_bindgen::JsCast;
            use wasm_bindgen::closure::Closure;

            let window = web_sys::window().ok_or(AuthError::PopupBlocked)?;
            let (tx, rx) = futures::channel::oneshot::channel::<ProviderMessage>();
            let tx = Rc::new(RefCell::new(Some(tx)));
            let expected = expected_state.to_owned();

            let handler = Closure::<dyn FnMut(web_sys::MessageEvent)>::new(
                move |event: web_sys::MessageEvent| {
                    let Some(text) = event.data().as_string() else { return };
                    let Ok(message) = serde_json::from_str::<ProviderMessage>(&text) else {
                        return;
                    };
                    if message.state != expected {
                        return;
                    }
                    if let Some(tx) = tx.borrow_mut().take() {
                        let _ = tx.send(message);
                    }
                },
            );
            window
                .add_event_listener_with_callback("message", handler.as_ref().unchecked_ref())
                .map_err(|_| AuthError::Provider("message listener rejected".to_owned()))?;

            let result = rx.await;

            let _ = window
                .remove_event_listener_with_callback("message", handler.as_ref().unchecked_ref());
            drop(handler);

            result.map_err(|_| AuthError::Provider("sign-in window closed".to_owned()))
        }
    }

    #[async_trait(?Send)]
    impl IdentityProvider for HttpIdentityProvider {
        fn subscribe(&self, on_change: ChangeCallback) -> Subscription {
            let id = self.listeners.add(on_change);
            Subscription::new(&self.listeners, id)
        }

        fn resume(&self) {
            let provider = self.clone();
            let generation = self.generation.get();
            leptos::task::spawn_local(async move {
                match Self::stored_refresh_token() {
                    Some(refresh_token) => provider.refresh(&refresh_token, generation).await,
                    None => provider.emit_change(None),
                }
            });
        }

        async fn sign_up(&self, email: &str, password: &str) -> Result<Principal, AuthError> {
            let generation = self.generation.get();
            let grant = PasswordGrant { email, password, return_secure_token: true };
            let response = self.token_request("accounts:signUp", &grant).await?;
            Ok(self.adopt_grant(&response, generation))
        }

        async fn sign_in(&self, email: &str, password: &str) -> Result<Principal, AuthError> {
            let generation = self.generation.get();
            let grant = PasswordGrant { email, password, return_secure_token: true };
            let response = self.token_request("accounts:signInWithPassword", &grant).await?;
            Ok(self.adopt_grant(&response, generation))
        }

        async fn sign_in_with_provider(&self) -> Result<Principal, AuthError> {
            let generation = self.generation.get();
            let state = uuid::Uuid::new_v4().to_string();
            let url = format!("{}?state={state}", self.config.oauth_popup_url);

            let window = web_sys::window().ok_or(AuthError::PopupBlocked)?;
            let popup = window
                .open_with_url_and_target(&url, "learnhub-signin")
                .map_err(|_| AuthError::PopupBlocked)?
                .ok_or(AuthError::PopupBlocked)?;

            let result = self.await_popup_message(&state).await;
            let _ = popup.close();
            let message = result?;
            Ok(self.adopt_grant(&message.token, generation))
        }

        async fn sign_out(&self) -> Result<(), AuthError> {
            self.generation.set(self.generation.get() + 1);
            Self::persist_refresh_token(None);
            self.emit_change(None);
            Ok(())
        }
    }
}

// =============================================================================
// SCRIPTED PROVIDER
// =============================================================================

/// Scripted provider for tests and non-browser builds.
///
/// Auth operations pop queued results; the change stream is driven manually
/// with [`MockIdentityProvider::emit`].
#[derive(Default)]
pub struct MockIdentityProvider {
    listeners: Rc<Listeners>,
    responses: RefCell<VecDeque<Result<Principal, AuthError>>>,
}

impl MockIdentityProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result returned by the next auth operation.
    pub fn queue_result(&self, result: Result<Principal, AuthError>) {
        self.responses.borrow_mut().push_back(result);
    }

    /// Push a change notification to every subscriber.
    pub fn emit(&self, principal: Option<Principal>) {
        self.listeners.emit(principal);
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn next_response(&self) -> Result<Principal, AuthError> {
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(AuthError::Provider("no scripted response".to_owned())))
    }
}

#[async_trait(?Send)]
impl IdentityProvider for MockIdentityProvider {
    fn subscribe(&self, on_change: ChangeCallback) -> Subscription {
        let id = self.listeners.add(on_change);
        Subscription::new(&self.listeners, id)
    }

    async fn sign_up(&self, _email: &str, _password: &str) -> Result<Principal, AuthError> {
        self.next_response()
    }

    async fn sign_in(&self, _email: &str, _password: &str) -> Result<Principal, AuthError> {
        self.next_response()
    }

    async fn sign_in_with_provider(&self) -> Result<Principal, AuthError> {
        self.next_response()
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        Ok(())
    }
}
