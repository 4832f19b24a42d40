//! Session state: the single source of truth for "who is signed in".
//!
//! DESIGN
//! ======
//! `SessionState` is a plain struct with pure transition methods so the
//! ordering rules can be tested natively. `SessionStore` wraps it in a signal,
//! owns the identity provider handle, and is provided once via context.
//!
//! ORDERING
//! ========
//! Explicit auth operations may complete out of call order. Each operation
//! captures an epoch token at start; a completion only applies while its
//! epoch is still current. A sign-out issued after a slow sign-in therefore
//! supersedes it and the stale principal can never resurrect. Provider change
//! notifications (token refresh, expiry elsewhere) always apply: the provider
//! is authoritative for its own session.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::rc::Rc;

use leptos::prelude::*;

use crate::net::identity::{AuthError, IdentityProvider, Subscription};

/// The currently authenticated identity and its credential.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Principal {
    /// Opaque unique identifier issued by the provider.
    pub uid: String,
    /// Email the backend user registry is keyed on.
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    /// Short-lived bearer credential attached to backend requests.
    pub token: String,
}

/// Epoch capture for an in-flight auth operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpToken {
    epoch: u64,
}

/// Composite session state: principal (or none) plus a loading flag.
///
/// `loading` is true only while the initial provider handshake or an explicit
/// auth operation is in flight; consumers must not treat "no principal" as
/// definitive while it is set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionState {
    pub principal: Option<Principal>,
    pub loading: bool,
    epoch: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        // The provider handshake is in flight until the first change
        // notification arrives, so a fresh session starts loading.
        Self { principal: None, loading: true, epoch: 0 }
    }
}

impl SessionState {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }

    /// Start an auth operation: sets `loading` and bumps the epoch so any
    /// earlier in-flight operation is superseded.
    pub fn begin_op(&mut self) -> OpToken {
        self.epoch += 1;
        self.loading = true;
        OpToken { epoch: self.epoch }
    }

    /// Apply the outcome of a completed operation.
    ///
    /// Returns false (and leaves the state untouched) when the operation has
    /// been superseded by a later one.
    pub fn complete_op(&mut self, token: OpToken, principal: Option<Principal>) -> bool {
        if token.epoch != self.epoch {
            return false;
        }
        self.principal = principal;
        self.loading = false;
        true
    }

    /// Clear `loading` after a failed operation without touching the
    /// principal. Returns false when superseded.
    pub fn fail_op(&mut self, token: OpToken) -> bool {
        if token.epoch != self.epoch {
            return false;
        }
        self.loading = false;
        true
    }

    /// Apply a provider change notification. The provider is authoritative,
    /// so this always applies and settles `loading`.
    pub fn apply_provider_change(&mut self, principal: Option<Principal>) {
        self.principal = principal;
        self.loading = false;
    }

    /// Immediate local sign-out (the gateway's 401/403 path). Bumps the
    /// epoch so in-flight operations are superseded.
    pub fn clear(&mut self) {
        self.epoch += 1;
        self.principal = None;
        self.loading = false;
    }
}

/// Context handle over the session signal and the identity provider.
///
/// Constructed once in `App`, provided via context, and passed by handle;
/// all session mutation funnels through its methods.
#[derive(Clone, Copy)]
pub struct SessionStore {
    state: RwSignal<SessionState>,
    provider: StoredValue<Rc<dyn IdentityProvider>, LocalStorage>,
    subscription: StoredValue<Option<Subscription>, LocalStorage>,
}

impl SessionStore {
    #[must_use]
    pub fn new(provider: Rc<dyn IdentityProvider>) -> Self {
        Self {
            state: RwSignal::new(SessionState::default()),
            provider: StoredValue::new_local(provider),
            subscription: StoredValue::new_local(None),
        }
    }

    #[must_use]
    pub fn state(&self) -> RwSignal<SessionState> {
        self.state
    }

    /// Current principal without registering a reactive dependency.
    #[must_use]
    pub fn principal_untracked(&self) -> Option<Principal> {
        self.state.with_untracked(|s| s.principal.clone())
    }

    /// Subscribe to the provider's change stream and ask it to resume any
    /// persisted session. Subscribing is a no-op when already connected; the
    /// stream is the only path by which the principal changes outside an
    /// explicit operation.
    pub fn connect(&self) {
        if self.subscription.with_value(Option::is_some) {
            return;
        }
        let state = self.state;
        let sub = self.provider.with_value(|p| {
            p.subscribe(Rc::new(move |principal| {
                state.update(|s| s.apply_provider_change(principal));
            }))
        });
        self.subscription.set_value(Some(sub));
        self.provider.with_value(|p| p.resume());
    }

    /// Tear down the provider subscription. Safe to call more than once.
    pub fn disconnect(&self) {
        self.subscription.update_value(|slot| {
            if let Some(sub) = slot.take() {
                sub.unsubscribe();
            }
        });
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let provider = self.provider.get_value();
        self.run_op(provider.sign_up(email, password)).await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let provider = self.provider.get_value();
        self.run_op(provider.sign_in(email, password)).await
    }

    /// Federated sign-in through the provider's popup flow.
    pub async fn sign_in_with_provider(&self) -> Result<(), AuthError> {
        let provider = self.provider.get_value();
        self.run_op(provider.sign_in_with_provider()).await
    }

    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let Some(token) = self.state.try_update(SessionState::begin_op) else {
            return Ok(());
        };
        let provider = self.provider.get_value();
        let result = provider.sign_out().await;
        self.state.update(|s| {
            let applied = match &result {
                Ok(()) => s.complete_op(token, None),
                Err(_) => s.fail_op(token),
            };
            if !applied {
                leptos::logging::warn!("sign-out result superseded");
            }
        });
        result
    }

    /// Forced local sign-out, used when the backend rejects a credential.
    /// Clears the session synchronously and revokes the provider session in
    /// the background.
    pub fn force_sign_out(&self) {
        self.state.update(SessionState::clear);
        #[cfg(feature = "csr")]
        {
            let provider = self.provider.get_value();
            leptos::task::spawn_local(async move {
                if let Err(err) = provider.sign_out().await {
                    leptos::logging::warn!("provider sign-out failed: {err}");
                }
            });
        }
    }

    async fn run_op(
        &self,
        op: impl Future<Output = Result<Principal, AuthError>>,
    ) -> Result<(), AuthError> {
        let Some(token) = self.state.try_update(SessionState::begin_op) else {
            return Ok(());
        };
        match op.await {
            Ok(principal) => {
                self.state.update(|s| {
                    if !s.complete_op(token, Some(principal)) {
                        leptos::logging::warn!("auth result superseded; dropped");
                    }
                });
                Ok(())
            }
            Err(err) => {
                self.state.update(|s| {
                    let _ = s.fail_op(token);
                });
                Err(err)
            }
        }
    }
}
