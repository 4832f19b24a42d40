//! Access guards gating protected views.
//!
//! The gating rules are pure functions over session and role state so they
//! can be tested natively; the components wrap them with navigation and a
//! placeholder. Nothing protected renders before authorization is known
//! good, and an unresolved role always denies.

#[cfg(test)]
#[path = "guards_test.rs"]
mod guards_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::net::gateway::{Gateway, SIGN_IN_ROUTE};
use crate::state::role::{Role, RoleState, RoleStatus};
use crate::state::session::{SessionState, SessionStore};

/// Destination for authenticated users who lack the required privilege.
pub const UNAUTHORIZED_ROUTE: &str = "/unauthorized";

/// Outcome of a guard check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Authorization not yet known; render a placeholder, never a redirect.
    Pending,
    Redirect(&'static str),
    Allow,
}

/// Gate for any signed-in user. While the session is loading nothing is
/// decided; an absent principal redirects to sign-in.
#[must_use]
pub fn require_auth(session: &SessionState) -> GuardDecision {
    if session.loading {
        GuardDecision::Pending
    } else if session.principal.is_none() {
        GuardDecision::Redirect(SIGN_IN_ROUTE)
    } else {
        GuardDecision::Allow
    }
}

/// Gate for privileged users. Composes [`require_auth`] first, so an
/// unauthenticated visitor lands on sign-in rather than the unauthorized
/// page; then denies unless the role resolved to privileged (fail-closed:
/// pending, failed, and regular all deny).
#[must_use]
pub fn require_privileged(session: &SessionState, role: &RoleState) -> GuardDecision {
    match require_auth(session) {
        GuardDecision::Allow => match role.status {
            RoleStatus::Resolved(Role::Privileged) => GuardDecision::Allow,
            RoleStatus::Unknown | RoleStatus::Pending => GuardDecision::Pending,
            RoleStatus::Resolved(Role::Regular) | RoleStatus::Failed => {
                GuardDecision::Redirect(UNAUTHORIZED_ROUTE)
            }
        },
        other => other,
    }
}

fn guarded_view(decision: Memo<GuardDecision>, children: ChildrenFn) -> impl IntoView {
    move || match decision.get() {
        GuardDecision::Allow => children().into_any(),
        GuardDecision::Pending | GuardDecision::Redirect(_) => {
            view! { <div class="guard-placeholder" aria-busy="true"></div> }.into_any()
        }
    }
}

/// Renders children only for an authenticated session; redirects to sign-in
/// otherwise.
#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let session = expect_context::<SessionStore>();
    let navigate = use_navigate();

    let decision = Memo::new(move |_| session.state().with(|s| require_auth(s)));

    Effect::new(move || {
        if let GuardDecision::Redirect(target) = decision.get() {
            navigate(target, NavigateOptions::default());
        }
    });

    guarded_view(decision, children)
}

/// Renders children only for an authenticated, privileged session.
///
/// Drives the role lookup keyed on the current principal's email; a lookup
/// response for a previous email never applies to the current principal.
#[component]
pub fn RequirePrivileged(children: ChildrenFn) -> impl IntoView {
    let session = expect_context::<SessionStore>();
    let gateway = expect_context::<Gateway>();
    let navigate = use_navigate();
    let role = RwSignal::new(RoleState::default());

    Effect::new(move || {
        let email = session.state().with(|s| s.principal.as_ref().map(|p| p.email.clone()));
        match email {
            Some(email) => {
                if role.with_untracked(|r| r.is_current(&email)) {
                    return;
                }
                role.update(|r| r.begin_lookup(&email));
                #[cfg(feature = "csr")]
                leptos::task::spawn_local(async move {
                    let outcome =
                        crate::net::api::fetch_role_for_email(gateway, email.clone()).await;
                    role.update(|r| {
                        if !r.apply_lookup(&email, outcome) {
                            leptos::logging::log!("stale role lookup for {email} ignored");
                        }
                    });
                });
                #[cfg(not(feature = "csr"))]
                {
                    let _ = gateway;
                }
            }
            None => role.update(RoleState::reset),
        }
    });

    let decision =
        Memo::new(move |_| session.state().with(|s| role.with(|r| require_privileged(s, r))));

    Effect::new(move || {
        if let GuardDecision::Redirect(target) = decision.get() {
            navigate(target, NavigateOptions::default());
        }
    });

    guarded_view(decision, children)
}
