//! Top navigation bar: branding, section links, theme toggle, and the
//! sign-in/sign-out control.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::state::session::SessionStore;
use crate::state::theme::ThemeState;
use crate::util::theme;

#[component]
pub fn Navbar() -> impl IntoView {
    let session = expect_context::<SessionStore>();
    let theme_state = expect_context::<RwSignal<ThemeState>>();
    let navigate = StoredValue::new_local(use_navigate());

    let authenticated = move || session.state().with(|s| s.is_authenticated());
    let display_name = move || {
        session.state().with(|s| {
            s.principal
                .as_ref()
                .map(|p| p.display_name.clone().unwrap_or_else(|| p.email.clone()))
                .unwrap_or_default()
        })
    };

    let on_toggle_theme = move |_| {
        theme_state.update(|t| t.dark_mode = theme::toggle(t.dark_mode));
    };

    let on_sign_out = move |_| {
        let navigate = navigate.get_value();
        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            if let Err(err) = session.sign_out().await {
                leptos::logging::warn!("sign-out failed: {err}");
            }
            navigate("/", NavigateOptions::default());
        });
        #[cfg(not(feature = "csr"))]
        {
            let _ = navigate;
        }
    };

    view! {
        <nav class="navbar">
            <a class="navbar__brand" href="/">
                "LearnHub"
            </a>
            <div class="navbar__links">
                <a href="/">"Browse"</a>
                <Show when=authenticated>
                    <a href="/dashboard">"Dashboard"</a>
                    <a href="/premium">"Premium"</a>
                </Show>
            </div>
            <div class="navbar__actions">
                <button class="navbar__theme" on:click=on_toggle_theme title="Toggle theme">
                    {move || if theme_state.get().dark_mode { "Light" } else { "Dark" }}
                </button>
                <Show
                    when=authenticated
                    fallback=|| {
                        view! {
                            <a class="btn btn--primary" href="/login">
                                "Sign in"
                            </a>
                        }
                    }
                >
                    <span class="navbar__user">{display_name}</span>
                    <button class="btn" on:click=on_sign_out>
                        "Sign out"
                    </button>
                </Show>
            </div>
        </nav>
    }
}
