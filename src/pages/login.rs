//! Sign-in page: email/password form plus the federated provider button.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::state::session::SessionStore;

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = expect_context::<SessionStore>();
    let navigate = use_navigate();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let busy = move || session.state().with(|s| s.loading);

    let submit_navigate = navigate.clone();
    let on_submit = Callback::new(move |()| {
        let email_value = email.get().trim().to_owned();
        let password_value = password.get();
        if email_value.is_empty() || password_value.is_empty() {
            return;
        }
        error.set(None);

        #[cfg(feature = "csr")]
        {
            let navigate = submit_navigate.clone();
            leptos::task::spawn_local(async move {
                match session.sign_in(&email_value, &password_value).await {
                    Ok(()) => navigate("/dashboard", NavigateOptions::default()),
                    Err(err) => error.set(Some(err.to_string())),
                }
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (email_value, password_value, &submit_navigate);
        }
    });

    let provider_navigate = navigate.clone();
    let on_provider = move |_| {
        error.set(None);

        #[cfg(feature = "csr")]
        {
            let navigate = provider_navigate.clone();
            leptos::task::spawn_local(async move {
                match session.sign_in_with_provider().await {
                    Ok(()) => navigate("/dashboard", NavigateOptions::default()),
                    Err(err) => error.set(Some(err.to_string())),
                }
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = &provider_navigate;
        }
    };

    view! {
        <div class="auth-page">
            <h1>"Welcome back"</h1>
            <label class="auth-page__label">
                "Email"
                <input
                    class="auth-page__input"
                    type="email"
                    prop:value=move || email.get()
                    on:input=move |ev| email.set(event_target_value(&ev))
                />
            </label>
            <label class="auth-page__label">
                "Password"
                <input
                    class="auth-page__input"
                    type="password"
                    prop:value=move || password.get()
                    on:input=move |ev| password.set(event_target_value(&ev))
                    on:keydown=move |ev: leptos::ev::KeyboardEvent| {
                        if ev.key() == "Enter" {
                            ev.prevent_default();
                            on_submit.run(());
                        }
                    }
                />
            </label>
            {move || error.get().map(|message| view! { <p class="auth-page__error">{message}</p> })}
            <button class="btn btn--primary" prop:disabled=busy on:click=move |_| on_submit.run(())>
                "Sign in"
            </button>
            <button class="btn" prop:disabled=busy on:click=on_provider>
                "Continue with Google"
            </button>
            <p class="auth-page__switch">
                "New here? " <a href="/register">"Create an account"</a>
            </p>
        </div>
    }
}
