//! Premium upgrade page: starts the redirect-based checkout flow.

use leptos::prelude::*;

use crate::net::gateway::Gateway;

#[component]
pub fn PremiumPage() -> impl IntoView {
    let gateway = expect_context::<Gateway>();
    let error = RwSignal::new(None::<String>);
    let pending = RwSignal::new(false);

    let on_upgrade = move |_| {
        if pending.get() {
            return;
        }
        error.set(None);

        #[cfg(feature = "csr")]
        {
            use crate::net::types::CheckoutRequest;

            let Some(origin) =
                web_sys::window().and_then(|w| w.location().origin().ok())
            else {
                return;
            };
            pending.set(true);
            leptos::task::spawn_local(async move {
                let request = CheckoutRequest::premium_for_origin(&origin);
                match crate::net::api::create_checkout_session(gateway, request).await {
                    Ok(checkout) => {
                        // Hand the user to the payment processor.
                        if let Some(window) = web_sys::window() {
                            let _ = window.location().set_href(&checkout.url);
                        }
                    }
                    Err(err) => {
                        pending.set(false);
                        error.set(Some(err.to_string()));
                    }
                }
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = gateway;
        }
    };

    view! {
        <div class="premium-page">
            <h1>"Go Premium"</h1>
            <p class="premium-page__pitch">
                "Unlock every premium lesson with a monthly subscription."
            </p>
            <ul class="premium-page__perks">
                <li>"All premium lessons"</li>
                <li>"New content every week"</li>
                <li>"Cancel anytime"</li>
            </ul>
            {move || error.get().map(|message| view! { <p class="premium-page__error">{message}</p> })}
            <button
                class="btn btn--primary"
                prop:disabled=move || pending.get()
                on:click=on_upgrade
            >
                {move || if pending.get() { "Redirecting..." } else { "Upgrade now" }}
            </button>
        </div>
    }
}
