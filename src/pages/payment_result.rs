//! Landing pages for the payment processor's success and cancel callbacks.

use leptos::prelude::*;

#[component]
pub fn PaymentResultPage(success: bool) -> impl IntoView {
    view! {
        <div class="payment-page">
            {if success {
                view! {
                    <h1>"You're premium now"</h1>
                    <p>"Your subscription is active. Enjoy the full catalog."</p>
                    <a class="btn btn--primary" href="/">
                        "Browse lessons"
                    </a>
                }
                    .into_any()
            } else {
                view! {
                    <h1>"Checkout cancelled"</h1>
                    <p>"No charge was made. You can upgrade whenever you're ready."</p>
                    <a class="btn" href="/premium">
                        "Back to Premium"
                    </a>
                }
                    .into_any()
            }}
        </div>
    }
}
