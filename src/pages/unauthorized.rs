//! Destination for signed-in users who lack the required privilege.

use leptos::prelude::*;

#[component]
pub fn UnauthorizedPage() -> impl IntoView {
    view! {
        <div class="unauthorized-page">
            <h1>"No access"</h1>
            <p>"Your account doesn't have permission to view that page."</p>
            <a class="btn" href="/">
                "Back to lessons"
            </a>
        </div>
    }
}
