//! Root application component: context construction, routing, teardown.

use std::rc::Rc;

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::guards::{RequireAuth, RequirePrivileged};
use crate::components::navbar::Navbar;
use crate::config::AppConfig;
use crate::net::gateway::Gateway;
use crate::net::identity::IdentityProvider;
use crate::pages::{
    admin::AdminPage, dashboard::DashboardPage, home::HomePage, login::LoginPage,
    payment_result::PaymentResultPage, premium::PremiumPage, register::RegisterPage,
    unauthorized::UnauthorizedPage,
};
use crate::state::session::SessionStore;
use crate::state::theme::ThemeState;
use crate::util::theme;

/// Root application component.
///
/// Constructs the session store, the request gateway, and the theme context
/// exactly once, provides them to the tree, and tears the provider
/// subscription down when the application unmounts.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = AppConfig::default();

    #[cfg(feature = "csr")]
    let provider: Rc<dyn IdentityProvider> =
        Rc::new(crate::net::identity::HttpIdentityProvider::new(config.identity.clone()));
    #[cfg(not(feature = "csr"))]
    let provider: Rc<dyn IdentityProvider> =
        Rc::new(crate::net::identity::MockIdentityProvider::new());

    let session = SessionStore::new(provider);
    session.connect();
    on_cleanup(move || session.disconnect());

    let gateway = Gateway::new(session, config.api_base_url.clone());

    let theme_state = RwSignal::new(ThemeState { dark_mode: theme::read_preference() });
    theme::apply(theme_state.get_untracked().dark_mode);

    provide_context(session);
    provide_context(gateway);
    provide_context(theme_state);

    view! {
        <Title text="LearnHub"/>

        <Router>
            <Navbar/>
            <main class="app-main">
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=StaticSegment("") view=HomePage/>
                    <Route path=StaticSegment("login") view=LoginPage/>
                    <Route path=StaticSegment("register") view=RegisterPage/>
                    <Route
                        path=StaticSegment("dashboard")
                        view=|| {
                            view! {
                                <RequireAuth>
                                    <DashboardPage/>
                                </RequireAuth>
                            }
                        }
                    />
                    <Route
                        path=StaticSegment("admin")
                        view=|| {
                            view! {
                                <RequirePrivileged>
                                    <AdminPage/>
                                </RequirePrivileged>
                            }
                        }
                    />
                    <Route
                        path=StaticSegment("premium")
                        view=|| {
                            view! {
                                <RequireAuth>
                                    <PremiumPage/>
                                </RequireAuth>
                            }
                        }
                    />
                    <Route
                        path=(StaticSegment("payment"), StaticSegment("success"))
                        view=|| view! { <PaymentResultPage success=true/> }
                    />
                    <Route
                        path=(StaticSegment("payment"), StaticSegment("cancel"))
                        view=|| view! { <PaymentResultPage success=false/> }
                    />
                    <Route path=StaticSegment("unauthorized") view=UnauthorizedPage/>
                </Routes>
            </main>
        </Router>
    }
}
