//! Root application component with routing and context providers.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::route_guard::RouteGuard;
use crate::net::transport::{BrowserTransport, ChannelConfig};
use crate::pages::{dashboard::DashboardPage, login::LoginPage, register::RegisterPage};
use crate::routes::ConsoleRoute;
use crate::services::auth::AuthService;
use crate::state::auth::AuthState;
use crate::util::guard::NavigationGuard;
use crate::util::navigator::BrowserNavigator;
use crate::util::token_store::LocalTokenStore;

/// Root application component.
///
/// Builds the single auth service and navigation guard for this page
/// lifetime and provides them, with the reactive `AuthState`, to every
/// route.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let service = AuthService::new(
        ChannelConfig::from_build_env(),
        Arc::new(BrowserTransport),
        Arc::new(LocalTokenStore),
        Arc::new(BrowserNavigator),
    );
    let guard = NavigationGuard::new(service.clone());

    provide_context(service);
    provide_context(guard);
    provide_context(RwSignal::new(AuthState::pending()));

    view! {
        <Title text="Crawl Console"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route
                    path=StaticSegment("login")
                    view=|| view! { <RouteGuard requirement=ConsoleRoute::Login.requirement()><LoginPage/></RouteGuard> }
                />
                <Route
                    path=StaticSegment("register")
                    view=|| {
                        view! { <RouteGuard requirement=ConsoleRoute::Register.requirement()><RegisterPage/></RouteGuard> }
                    }
                />
                <Route
                    path=StaticSegment("")
                    view=|| {
                        view! { <RouteGuard requirement=ConsoleRoute::Dashboard.requirement()><DashboardPage/></RouteGuard> }
                    }
                />
            </Routes>
        </Router>
    }
}
