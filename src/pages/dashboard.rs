//! Dashboard page: the authenticated landing route.
//!
//! SYSTEM CONTEXT
//! ==============
//! Rendered only after the route guard allows it, so the session is
//! already restored. Loads the operator's usage counters once and offers
//! the logout action.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::net::types::UserStats;
use crate::routes::LOGIN_PATH;
use crate::services::auth::AuthService;
use crate::state::auth::AuthState;

/// Label/value pairs for the stats cards, in display order.
pub fn stats_rows(stats: &UserStats) -> [(&'static str, u64); 3] {
    [("Projects", stats.projects), ("Tasks", stats.tasks), ("Executions", stats.executions)]
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let service = expect_context::<AuthService>();
    let auth = expect_context::<RwSignal<AuthState>>();
    let navigate = use_navigate();

    let stats = RwSignal::new(None::<UserStats>);
    let stats_error = RwSignal::new(None::<String>);

    let loader = service.clone();
    leptos::task::spawn_local(async move {
        match loader.api().user_stats().await {
            Ok(loaded) => stats.set(Some(loaded)),
            Err(e) => {
                log::warn!("dashboard: stats unavailable: {e}");
                stats_error.set(Some(e.message()));
            }
        }
    });

    let on_logout = move |_| {
        service.logout();
        auth.set(AuthState::from_session(&service.session().snapshot()));
        navigate(LOGIN_PATH, NavigateOptions::default());
    };

    view! {
        <div class="dashboard-page">
            <header class="dashboard-page__header toolbar">
                <span class="toolbar__title">"Crawl Console"</span>
                <span class="toolbar__spacer"></span>
                <span class="toolbar__self">{move || auth.get().display_name()}</span>
                <button class="btn toolbar__logout" on:click=on_logout title="Logout">
                    "Logout"
                </button>
            </header>

            <div class="dashboard-page__grid">
                <Show when=move || stats_error.get().is_some()>
                    <p class="dashboard-page__error">{move || stats_error.get().unwrap_or_default()}</p>
                </Show>
                <Show
                    when=move || stats.get().is_some()
                    fallback=move || view! { <p>"Loading statistics..."</p> }
                >
                    <div class="dashboard-page__cards">
                        {move || {
                            stats
                                .get()
                                .map(|loaded| {
                                    stats_rows(&loaded)
                                        .into_iter()
                                        .map(|(label, value)| {
                                            view! {
                                                <div class="stat-card">
                                                    <span class="stat-card__value">{value}</span>
                                                    <span class="stat-card__label">{label}</span>
                                                </div>
                                            }
                                        })
                                        .collect_view()
                                })
                        }}
                    </div>
                </Show>
            </div>
        </div>
    }
}
