//! Route wrapper that consults the navigation guard before rendering.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every route in `app` is wrapped in `RouteGuard`. The wrapper publishes
//! the resolved session into the `AuthState` signal, then either renders
//! its children or issues a router navigation to the redirect target.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::state::auth::AuthState;
use crate::util::guard::{AccessRequirement, GuardDecision, NavigationGuard};

#[component]
pub fn RouteGuard(requirement: AccessRequirement, children: ChildrenFn) -> impl IntoView {
    let guard = expect_context::<NavigationGuard>();
    let auth = expect_context::<RwSignal<AuthState>>();
    let navigate = use_navigate();
    let allowed = RwSignal::new(false);

    leptos::task::spawn_local(async move {
        let decision = guard.check(requirement).await;
        auth.set(AuthState::from_session(&guard.auth().session().snapshot()));
        match decision {
            GuardDecision::Allow => allowed.set(true),
            GuardDecision::Redirect(path) => {
                navigate(path, NavigateOptions { replace: true, ..NavigateOptions::default() });
            }
        }
    });

    view! {
        <Show
            when=move || allowed.get()
            fallback=|| view! { <div class="route-guard route-guard--pending">"Loading..."</div> }
        >
            {children()}
        </Show>
    }
}
