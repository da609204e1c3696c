//! Registration page. A successful sign-up returns to the login page; it
//! does not sign the new account in.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::net::types::RegisterRequest;
use crate::routes::LOGIN_PATH;
use crate::services::auth::AuthService;

/// Shortest password the backend accepts.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Check registration fields the way the backend will, so obvious mistakes
/// never leave the browser.
///
/// # Errors
///
/// Returns the message to show for the first failing check.
pub fn validate_registration_input(
    username: &str,
    email: &str,
    password: &str,
    confirm: &str,
) -> Result<RegisterRequest, &'static str> {
    let username = username.trim();
    let email = email.trim();
    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err("Fill in username, email and password.");
    }
    if !email.contains('@') {
        return Err("Enter a valid email address.");
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 6 characters.");
    }
    if password != confirm {
        return Err("Passwords do not match.");
    }
    Ok(RegisterRequest { username: username.to_owned(), email: email.to_owned(), password: password.to_owned() })
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let service = expect_context::<AuthService>();
    let navigate = use_navigate();

    let username = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let account = match validate_registration_input(&username.get(), &email.get(), &password.get(), &confirm.get()) {
            Ok(account) => account,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set("Creating account...".to_owned());

        let service = service.clone();
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            match service.register(&account).await {
                Ok(()) => navigate(LOGIN_PATH, NavigateOptions::default()),
                Err(e) => {
                    info.set(format!("Registration failed: {e}"));
                    busy.set(false);
                }
            }
        });
    };

    let field = move |kind: &'static str, placeholder: &'static str, signal: RwSignal<String>| {
        view! {
            <input
                class="login-input"
                type=kind
                placeholder=placeholder
                prop:value=move || signal.get()
                on:input=move |ev| signal.set(event_target_value(&ev))
            />
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Crawl Console"</h1>
                <p class="login-card__subtitle">"Create an operator account"</p>
                <form class="login-form" on:submit=on_submit>
                    {field("text", "Username", username)}
                    {field("email", "you@example.com", email)}
                    {field("password", "Password", password)}
                    {field("password", "Confirm password", confirm)}
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Register"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <div class="login-divider"></div>
                <a href="/login" class="login-link">
                    "Already registered? Sign in"
                </a>
            </div>
        </div>
    }
}
