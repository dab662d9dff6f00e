//! Login Page

use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::SubmitEvent;

use super::FieldError;
use crate::context::{use_app_context, Page};
use crate::validation::{validate_login, FieldErrors};

#[component]
pub fn LoginPage() -> impl IntoView {
    let ctx = use_app_context();
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (errors, set_errors) = signal(FieldErrors::default());
    let (server_error, set_server_error) = signal::<Option<String>>(None);
    let (submitting, set_submitting) = signal(false);

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        let credentials = match validate_login(&email.get_untracked(), &password.get_untracked()) {
            Ok(credentials) => credentials,
            Err(field_errors) => {
                set_errors.set(field_errors);
                return;
            }
        };
        set_errors.set(FieldErrors::default());
        set_server_error.set(None);
        set_submitting.set(true);

        spawn_local(async move {
            let result = ctx.services().auth.login(&credentials).await;
            set_submitting.try_set(false);
            match result {
                Ok(user) => {
                    ctx.toaster.success(format!("Welcome back, {}!", user.display_name()));
                    ctx.signed_in(user);
                }
                Err(e) => {
                    log::warn!("login failed: {}", e);
                    set_server_error.try_set(Some(e.to_string()));
                }
            }
        });
    };

    view! {
        <div class="auth-page">
            <form class="auth-card" on:submit=on_submit novalidate=true>
                <h1 class="auth-title">"Welcome back"</h1>
                <p class="auth-subtitle">"Sign in to your TaskNest account"</p>

                {move || server_error.get().map(|message| view! {
                    <div class="form-alert">{message}</div>
                })}

                <label class="form-label" for="login-email">"Email"</label>
                <input
                    id="login-email"
                    type="email"
                    class="form-input"
                    placeholder="you@example.com"
                    autocomplete="email"
                    prop:value=email
                    on:input=move |ev| {
                        set_email.set(event_target_value(&ev));
                        set_errors.update(|e| e.remove("email"));
                    }
                />
                <FieldError errors=errors field="email" />

                <label class="form-label" for="login-password">"Password"</label>
                <input
                    id="login-password"
                    type="password"
                    class="form-input"
                    autocomplete="current-password"
                    prop:value=password
                    on:input=move |ev| {
                        set_password.set(event_target_value(&ev));
                        set_errors.update(|e| e.remove("password"));
                    }
                />
                <FieldError errors=errors field="password" />

                <button type="submit" class="btn btn-primary btn-block" disabled=move || submitting.get()>
                    {move || if submitting.get() { "Signing in..." } else { "Sign in" }}
                </button>

                <p class="auth-switch">
                    "Don't have an account? "
                    <a href="#" on:click=move |ev| {
                        ev.prevent_default();
                        ctx.navigate(Page::Signup);
                    }>"Sign up"</a>
                </p>
            </form>
        </div>
    }
}
