//! Signup Page

use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::SubmitEvent;

use super::FieldError;
use crate::context::{use_app_context, Page};
use crate::validation::{FieldErrors, SignupForm};

#[component]
pub fn SignupPage() -> impl IntoView {
    let ctx = use_app_context();
    let form = RwSignal::new(SignupForm::default());
    let (errors, set_errors) = signal(FieldErrors::default());
    let (server_error, set_server_error) = signal::<Option<String>>(None);
    let (submitting, set_submitting) = signal(false);

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        let data = match form.with_untracked(SignupForm::validate) {
            Ok(data) => data,
            Err(field_errors) => {
                set_errors.set(field_errors);
                return;
            }
        };
        set_errors.set(FieldErrors::default());
        set_server_error.set(None);
        set_submitting.set(true);

        spawn_local(async move {
            let result = ctx.services().auth.signup(&data).await;
            set_submitting.try_set(false);
            match result {
                Ok(user) => {
                    ctx.toaster.success("Account created successfully!");
                    ctx.signed_in(user);
                }
                Err(e) => {
                    log::warn!("signup failed: {}", e);
                    set_server_error.try_set(Some(e.to_string()));
                }
            }
        });
    };

    // One text input bound to a form field
    let field = move |id: &'static str,
                      label: &'static str,
                      input_type: &'static str,
                      key: &'static str,
                      get: fn(&SignupForm) -> String,
                      set: fn(&mut SignupForm, String)| {
        view! {
            <label class="form-label" for=id>{label}</label>
            <input
                id=id
                type=input_type
                class="form-input"
                prop:value=move || form.with(get)
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    form.update(|f| set(f, value));
                    set_errors.update(|e| e.remove(key));
                }
            />
            <FieldError errors=errors field=key />
        }
    };

    view! {
        <div class="auth-page">
            <form class="auth-card" on:submit=on_submit novalidate=true>
                <h1 class="auth-title">"Create your account"</h1>
                <p class="auth-subtitle">"Start organizing your tasks"</p>

                {move || server_error.get().map(|message| view! {
                    <div class="form-alert">{message}</div>
                })}

                {field("signup-name", "Name", "text", "name", |f| f.name.clone(), |f, v| f.name = v)}
                {field("signup-email", "Email", "email", "email", |f| f.email.clone(), |f, v| f.email = v)}
                {field("signup-password", "Password", "password", "password", |f| f.password.clone(), |f, v| f.password = v)}
                {field(
                    "signup-confirm",
                    "Confirm password",
                    "password",
                    "confirm_password",
                    |f| f.confirm_password.clone(),
                    |f, v| f.confirm_password = v,
                )}

                <button type="submit" class="btn btn-primary btn-block" disabled=move || submitting.get()>
                    {move || if submitting.get() { "Creating account..." } else { "Sign up" }}
                </button>

                <p class="auth-switch">
                    "Already have an account? "
                    <a href="#" on:click=move |ev| {
                        ev.prevent_default();
                        ctx.navigate(Page::Login);
                    }>"Sign in"</a>
                </p>
            </form>
        </div>
    }
}
