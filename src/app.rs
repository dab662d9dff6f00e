//! TaskNest App
//!
//! Wires the session, API client and stores together, verifies any stored
//! session, then shows the login, signup or dashboard page.

use std::sync::Arc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use crate::api::ApiClient;
use crate::components::{Dashboard, LoginPage, SignupPage, ToastHost};
use crate::config::AppConfig;
use crate::context::{AppContext, Page};
use crate::queries::Services;
use crate::session::{BrowserStorage, Session};
use crate::store::UiState;
use crate::theme;

#[component]
pub fn App() -> impl IntoView {
    let config = AppConfig::from_env();
    let storage = Arc::new(BrowserStorage);
    let session = Session::load(storage.clone());
    let client = ApiClient::new(&config.api_url, session);
    let services = Services::new(client.clone());

    let ui = Store::new(UiState::default());
    let ctx = AppContext::new(services, ui, theme::initial_dark_mode(storage.as_ref()));

    // Provide context to all children
    provide_context(ctx);
    provide_context(ui);

    client.set_unauthorized_handler(move || ctx.session_expired());

    // Theme follows the toggle; only an explicit toggle is remembered
    Effect::new(move |prev: Option<()>| {
        let dark = ctx.dark_mode.get();
        theme::apply_theme(dark);
        if prev.is_some() {
            theme::save_preference(storage.as_ref(), dark);
        }
    });

    // Verify the stored session, if any
    spawn_local(async move {
        match ctx.services().auth.current_user().await {
            Some(user) => {
                log::info!("restored session for {}", user.email);
                ctx.signed_in(user);
            }
            None => ctx.navigate(Page::Login),
        }
    });

    view! {
        <ToastHost toaster=ctx.toaster />
        {move || match ctx.page.get() {
            Page::Loading => view! {
                <div class="page-loading"><div class="spinner" aria-label="Loading"></div></div>
            }.into_any(),
            Page::Login => view! { <LoginPage /> }.into_any(),
            Page::Signup => view! { <SignupPage /> }.into_any(),
            Page::Dashboard => view! { <Dashboard /> }.into_any(),
        }}
    }
}
