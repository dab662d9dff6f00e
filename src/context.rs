//! Application Context
//!
//! Shared state provided via Leptos Context API.

use leptos::prelude::*;

use crate::api::ApiError;
use crate::components::Toaster;
use crate::models::User;
use crate::queries::Services;
use crate::store::{UiState, UiStore};

/// Top-level screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// Stored session still being verified
    Loading,
    Login,
    Signup,
    Dashboard,
}

/// App-wide signals provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    services: StoredValue<Services>,
    ui: UiStore,
    pub page: RwSignal<Page>,
    pub user: RwSignal<Option<User>>,
    /// Bumped on every task cache change
    pub tasks_version: RwSignal<u64>,
    /// Bumped on every tag cache change
    pub tags_version: RwSignal<u64>,
    /// Bumped on every conversation or message cache change
    pub chat_version: RwSignal<u64>,
    pub dark_mode: RwSignal<bool>,
    pub toaster: Toaster,
}

impl AppContext {
    pub fn new(services: Services, ui: UiStore, dark_mode: bool) -> Self {
        let tasks_version = RwSignal::new(0u64);
        let tags_version = RwSignal::new(0u64);
        let chat_version = RwSignal::new(0u64);

        // Caches live outside the reactive graph; these listeners are the bridge
        services.tasks.cache().subscribe(move |_| bump(tasks_version));
        services.tags.cache().subscribe(move |_| bump(tags_version));
        services.chat.conversations().subscribe(move |_| bump(chat_version));
        services.chat.messages().subscribe(move |_| bump(chat_version));

        Self {
            services: StoredValue::new(services),
            ui,
            page: RwSignal::new(Page::Loading),
            user: RwSignal::new(None),
            tasks_version,
            tags_version,
            chat_version,
            dark_mode: RwSignal::new(dark_mode),
            toaster: Toaster::new(),
        }
    }

    /// Cheap clone of the shared stores
    pub fn services(&self) -> Services {
        self.services.get_value()
    }

    pub fn navigate(&self, page: Page) {
        self.page.set(page);
    }

    pub fn signed_in(&self, user: User) {
        self.user.set(Some(user));
        self.page.set(Page::Dashboard);
    }

    pub fn logout(&self) {
        self.services().logout();
        self.reset();
        self.toaster.success("Logged out successfully");
    }

    /// Called after a 401; the client has already cleared the session
    pub fn session_expired(&self) {
        if self.user.get_untracked().is_none() {
            return;
        }
        log::warn!("session expired, returning to login");
        self.services().clear_caches();
        self.reset();
        self.toaster.error("Your session has expired. Please log in again.");
    }

    /// Surface a failed request. 401s are left to [`Self::session_expired`].
    pub fn report(&self, action: &str, error: &ApiError) {
        if matches!(error, ApiError::Unauthorized(_)) {
            return;
        }
        log::error!("{}: {}", action, error);
        self.toaster.error(format!("{}: {}", action, error));
    }

    fn reset(&self) {
        *self.ui.write() = UiState::default();
        self.user.set(None);
        self.page.set(Page::Login);
    }
}

fn bump(version: RwSignal<u64>) {
    version.try_update(|v| *v += 1);
}

/// Get the app context
pub fn use_app_context() -> AppContext {
    use_context::<AppContext>().expect("AppContext should be provided")
}
