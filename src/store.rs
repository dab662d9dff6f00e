//! Dashboard UI State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. Server data lives
//! in the query caches; this store only holds what the user is doing on
//! screen.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::filters::TaskFilters;
use crate::models::Task;
use crate::selection::Selection;

/// Dashboard state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct UiState {
    /// Task form modal (create or edit)
    pub show_task_modal: bool,
    /// Task being edited; `None` while creating
    pub editing_task: Option<Task>,
    pub show_tag_manager: bool,
    pub show_shortcuts: bool,
    pub chat_open: bool,
    /// Tasks ticked for bulk actions
    pub selection: Selection,
    pub filters: TaskFilters,
}

/// Type alias for the store
pub type UiStore = Store<UiState>;

/// Get the UI store from context
pub fn use_ui_store() -> UiStore {
    expect_context::<UiStore>()
}

// ========================
// Store Helper Functions
// ========================

pub fn open_new_task(store: &UiStore) {
    store.editing_task().set(None);
    store.show_task_modal().set(true);
}

pub fn open_edit_task(store: &UiStore, task: Task) {
    store.editing_task().set(Some(task));
    store.show_task_modal().set(true);
}

pub fn close_task_modal(store: &UiStore) {
    store.show_task_modal().set(false);
    store.editing_task().set(None);
}

/// Close the topmost open overlay. Returns whether anything was open.
pub fn close_top_overlay(store: &UiStore) -> bool {
    if store.show_shortcuts().get_untracked() {
        store.show_shortcuts().set(false);
    } else if store.show_tag_manager().get_untracked() {
        store.show_tag_manager().set(false);
    } else if store.show_task_modal().get_untracked() {
        close_task_modal(store);
    } else if store.chat_open().get_untracked() {
        store.chat_open().set(false);
    } else {
        return false;
    }
    true
}
