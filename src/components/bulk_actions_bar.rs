//! Bulk Actions Bar
//!
//! Shown while tasks are selected. Completion changes go out as one bulk
//! request with the list patched optimistically; the selection is cleared
//! once the server confirms.

use leptos::prelude::*;
use leptos::task::spawn_local;

use super::DeleteConfirmButton;
use crate::context::use_app_context;
use crate::filters::TaskQuery;
use crate::models::TaskPatch;
use crate::store::{use_ui_store, UiStateStoreFields};

#[component]
pub fn BulkActionsBar(#[prop(into)] visible: Signal<TaskQuery>) -> impl IntoView {
    let ctx = use_app_context();
    let ui = use_ui_store();
    let (busy, set_busy) = signal(false);
    let count = Memo::new(move |_| ui.selection().read().len());

    let set_completed = move |completed: bool| {
        let ids = {
            let selection = ui.selection().read_untracked();
            if selection.is_empty() || busy.get_untracked() {
                return;
            }
            selection.ids()
        };
        let query = visible.get_untracked();
        set_busy.set(true);
        spawn_local(async move {
            let result = ctx
                .services()
                .tasks
                .bulk_update(&query, &ids, &TaskPatch::completed(completed))
                .await;
            set_busy.try_set(false);
            ui.selection().write().settle(&result);
            match result {
                Ok(updated) => {
                    let state = if completed { "completed" } else { "pending" };
                    ctx.toaster.success(format!("{} task(s) marked as {}", updated.len(), state));
                }
                Err(e) => ctx.report("Failed to update tasks", &e),
            }
        });
    };

    let on_delete = Callback::new(move |_| {
        let ids = ui.selection().read_untracked().ids();
        if ids.is_empty() {
            return;
        }
        set_busy.set(true);
        spawn_local(async move {
            let result = ctx.services().tasks.bulk_delete(&ids).await;
            set_busy.try_set(false);
            ui.selection().write().settle(&result);
            match result {
                Ok(()) => {
                    ctx.toaster.success(format!("{} task(s) deleted", ids.len()));
                }
                Err(e) => ctx.report("Failed to delete tasks", &e),
            }
        });
    });

    view! {
        <Show when=move || { count.get() > 0 }>
            <div class="bulk-bar">
                <span class="bulk-count">{move || format!("{} selected", count.get())}</span>
                <button class="btn btn-success" disabled=move || busy.get() on:click=move |_| set_completed(true)>
                    "Complete"
                </button>
                <button class="btn" disabled=move || busy.get() on:click=move |_| set_completed(false)>
                    "Mark incomplete"
                </button>
                <DeleteConfirmButton button_class="btn btn-danger" label="Delete" on_confirm=on_delete />
                <button class="btn-link" on:click=move |_| ui.selection().write().clear()>"Clear"</button>
            </div>
        </Show>
    }
}
