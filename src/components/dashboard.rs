//! Dashboard
//!
//! Task list for the signed-in user with filters, statistics, bulk actions,
//! the tag manager and the assistant panel. Data comes from the query
//! caches; the version signals in `AppContext` re-run the memos below
//! whenever a cache entry changes.

use leptos::html::Input;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_shortcuts::{use_keyboard_shortcuts, Shortcut, ShortcutRegistry, ESCAPE};

use super::{
    BulkActionsBar, Chatbot, Modal, SearchAndFilter, ShortcutsHelp, TagsManager, TaskForm, TaskItem,
    TaskStatistics, ThemeToggle,
};
use crate::context::{use_app_context, AppContext};
use crate::store::{close_task_modal, close_top_overlay, open_new_task, use_ui_store, UiStateStoreFields, UiStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListState {
    Loading,
    Empty,
    Tasks,
}

fn dashboard_shortcuts(ctx: AppContext, ui: UiStore, search: NodeRef<Input>) -> Vec<Shortcut> {
    vec![
        Shortcut::new("n", "New task", move || open_new_task(&ui)),
        Shortcut::new("t", "Manage tags", move || ui.show_tag_manager().set(true)),
        Shortcut::new("/", "Focus search", move || {
            if let Some(input) = search.get_untracked() {
                let _ = input.focus();
            }
        }),
        Shortcut::new("?", "Show keyboard shortcuts", move || {
            let open = ui.show_shortcuts().get_untracked();
            ui.show_shortcuts().set(!open);
        })
        .shift(),
        Shortcut::new("d", "Toggle dark mode", move || ctx.dark_mode.update(|dark| *dark = !*dark)).ctrl(),
        Shortcut::new(ESCAPE, "Close dialog", move || {
            close_top_overlay(&ui);
        }),
    ]
}

#[component]
pub fn Dashboard() -> impl IntoView {
    let ctx = use_app_context();
    let ui = use_ui_store();
    let search_ref = NodeRef::<Input>::new();

    let registry = ShortcutRegistry::new(dashboard_shortcuts(ctx, ui, search_ref));
    use_keyboard_shortcuts(registry.clone(), true);

    // Tags
    Effect::new(move |_| {
        ctx.tags_version.track();
        let tags = ctx.services().tags;
        if tags.cache().needs_fetch(&()) {
            spawn_local(async move {
                if let Err(e) = tags.load().await {
                    ctx.report("Failed to load tags", &e);
                }
            });
        }
    });
    let tags = Memo::new(move |_| {
        ctx.tags_version.track();
        ctx.services().tags.cached()
    });
    // A deleted or renamed tag leaves its filter chip behind otherwise
    Effect::new(move |_| {
        ctx.tags_version.track();
        let Some(known) = ctx.services().tags.cache().get(&()) else {
            return;
        };
        if ui.filters().read_untracked().has_unknown_tag(&known) {
            ui.filters().write().drop_unknown_tag(&known);
        }
    });

    // Tasks for the current filters
    let query = Memo::new(move |_| ui.filters().read().to_query(&tags.read()));
    Effect::new(move |_| {
        ctx.tasks_version.track();
        let query = query.get();
        let tasks = ctx.services().tasks;
        if tasks.cache().needs_fetch(&query) {
            spawn_local(async move {
                if let Err(e) = tasks.load(&query).await {
                    ctx.report("Failed to load tasks", &e);
                }
            });
        }
    });
    let page = Memo::new(move |_| {
        ctx.tasks_version.track();
        ctx.services().tasks.cached(&query.get())
    });
    let list_state = Memo::new(move |_| match page.read().as_ref() {
        None => ListState::Loading,
        Some(p) if p.tasks.is_empty() => ListState::Empty,
        Some(_) => ListState::Tasks,
    });
    let task_list = Memo::new(move |_| page.get().map(|p| p.tasks).unwrap_or_default());
    let visible_ids = Memo::new(move |_| task_list.with(|tasks| tasks.iter().map(|t| t.id).collect::<Vec<_>>()));
    let all_selected = move || visible_ids.with(|ids| ui.selection().read().covers(ids));

    let user_name = move || {
        ctx.user
            .get()
            .map(|u| u.display_name().to_string())
            .unwrap_or_default()
    };

    let task_modal_title = Signal::derive(move || {
        if ui.editing_task().read().is_some() {
            "Edit Task".to_string()
        } else {
            "New Task".to_string()
        }
    });
    let help_registry = registry.clone();

    view! {
        <div class="dashboard">
            <header class="dashboard-header">
                <div class="brand">
                    <h1>"TaskNest"</h1>
                    <span class="welcome">{move || format!("Welcome, {}", user_name())}</span>
                </div>
                <div class="header-actions">
                    <button class="btn btn-primary" title="New task (N)" on:click=move |_| open_new_task(&ui)>
                        "+ New Task"
                    </button>
                    <button class="btn" title="Manage tags (T)" on:click=move |_| ui.show_tag_manager().set(true)>
                        "Tags"
                    </button>
                    <button class="icon-btn" title="Keyboard shortcuts (?)" on:click=move |_| ui.show_shortcuts().set(true)>
                        "⌨"
                    </button>
                    <ThemeToggle />
                    <button class="btn" on:click=move |_| ctx.logout()>"Logout"</button>
                </div>
            </header>

            <main class="dashboard-main">
                <TaskStatistics tasks=task_list />
                <SearchAndFilter tags=tags search_ref=search_ref />
                <BulkActionsBar visible=query />

                <section class="task-list">
                    <div class="task-list-header">
                        <label class="select-all">
                            <input
                                type="checkbox"
                                prop:checked=all_selected
                                prop:disabled=move || visible_ids.with(Vec::is_empty)
                                on:change=move |_| {
                                    visible_ids.with_untracked(|ids| ui.selection().write().toggle_all(ids));
                                }
                            />
                            {move || if all_selected() { "Deselect all" } else { "Select all" }}
                        </label>
                        <span class="muted">
                            {move || page.get().map(|p| format!("{} of {} completed", p.completed, p.total)).unwrap_or_default()}
                        </span>
                    </div>

                    {move || match list_state.get() {
                        ListState::Loading => view! { <div class="spinner" aria-label="Loading"></div> }.into_any(),
                        ListState::Empty => {
                            let filtered = ui.filters().read_untracked().active_count() > 0;
                            view! {
                                <div class="empty-state">
                                    {if filtered {
                                        "No tasks match your filters."
                                    } else {
                                        "No tasks yet. Press N to create your first task."
                                    }}
                                </div>
                            }
                            .into_any()
                        }
                        ListState::Tasks => view! {
                            <For
                                each=move || task_list.get()
                                key=|task| (task.id, task.updated_at.clone(), task.completed)
                                children=move |task| view! { <TaskItem task=task visible=query /> }
                            />
                        }
                        .into_any(),
                    }}
                </section>
            </main>

            <Modal
                open=Signal::derive(move || ui.show_task_modal().get())
                title=task_modal_title
                on_close=Callback::new(move |_| close_task_modal(&ui))
            >
                {move || view! {
                    <TaskForm
                        task=ui.editing_task().get()
                        on_close=Callback::new(move |_| close_task_modal(&ui))
                    />
                }}
            </Modal>

            <Modal
                open=Signal::derive(move || ui.show_tag_manager().get())
                title="Manage Tags".to_string()
                on_close=Callback::new(move |_| ui.show_tag_manager().set(false))
            >
                <TagsManager />
            </Modal>

            <Modal
                open=Signal::derive(move || ui.show_shortcuts().get())
                title="Keyboard Shortcuts".to_string()
                on_close=Callback::new(move |_| ui.show_shortcuts().set(false))
            >
                <ShortcutsHelp registry=help_registry.clone() />
            </Modal>

            <Chatbot />
            <Show when=move || !ui.chat_open().get()>
                <button class="chat-fab" title="Open assistant" on:click=move |_| ui.chat_open().set(true)>
                    "💬"
                </button>
            </Show>
        </div>
    }
}
