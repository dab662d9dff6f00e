//! Task Item Component
//!
//! One task card: completion checkbox, selection box, badges, tags and the
//! edit/delete actions.

use chrono::Local;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::DeleteConfirmButton;
use crate::context::use_app_context;
use crate::filters::TaskQuery;
use crate::models::{Priority, Task};
use crate::stats::{due_label, parse_due};
use crate::store::{open_edit_task, use_ui_store, UiStateStoreFields};

fn priority_class(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => "badge priority-low",
        Priority::Medium => "badge priority-medium",
        Priority::High => "badge priority-high",
    }
}

#[component]
pub fn TaskItem(
    task: Task,
    /// Filter the list is showing; optimistic toggles patch this entry
    #[prop(into)]
    visible: Signal<TaskQuery>,
) -> impl IntoView {
    let ctx = use_app_context();
    let ui = use_ui_store();
    let id = task.id;
    let completed = task.completed;
    let (expanded, set_expanded) = signal(false);

    let now = Local::now().naive_local();
    let due = task.due_date.as_deref().and_then(parse_due);
    let due_text = due.map(|d| due_label(d, now));
    let overdue = !completed && due.is_some_and(|d| d < now);

    let on_toggle = move |_| {
        let query = visible.get_untracked();
        spawn_local(async move {
            match ctx.services().tasks.toggle_completion(&query, id, !completed).await {
                Ok(_) if !completed => ctx.toaster.success("Task completed!"),
                Ok(_) => ctx.toaster.success("Task marked as pending"),
                Err(e) => ctx.report("Failed to update task", &e),
            }
        });
    };

    let on_select = move |ev| {
        let checked = event_target_checked(&ev);
        ui.selection().write().set(id, checked);
    };

    let edit_target = task.clone();
    let on_edit = move |_| open_edit_task(&ui, edit_target.clone());

    let on_delete = Callback::new(move |_| {
        spawn_local(async move {
            match ctx.services().tasks.delete(id).await {
                Ok(()) => {
                    ui.selection().write().set(id, false);
                    ctx.toaster.success("Task deleted");
                }
                Err(e) => ctx.report("Failed to delete task", &e),
            }
        });
    });

    let card_class = move || {
        let mut class = String::from("task-card");
        if completed {
            class.push_str(" completed");
        }
        if ui.selection().read().contains(id) {
            class.push_str(" selected");
        }
        class
    };

    let description = task.description.clone().filter(|d| !d.trim().is_empty());
    let has_description = description.is_some();

    view! {
        <div class=card_class>
            <input
                type="checkbox"
                class="task-select"
                title="Select"
                prop:checked=move || ui.selection().read().contains(id)
                on:change=on_select
            />
            <input
                type="checkbox"
                class="task-complete"
                title=if completed { "Mark as pending" } else { "Mark as complete" }
                prop:checked=completed
                on:change=on_toggle
            />
            <div class="task-body">
                <div class="task-title-row">
                    <span
                        class="task-title"
                        class:expandable=has_description
                        on:click=move |_| set_expanded.update(|e| *e = !*e)
                    >
                        {task.title.clone()}
                    </span>
                    <span class=priority_class(task.priority)>{task.priority.label()}</span>
                    {task.category.clone().map(|c| view! { <span class="badge category">{c}</span> })}
                </div>
                {description.map(|d| view! {
                    <p class=move || if expanded.get() { "task-description" } else { "task-description clamped" }>
                        {d}
                    </p>
                })}
                <div class="task-meta">
                    {due_text.map(|label| view! {
                        <span class="task-due" class:overdue=overdue>{label}</span>
                    })}
                    {task.estimated_minutes.map(|m| view! {
                        <span class="task-estimate">{format!("{} min", m)}</span>
                    })}
                    {task.tags.iter().map(|tag| {
                        let style = tag.color.as_ref().map(|c| format!("background-color: {}", c)).unwrap_or_default();
                        view! { <span class="tag-chip" style=style>{tag.name.clone()}</span> }
                    }).collect_view()}
                </div>
            </div>
            <div class="task-actions">
                <button class="icon-btn" title="Edit" on:click=on_edit>"✎"</button>
                <DeleteConfirmButton button_class="icon-btn danger" on_confirm=on_delete />
            </div>
        </div>
    }
}
