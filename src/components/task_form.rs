//! Task Form Component
//!
//! Create or edit a task. Validation runs locally before anything is sent.

use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::SubmitEvent;

use super::FieldError;
use crate::context::use_app_context;
use crate::filters::CATEGORIES;
use crate::models::{Priority, Task, TaskPatch};
use crate::validation::{FieldErrors, TaskDraft};

#[component]
pub fn TaskForm(
    /// Task being edited; `None` creates a new one
    task: Option<Task>,
    #[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
    let ctx = use_app_context();
    let editing_id = task.as_ref().map(|t| t.id);
    let draft = RwSignal::new(task.as_ref().map(TaskDraft::from_task).unwrap_or_default());
    let (errors, set_errors) = signal(FieldErrors::default());
    let (saving, set_saving) = signal(false);

    let tags = Memo::new(move |_| {
        ctx.tags_version.track();
        ctx.services().tags.cached()
    });

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() {
            return;
        }
        let new_task = match draft.with_untracked(TaskDraft::validate) {
            Ok(task) => task,
            Err(field_errors) => {
                set_errors.set(field_errors);
                return;
            }
        };
        set_errors.set(FieldErrors::default());
        set_saving.set(true);

        spawn_local(async move {
            let tasks = ctx.services().tasks;
            let result = match editing_id {
                Some(id) => tasks
                    .update(id, &TaskPatch::from(new_task))
                    .await
                    .map(|_| "Task updated successfully"),
                None => tasks.create(&new_task).await.map(|_| "Task created successfully"),
            };
            set_saving.try_set(false);
            match result {
                Ok(message) => {
                    ctx.toaster.success(message);
                    on_close.run(());
                }
                Err(e) => ctx.report("Failed to save task", &e),
            }
        });
    };

    let toggle_tag = move |tag_id: u64| {
        draft.update(|d| {
            if let Some(pos) = d.tag_ids.iter().position(|id| *id == tag_id) {
                d.tag_ids.remove(pos);
            } else {
                d.tag_ids.push(tag_id);
            }
        });
    };

    view! {
        <form class="task-form" on:submit=on_submit novalidate=true>
            <label class="form-label" for="task-title">"Title *"</label>
            <input
                id="task-title"
                type="text"
                class="form-input"
                placeholder="What needs to be done?"
                autofocus=true
                prop:value=move || draft.with(|d| d.title.clone())
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    draft.update(|d| d.title = value);
                    set_errors.update(|e| e.remove("title"));
                }
            />
            <FieldError errors=errors field="title" />

            <label class="form-label" for="task-description">"Description"</label>
            <textarea
                id="task-description"
                class="form-input"
                rows="3"
                prop:value=move || draft.with(|d| d.description.clone())
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    draft.update(|d| d.description = value);
                }
            ></textarea>

            <div class="form-row">
                <div class="form-col">
                    <label class="form-label" for="task-priority">"Priority"</label>
                    <select
                        id="task-priority"
                        class="form-input"
                        prop:value=move || draft.with(|d| d.priority.as_str())
                        on:change=move |ev| {
                            if let Some(priority) = Priority::parse(&event_target_value(&ev)) {
                                draft.update(|d| d.priority = priority);
                            }
                        }
                    >
                        {Priority::ALL.into_iter().map(|p| view! {
                            <option value=p.as_str()>{p.label()}</option>
                        }).collect_view()}
                    </select>
                </div>
                <div class="form-col">
                    <label class="form-label" for="task-category">"Category"</label>
                    <select
                        id="task-category"
                        class="form-input"
                        prop:value=move || draft.with(|d| d.category.clone())
                        on:change=move |ev| {
                            let value = event_target_value(&ev);
                            draft.update(|d| d.category = value);
                        }
                    >
                        <option value="">"No category"</option>
                        {CATEGORIES.into_iter().map(|c| view! {
                            <option value=c>{c}</option>
                        }).collect_view()}
                    </select>
                </div>
            </div>

            <div class="form-row">
                <div class="form-col">
                    <label class="form-label" for="task-due">"Due date"</label>
                    <input
                        id="task-due"
                        type="datetime-local"
                        class="form-input"
                        prop:value=move || draft.with(|d| d.due_date.clone())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            draft.update(|d| d.due_date = value);
                        }
                    />
                </div>
                <div class="form-col">
                    <label class="form-label" for="task-estimate">"Estimated minutes"</label>
                    <input
                        id="task-estimate"
                        type="number"
                        min="1"
                        class="form-input"
                        prop:value=move || draft.with(|d| d.estimated_minutes.clone())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            draft.update(|d| d.estimated_minutes = value);
                            set_errors.update(|e| e.remove("estimated_minutes"));
                        }
                    />
                    <FieldError errors=errors field="estimated_minutes" />
                </div>
            </div>

            <label class="form-label">"Tags"</label>
            <div class="tag-picker">
                {move || {
                    let available = tags.get();
                    if available.is_empty() {
                        return view! { <span class="muted">"No tags yet"</span> }.into_any();
                    }
                    available.into_iter().map(|tag| {
                        let tag_id = tag.id;
                        let style = tag.color.as_ref().map(|c| format!("--tag-color: {}", c)).unwrap_or_default();
                        view! {
                            <button
                                type="button"
                                class="tag-chip toggle"
                                class:active=move || draft.with(|d| d.tag_ids.contains(&tag_id))
                                style=style
                                on:click=move |_| toggle_tag(tag_id)
                            >
                                {tag.name}
                            </button>
                        }
                    }).collect_view().into_any()
                }}
            </div>

            <div class="form-actions">
                <button type="button" class="btn" on:click=move |_| on_close.run(())>"Cancel"</button>
                <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                    {move || match (saving.get(), editing_id.is_some()) {
                        (true, _) => "Saving...",
                        (false, true) => "Update Task",
                        (false, false) => "Create Task",
                    }}
                </button>
            </div>
        </form>
    }
}
