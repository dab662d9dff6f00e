//! Tags Manager
//!
//! Create tags with a palette colour, rename inline (Enter saves, Escape
//! cancels) and delete with confirmation.

use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::{KeyboardEvent, SubmitEvent};

use super::DeleteConfirmButton;
use crate::context::use_app_context;
use crate::models::{NewTag, TagPatch};
use crate::queries::TAG_COLORS;

#[component]
pub fn TagsManager() -> impl IntoView {
    let ctx = use_app_context();
    let tags = Memo::new(move |_| {
        ctx.tags_version.track();
        ctx.services().tags.cached()
    });
    let (name, set_name) = signal(String::new());
    let (color, set_color) = signal(TAG_COLORS[0].to_string());
    // (tag id, draft name) while renaming
    let (editing, set_editing) = signal::<Option<(u64, String)>>(None);

    let on_create = move |ev: SubmitEvent| {
        ev.prevent_default();
        let trimmed = name.get_untracked().trim().to_string();
        if trimmed.is_empty() {
            ctx.toaster.error("Tag name is required");
            return;
        }
        if tags.with_untracked(|t| t.iter().any(|tag| tag.name.eq_ignore_ascii_case(&trimmed))) {
            ctx.toaster.error("A tag with this name already exists");
            return;
        }
        let tag = NewTag {
            name: trimmed,
            color: Some(color.get_untracked()),
        };
        spawn_local(async move {
            match ctx.services().tags.create(&tag).await {
                Ok(created) => {
                    set_name.try_set(String::new());
                    ctx.toaster.success(format!("Tag \"{}\" created", created.name));
                }
                Err(e) => ctx.report("Failed to create tag", &e),
            }
        });
    };

    let save_rename = move || {
        let Some((id, draft)) = editing.get_untracked() else {
            return;
        };
        set_editing.set(None);
        let draft = draft.trim().to_string();
        let unchanged = tags.with_untracked(|t| t.iter().any(|tag| tag.id == id && tag.name == draft));
        if draft.is_empty() || unchanged {
            return;
        }
        let patch = TagPatch {
            name: Some(draft),
            color: None,
        };
        spawn_local(async move {
            match ctx.services().tags.update(id, &patch).await {
                Ok(_) => ctx.toaster.success("Tag renamed"),
                Err(e) => ctx.report("Failed to rename tag", &e),
            }
        });
    };

    view! {
        <div class="tags-manager">
            <form class="tag-create" on:submit=on_create>
                <input
                    type="text"
                    class="form-input"
                    placeholder="New tag name"
                    maxlength="50"
                    prop:value=name
                    on:input=move |ev| set_name.set(event_target_value(&ev))
                />
                <div class="color-palette">
                    {TAG_COLORS.into_iter().map(|c| view! {
                        <button
                            type="button"
                            class="color-swatch"
                            class:active=move || color.get() == c
                            style=format!("background-color: {}", c)
                            title=c
                            on:click=move |_| set_color.set(c.to_string())
                        ></button>
                    }).collect_view()}
                </div>
                <button type="submit" class="btn btn-primary">"Add Tag"</button>
            </form>

            <ul class="tag-list">
                <For
                    each=move || tags.get()
                    key=|tag| (tag.id, tag.name.clone(), tag.color.clone())
                    children=move |tag| {
                        let id = tag.id;
                        let swatch = tag.color.clone().unwrap_or_else(|| TAG_COLORS[0].to_string());
                        let current = tag.name.clone();
                        let is_editing = move || editing.with(|e| e.as_ref().is_some_and(|(eid, _)| *eid == id));
                        let on_delete = Callback::new(move |_| {
                            spawn_local(async move {
                                match ctx.services().tags.delete(id).await {
                                    Ok(()) => ctx.toaster.success("Tag deleted"),
                                    Err(e) => ctx.report("Failed to delete tag", &e),
                                }
                            });
                        });
                        view! {
                            <li class="tag-row">
                                <span class="color-dot" style=format!("background-color: {}", swatch)></span>
                                <Show
                                    when=is_editing
                                    fallback=move || {
                                        let label = current.clone();
                                        let draft = current.clone();
                                        view! {
                                            <span
                                                class="tag-name"
                                                title="Click to rename"
                                                on:click=move |_| set_editing.set(Some((id, draft.clone())))
                                            >
                                                {label}
                                            </span>
                                        }
                                    }
                                >
                                    <input
                                        type="text"
                                        class="form-input tag-rename"
                                        autofocus=true
                                        prop:value=move || editing.with(|e| e.as_ref().map(|(_, d)| d.clone()).unwrap_or_default())
                                        on:input=move |ev| {
                                            let value = event_target_value(&ev);
                                            set_editing.update(|e| if let Some((_, draft)) = e { *draft = value });
                                        }
                                        on:keydown=move |ev: KeyboardEvent| match ev.key().as_str() {
                                            "Enter" => {
                                                ev.prevent_default();
                                                save_rename();
                                            }
                                            "Escape" => {
                                                // Keep the dialog open
                                                ev.stop_propagation();
                                                set_editing.set(None);
                                            }
                                            _ => {}
                                        }
                                        on:blur=move |_| save_rename()
                                    />
                                </Show>
                                <DeleteConfirmButton button_class="icon-btn danger" on_confirm=on_delete />
                            </li>
                        }
                    }
                />
            </ul>
            <Show when=move || tags.with(|t| t.is_empty())>
                <p class="muted">"No tags yet. Create one above."</p>
            </Show>
        </div>
    }
}
