//! Search and Filter Bar
//!
//! Search text is debounced before it reaches the filters, so typing issues
//! one task query per pause rather than one per keystroke.

use leptos::html::Input;
use leptos::prelude::*;

use crate::debounce::{use_debounced, SEARCH_DEBOUNCE};
use crate::filters::{SortBy, SortOrder, StatusFilter, CATEGORIES};
use crate::models::{Priority, Tag};
use crate::store::{use_ui_store, UiStateStoreFields};

#[component]
pub fn SearchAndFilter(
    #[prop(into)] tags: Signal<Vec<Tag>>,
    /// Focused by the `/` shortcut
    search_ref: NodeRef<Input>,
) -> impl IntoView {
    let ui = use_ui_store();
    let filters = ui.filters();
    let (search_input, set_search_input) = signal(filters.read_untracked().search.clone());
    let (show_panel, set_show_panel) = signal(false);

    let debounced = use_debounced(search_input.into(), SEARCH_DEBOUNCE);
    Effect::new(move |_| {
        let search = debounced.get();
        if filters.read_untracked().search != search {
            filters.write().search = search;
        }
    });

    // Search cleared from outside (chip, clear all): empty the box too
    let committed_search = Memo::new(move |_| filters.read().search.clone());
    Effect::new(move |_| {
        if committed_search.get().is_empty() && !search_input.get_untracked().is_empty() {
            set_search_input.set(String::new());
        }
    });

    let active_count = Memo::new(move |_| filters.read().active_count());

    view! {
        <div class="filter-bar">
            <div class="filter-row">
                <input
                    type="search"
                    class="form-input search-input"
                    placeholder="Search tasks... (press / to focus)"
                    node_ref=search_ref
                    prop:value=search_input
                    on:input=move |ev| set_search_input.set(event_target_value(&ev))
                />
                <button
                    class=move || if show_panel.get() { "btn filter-toggle active" } else { "btn filter-toggle" }
                    on:click=move |_| set_show_panel.update(|s| *s = !*s)
                >
                    "Filters"
                    <Show when=move || { active_count.get() > 0 }>
                        <span class="filter-count">{move || active_count.get()}</span>
                    </Show>
                </button>
                <select
                    class="form-input sort-select"
                    title="Sort by"
                    prop:value=move || filters.read().sort_by.as_str()
                    on:change=move |ev| filters.write().sort_by = SortBy::parse(&event_target_value(&ev))
                >
                    {SortBy::ALL.into_iter().map(|s| view! {
                        <option value=s.as_str()>{s.label()}</option>
                    }).collect_view()}
                </select>
                <button
                    class="btn sort-order"
                    title="Toggle sort order"
                    on:click=move |_| {
                        let mut f = filters.write();
                        f.sort_order = match f.sort_order {
                            SortOrder::Asc => SortOrder::Desc,
                            SortOrder::Desc => SortOrder::Asc,
                        };
                    }
                >
                    {move || if filters.read().sort_order == SortOrder::Asc { "↑ Asc" } else { "↓ Desc" }}
                </button>
            </div>

            <Show when=move || show_panel.get()>
                <div class="filter-panel">
                    <select
                        class="form-input"
                        prop:value=move || filters.read().status.as_str()
                        on:change=move |ev| filters.write().status = StatusFilter::parse(&event_target_value(&ev))
                    >
                        {StatusFilter::ALL.into_iter().map(|s| view! {
                            <option value=s.as_str()>{s.label()}</option>
                        }).collect_view()}
                    </select>
                    <select
                        class="form-input"
                        prop:value=move || filters.read().priority.map(|p| p.as_str()).unwrap_or_default()
                        on:change=move |ev| filters.write().priority = Priority::parse(&event_target_value(&ev))
                    >
                        <option value="">"All Priorities"</option>
                        {Priority::ALL.into_iter().map(|p| view! {
                            <option value=p.as_str()>{p.label()}</option>
                        }).collect_view()}
                    </select>
                    <select
                        class="form-input"
                        prop:value=move || filters.read().category.clone().unwrap_or_default()
                        on:change=move |ev| {
                            let value = event_target_value(&ev);
                            filters.write().category = (!value.is_empty()).then_some(value);
                        }
                    >
                        <option value="">"All Categories"</option>
                        {CATEGORIES.into_iter().map(|c| view! { <option value=c>{c}</option> }).collect_view()}
                    </select>
                    <select
                        class="form-input"
                        prop:value=move || filters.read().tag.clone().unwrap_or_default()
                        on:change=move |ev| {
                            let value = event_target_value(&ev);
                            filters.write().tag = (!value.is_empty()).then_some(value);
                        }
                    >
                        <option value="">"All Tags"</option>
                        {move || tags.get().into_iter().map(|t| {
                            let name = t.name;
                            view! { <option value=name.clone()>{name.clone()}</option> }
                        }).collect_view()}
                    </select>
                </div>
            </Show>

            <Show when=move || { active_count.get() > 0 }>
                <div class="filter-chips">
                    {move || filters.read().chips().into_iter().map(|(chip, text)| view! {
                        <span class="filter-chip">
                            {text}
                            <button
                                class="chip-remove"
                                title="Remove filter"
                                on:click=move |_| filters.write().remove(chip)
                            >
                                "×"
                            </button>
                        </span>
                    }).collect_view()}
                    <button class="btn-link" on:click=move |_| filters.write().clear()>"Clear all filters"</button>
                </div>
            </Show>
        </div>
    }
}
