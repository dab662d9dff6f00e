use leptos::prelude::*;

use crate::context::use_app_context;

#[component]
pub fn ThemeToggle() -> impl IntoView {
    let ctx = use_app_context();

    view! {
        <button
            class="icon-btn theme-toggle"
            title=move || if ctx.dark_mode.get() { "Switch to light mode" } else { "Switch to dark mode" }
            on:click=move |_| ctx.dark_mode.update(|dark| *dark = !*dark)
        >
            {move || if ctx.dark_mode.get() { "☀" } else { "☾" }}
        </button>
    }
}
