use leptos::prelude::*;
use web_sys::KeyboardEvent;

/// Message box. Enter sends, Shift+Enter inserts a newline.
#[component]
pub fn ChatInput(
    #[prop(into)] disabled: Signal<bool>,
    #[prop(into)] on_send: Callback<String>,
) -> impl IntoView {
    let (text, set_text) = signal(String::new());

    let send = move || {
        let message = text.get_untracked().trim().to_string();
        if message.is_empty() || disabled.get_untracked() {
            return;
        }
        set_text.set(String::new());
        on_send.run(message);
    };

    view! {
        <div class="chat-input">
            <textarea
                class="form-input"
                rows="2"
                placeholder="Ask me to add, list or complete tasks..."
                prop:value=text
                prop:disabled=move || disabled.get()
                on:input=move |ev| set_text.set(event_target_value(&ev))
                on:keydown=move |ev: KeyboardEvent| {
                    if ev.key() == "Enter" && !ev.shift_key() {
                        ev.prevent_default();
                        send();
                    }
                }
            ></textarea>
            <button
                class="btn btn-primary"
                disabled=move || disabled.get() || text.with(|t| t.trim().is_empty())
                on:click=move |_| send()
            >
                "Send"
            </button>
        </div>
    }
}
