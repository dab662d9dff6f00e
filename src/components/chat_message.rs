use leptos::prelude::*;

use crate::markdown::render_markdown;
use crate::models::{ChatMessage, Role};

/// One chat bubble. Assistant replies are rendered as markdown.
#[component]
pub fn ChatMessageView(message: ChatMessage) -> impl IntoView {
    let tools = message.tool_call_count();
    let body = match message.role {
        Role::Assistant => {
            let html = render_markdown(&message.content);
            view! { <div class="chat-bubble markdown" inner_html=html></div> }.into_any()
        }
        _ => view! { <div class="chat-bubble">{message.content.clone()}</div> }.into_any(),
    };
    let row_class = match message.role {
        Role::User => "chat-row user",
        Role::Assistant => "chat-row assistant",
        Role::System => "chat-row system",
    };

    view! {
        <div class=row_class>
            {body}
            {(tools > 0).then(|| view! {
                <span class="chat-tools">
                    {format!("Used {} tool{}", tools, if tools == 1 { "" } else { "s" })}
                </span>
            })}
        </div>
    }
}
