//! Chatbot Panel
//!
//! Floating assistant panel. The assistant acts on tasks and tags through
//! server-side tools; after each reply the task and tag caches are stale, so
//! whatever it changed shows up on the dashboard behind the panel.

use leptos::html::Div;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::{ChatInput, ChatMessageView, DeleteConfirmButton};
use crate::context::use_app_context;
use crate::models::ChatMessage;
use crate::store::{use_ui_store, UiStateStoreFields};

#[component]
pub fn Chatbot() -> impl IntoView {
    let ctx = use_app_context();
    let ui = use_ui_store();
    let (conversation_id, set_conversation_id) = signal::<Option<u64>>(None);
    // User message shown while its reply is on the way
    let (pending, set_pending) = signal::<Option<String>>(None);
    let (show_history, set_show_history) = signal(false);
    let scroller = NodeRef::<Div>::new();

    Effect::new(move |_| {
        ctx.chat_version.track();
        let (Some(id), true) = (conversation_id.get(), ui.chat_open().get()) else {
            return;
        };
        let chat = ctx.services().chat;
        if chat.messages().needs_fetch(&id) {
            spawn_local(async move {
                if let Err(e) = chat.load_messages(id).await {
                    ctx.report("Failed to load messages", &e);
                }
            });
        }
    });

    Effect::new(move |_| {
        ctx.chat_version.track();
        if !show_history.get() {
            return;
        }
        let chat = ctx.services().chat;
        if chat.conversations().needs_fetch(&()) {
            spawn_local(async move {
                if let Err(e) = chat.load_conversations().await {
                    ctx.report("Failed to load conversations", &e);
                }
            });
        }
    });

    let messages = Memo::new(move |_| {
        ctx.chat_version.track();
        conversation_id
            .get()
            .map(|id| ctx.services().chat.cached_messages(id))
            .unwrap_or_default()
    });
    let conversations = Memo::new(move |_| {
        ctx.chat_version.track();
        ctx.services().chat.conversations().get(&()).unwrap_or_default()
    });

    // Keep the newest message in view
    Effect::new(move |_| {
        messages.track();
        pending.track();
        if let Some(el) = scroller.get() {
            el.set_scroll_top(el.scroll_height());
        }
    });

    let on_send = Callback::new(move |message: String| {
        set_pending.set(Some(message.clone()));
        let current = conversation_id.get_untracked();
        spawn_local(async move {
            let result = ctx.services().chat.send(&message, current).await;
            if let Ok(response) = &result {
                set_conversation_id.try_set(Some(response.conversation_id));
            }
            set_pending.try_set(None);
            match result {
                Ok(response) => {
                    if let Some(tools) = response.tool_calls.filter(|t| !t.is_empty()) {
                        let names: Vec<&str> = tools.iter().map(|t| t.tool.as_str()).collect();
                        ctx.toaster.info(format!("Assistant used: {}", names.join(", ")));
                    }
                }
                Err(e) => ctx.report("Failed to send message", &e),
            }
        });
    });

    let new_conversation = move |_| {
        set_conversation_id.set(None);
        set_show_history.set(false);
    };

    view! {
        <Show when=move || ui.chat_open().get()>
            <aside class="chat-panel">
                <header class="chat-header">
                    <h2>"Task Assistant"</h2>
                    <div class="chat-header-actions">
                        <button class="icon-btn" title="Conversations" on:click=move |_| set_show_history.update(|s| *s = !*s)>
                            "☰"
                        </button>
                        <button class="icon-btn" title="New conversation" on:click=new_conversation>"＋"</button>
                        <button class="icon-btn" title="Close" on:click=move |_| ui.chat_open().set(false)>"×"</button>
                    </div>
                </header>

                <Show when=move || show_history.get()>
                    <ul class="conversation-list">
                        <For
                            each=move || conversations.get()
                            key=|c| c.id
                            children=move |conversation| {
                                let id = conversation.id;
                                let on_delete = Callback::new(move |_| {
                                    spawn_local(async move {
                                        match ctx.services().chat.delete_conversation(id).await {
                                            Ok(()) => {
                                                if conversation_id.get_untracked() == Some(id) {
                                                    set_conversation_id.try_set(None);
                                                }
                                                ctx.toaster.success("Conversation deleted");
                                            }
                                            Err(e) => ctx.report("Failed to delete conversation", &e),
                                        }
                                    });
                                });
                                view! {
                                    <li
                                        class="conversation-row"
                                        class:active=move || conversation_id.get() == Some(id)
                                    >
                                        <span
                                            class="conversation-title"
                                            on:click=move |_| {
                                                set_conversation_id.set(Some(id));
                                                set_show_history.set(false);
                                            }
                                        >
                                            {conversation.title.clone()}
                                        </span>
                                        <DeleteConfirmButton button_class="icon-btn danger" on_confirm=on_delete />
                                    </li>
                                }
                            }
                        />
                        <Show when=move || conversations.with(|c| c.is_empty())>
                            <li class="muted">"No conversations yet"</li>
                        </Show>
                    </ul>
                </Show>

                <div class="chat-messages" node_ref=scroller>
                    <Show when=move || { messages.with(|m| m.is_empty()) && pending.with(Option::is_none) }>
                        <p class="chat-empty">
                            "Hi! I can add, list, update, complete and delete tasks for you. Try \"Add a task to buy groceries tomorrow\"."
                        </p>
                    </Show>
                    {move || messages.get().into_iter().map(|message| view! {
                        <ChatMessageView message=message />
                    }).collect_view()}
                    {move || pending.get().map(|text| view! {
                        <ChatMessageView message=ChatMessage::user(text) />
                        <div class="chat-row assistant">
                            <div class="chat-bubble typing">"Thinking..."</div>
                        </div>
                    })}
                </div>

                <ChatInput disabled=Signal::derive(move || pending.with(Option::is_some)) on_send=on_send />
            </aside>
        </Show>
    }
}
