//! Chat Queries
//!
//! Conversation list and per-conversation message history. The assistant
//! can create, edit and delete tasks and tags through its tools, so every
//! sent message invalidates those caches as well.

use std::sync::Arc;

use query_cache::QueryCache;

use super::tags::TagCache;
use super::tasks::TaskCache;
use crate::api::{ApiError, ChatApi};
use crate::models::{ChatMessage, ChatRequest, ChatResponse, Conversation};

pub type ConversationCache = QueryCache<(), Vec<Conversation>>;
pub type MessageCache = QueryCache<u64, Vec<ChatMessage>>;

#[derive(Clone)]
pub struct ChatStore {
    api: Arc<dyn ChatApi>,
    conversations: ConversationCache,
    messages: MessageCache,
    tasks: TaskCache,
    tags: TagCache,
}

impl ChatStore {
    pub fn new(api: Arc<dyn ChatApi>, tasks: TaskCache, tags: TagCache) -> Self {
        Self {
            api,
            conversations: ConversationCache::new(),
            messages: MessageCache::new(),
            tasks,
            tags,
        }
    }

    pub fn conversations(&self) -> &ConversationCache {
        &self.conversations
    }

    pub fn messages(&self) -> &MessageCache {
        &self.messages
    }

    pub fn cached_messages(&self, conversation_id: u64) -> Vec<ChatMessage> {
        self.messages.get(&conversation_id).unwrap_or_default()
    }

    pub async fn load_conversations(&self) -> Result<Option<Vec<Conversation>>, ApiError> {
        if !self.conversations.needs_fetch(&()) {
            return Ok(self.conversations.get(&()));
        }
        let fetched = self.conversations.fetch((), self.api.list_conversations()).await?;
        Ok(fetched.into_option())
    }

    pub async fn load_messages(&self, conversation_id: u64) -> Result<Option<Vec<ChatMessage>>, ApiError> {
        if !self.messages.needs_fetch(&conversation_id) {
            return Ok(self.messages.get(&conversation_id));
        }
        let fetched = self
            .messages
            .fetch(conversation_id, self.api.conversation_messages(conversation_id))
            .await?;
        Ok(fetched.into_option())
    }

    /// Send `message`, starting a new conversation when `conversation_id` is
    /// `None`. The reply names the conversation it landed in.
    pub async fn send(&self, message: &str, conversation_id: Option<u64>) -> Result<ChatResponse, ApiError> {
        let request = ChatRequest {
            message: message.to_string(),
            conversation_id,
        };
        let response = self.api.send_message(&request).await?;

        let tools = response.tool_calls.as_deref().unwrap_or_default();
        if !tools.is_empty() {
            log::info!(
                "assistant used {} tool(s): {}",
                tools.len(),
                tools.iter().map(|t| t.tool.as_str()).collect::<Vec<_>>().join(", ")
            );
        }

        // Show the exchange now; the refetch brings back the stored copies
        let mut history = self.cached_messages(response.conversation_id);
        history.push(ChatMessage::user(message));
        history.push(ChatMessage::assistant(response.response.clone(), tools));
        self.messages.set(response.conversation_id, history);
        self.messages.invalidate(&response.conversation_id);

        self.conversations.invalidate_all();
        self.tasks.invalidate_all();
        self.tags.invalidate_all();
        Ok(response)
    }

    pub async fn delete_conversation(&self, conversation_id: u64) -> Result<(), ApiError> {
        self.api.delete_conversation(conversation_id).await?;
        self.messages.restore(conversation_id, None);
        self.conversations.invalidate_all();
        Ok(())
    }

    pub fn clear(&self) {
        self.conversations.clear();
        self.messages.clear();
    }
}
