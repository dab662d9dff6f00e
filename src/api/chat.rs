//! Chat Endpoints

use async_trait::async_trait;
use reqwest::Method;

use super::{ApiClient, ApiError};
use crate::models::{ChatMessage, ChatRequest, ChatResponse, Conversation};

#[async_trait(?Send)]
pub trait ChatApi: Send + Sync {
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError>;
    async fn list_conversations(&self) -> Result<Vec<Conversation>, ApiError>;
    async fn conversation_messages(&self, conversation_id: u64) -> Result<Vec<ChatMessage>, ApiError>;
    async fn delete_conversation(&self, conversation_id: u64) -> Result<(), ApiError>;
}

#[async_trait(?Send)]
impl ChatApi for ApiClient {
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        self.json(self.request(Method::POST, "/chat").json(request)).await
    }

    async fn list_conversations(&self) -> Result<Vec<Conversation>, ApiError> {
        self.json(self.request(Method::GET, "/chat/conversations")).await
    }

    async fn conversation_messages(&self, conversation_id: u64) -> Result<Vec<ChatMessage>, ApiError> {
        let path = format!("/chat/conversations/{}/messages", conversation_id);
        self.json(self.request(Method::GET, &path)).await
    }

    async fn delete_conversation(&self, conversation_id: u64) -> Result<(), ApiError> {
        let path = format!("/chat/conversations/{}", conversation_id);
        self.empty(self.request(Method::DELETE, &path)).await
    }
}
