//! Backend HTTP Client
//!
//! `ApiClient` wraps `reqwest` with the base URL, bearer token attachment and
//! global 401 handling. Endpoint groups are async traits implemented by the
//! client, so stores can be driven by in-memory fakes in tests.

mod auth;
mod chat;
mod tags;
mod tasks;

use std::sync::{Arc, Mutex, PoisonError};

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::session::Session;

pub use auth::*;
pub use chat::*;
pub use tags::*;
pub use tasks::*;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    /// Token missing, expired or rejected. The session is already cleared.
    #[error("{0}")]
    Unauthorized(String),
    #[error("{detail}")]
    Status { status: u16, detail: String },
    #[error("Unexpected response from server: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn from_response(status: u16, reason: Option<&str>, body: &str) -> Self {
        let fallback = reason.unwrap_or("Request failed");
        let detail = parse_detail(body).unwrap_or_else(|| fallback.to_string());
        if status == StatusCode::UNAUTHORIZED.as_u16() {
            ApiError::Unauthorized(detail)
        } else {
            ApiError::Status { status, detail }
        }
    }
}

/// `detail` from a `{"detail": ...}` error body. Non-string details (e.g.
/// validation error lists) come back as compact JSON.
pub fn parse_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::String(_) | Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Callback run after any 401, once the session has been cleared
pub type UnauthorizedHandler = Arc<dyn Fn() + Send + Sync>;

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Arc<str>,
    session: Session,
    on_unauthorized: Arc<Mutex<Option<UnauthorizedHandler>>>,
}

impl ApiClient {
    pub fn new(base_url: &str, session: Session) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: Arc::from(base_url.trim_end_matches('/')),
            session,
            on_unauthorized: Arc::new(Mutex::new(None)),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn set_unauthorized_handler(&self, handler: impl Fn() + Send + Sync + 'static) {
        *self.on_unauthorized.lock().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(handler));
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn handle_unauthorized(&self) {
        log::warn!("[API] 401 received, clearing session");
        self.session.clear();
        let handler = self.on_unauthorized.lock().unwrap_or_else(PoisonError::into_inner).clone();
        if let Some(handler) = handler {
            handler();
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(self.reject(status, &body))
    }

    /// Error for a non-success response. A 401 also ends the session.
    fn reject(&self, status: StatusCode, body: &str) -> ApiError {
        let error = ApiError::from_response(status.as_u16(), status.canonical_reason(), body);
        log::warn!("[API] {} {}", status.as_u16(), error);
        if status == StatusCode::UNAUTHORIZED {
            self.handle_unauthorized();
        }
        error
    }

    async fn json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        self.send(builder)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn empty(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        self.send(builder).await.map(|_| ())
    }
}
