//! In-memory backend for store tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::api::{ApiError, AuthApi, ChatApi, TagApi, TaskApi};
use crate::filters::TaskQuery;
use crate::models::fixtures::page;
use crate::models::*;
use crate::session::Session;

#[derive(Default)]
struct State {
    tasks: Vec<Task>,
    tags: Vec<Tag>,
    conversations: Vec<Conversation>,
    messages: HashMap<u64, Vec<ChatMessage>>,
    chat_tool_calls: Vec<ToolCall>,
    accounts: HashMap<String, (String, User)>,
    issued: HashMap<String, User>,
    session: Option<Session>,
    fail_next: Option<String>,
    list_calls: usize,
    login_calls: usize,
    bulk_update_calls: Vec<Vec<u64>>,
}

#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<State>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Arc<Self> {
        let backend = Self::default();
        backend.state().tasks = tasks;
        Arc::new(backend)
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The next mutating call fails with a 500 carrying `detail`
    pub fn fail_next(&self, detail: &str) {
        self.state().fail_next = Some(detail.to_string());
    }

    fn check_failure(&self) -> Result<(), ApiError> {
        match self.state().fail_next.take() {
            Some(detail) => Err(ApiError::Status { status: 500, detail }),
            None => Ok(()),
        }
    }

    pub fn seed_tags(&self, tags: Vec<Tag>) {
        self.state().tags = tags;
    }

    pub fn rename(&self, id: u64, title: &str) {
        if let Some(task) = self.state().tasks.iter_mut().find(|t| t.id == id) {
            task.title = title.to_string();
        }
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.state().tasks.clone()
    }

    pub fn list_calls(&self) -> usize {
        self.state().list_calls
    }

    pub fn login_calls(&self) -> usize {
        self.state().login_calls
    }

    pub fn bulk_update_calls(&self) -> Vec<Vec<u64>> {
        self.state().bulk_update_calls.clone()
    }

    pub fn register(&self, email: &str, password: &str, user: User) {
        self.state()
            .accounts
            .insert(email.to_string(), (password.to_string(), user));
    }

    /// Session whose token stands in for the `Authorization` header
    pub fn attach(&self, session: Session) {
        self.state().session = Some(session);
    }

    /// Tool calls reported by the next chat reply; a reported `add_task`
    /// also creates the task
    pub fn chat_tools(&self, calls: Vec<ToolCall>) {
        self.state().chat_tool_calls = calls;
    }

    fn issue(&self, user: User) -> AuthResponse {
        let mut state = self.state();
        let token = format!("token-{}", state.issued.len() + 1);
        state.issued.insert(token.clone(), user.clone());
        AuthResponse {
            user,
            token,
            expires_at: "2099-01-01T00:00:00Z".to_string(),
        }
    }

    fn next_task_id(state: &State) -> u64 {
        state.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }
}

fn unauthorized() -> ApiError {
    ApiError::Unauthorized("Could not validate credentials".to_string())
}

#[async_trait(?Send)]
impl AuthApi for FakeBackend {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        let user = {
            let mut state = self.state();
            state.login_calls += 1;
            match state.accounts.get(&credentials.email) {
                Some((password, user)) if *password == credentials.password => user.clone(),
                _ => return Err(ApiError::Unauthorized("Incorrect email or password".to_string())),
            }
        };
        Ok(self.issue(user))
    }

    async fn signup(&self, data: &SignupData) -> Result<AuthResponse, ApiError> {
        self.check_failure()?;
        let user = User {
            id: format!("u-{}", data.email),
            name: data.name.clone(),
            email: data.email.clone(),
            created_at: "2024-05-01T09:00:00".to_string(),
        };
        self.register(&data.email, &data.password, user.clone());
        Ok(self.issue(user))
    }

    async fn me(&self) -> Result<User, ApiError> {
        let state = self.state();
        let token = state.session.as_ref().and_then(Session::token).ok_or_else(unauthorized)?;
        state.issued.get(&token).cloned().ok_or_else(unauthorized)
    }
}

#[async_trait(?Send)]
impl TaskApi for FakeBackend {
    async fn list_tasks(&self, query: &TaskQuery) -> Result<TaskListResponse, ApiError> {
        let mut state = self.state();
        state.list_calls += 1;
        let tasks = state
            .tasks
            .iter()
            .filter(|t| query.completed.map_or(true, |c| t.completed == c))
            .cloned()
            .collect();
        Ok(page(tasks))
    }

    async fn create_task(&self, task: &NewTask) -> Result<Task, ApiError> {
        self.check_failure()?;
        let mut state = self.state();
        let mut created = crate::models::fixtures::task(Self::next_task_id(&state), false);
        created.title = task.title.clone();
        created.priority = task.priority;
        state.tasks.push(created.clone());
        Ok(created)
    }

    async fn update_task(&self, id: u64, patch: &TaskPatch) -> Result<Task, ApiError> {
        self.check_failure()?;
        let mut state = self.state();
        let task = state
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| ApiError::Status {
                status: 404,
                detail: "Task not found".to_string(),
            })?;
        *task = patch.apply_to(task);
        Ok(task.clone())
    }

    async fn delete_task(&self, id: u64) -> Result<(), ApiError> {
        self.check_failure()?;
        self.state().tasks.retain(|t| t.id != id);
        Ok(())
    }

    async fn bulk_delete(&self, ids: &[u64]) -> Result<(), ApiError> {
        self.check_failure()?;
        self.state().tasks.retain(|t| !ids.contains(&t.id));
        Ok(())
    }

    async fn bulk_update(&self, ids: &[u64], patch: &TaskPatch) -> Result<Vec<Task>, ApiError> {
        self.check_failure()?;
        let mut state = self.state();
        state.bulk_update_calls.push(ids.to_vec());
        let mut updated = Vec::new();
        for task in state.tasks.iter_mut().filter(|t| ids.contains(&t.id)) {
            *task = patch.apply_to(task);
            updated.push(task.clone());
        }
        Ok(updated)
    }
}

#[async_trait(?Send)]
impl TagApi for FakeBackend {
    async fn list_tags(&self) -> Result<Vec<Tag>, ApiError> {
        Ok(self.state().tags.clone())
    }

    async fn create_tag(&self, tag: &NewTag) -> Result<Tag, ApiError> {
        self.check_failure()?;
        let mut state = self.state();
        let id = state.tags.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        let mut created = crate::models::fixtures::tag(id, &tag.name);
        created.color = tag.color.clone();
        state.tags.push(created.clone());
        Ok(created)
    }

    async fn update_tag(&self, id: u64, patch: &TagPatch) -> Result<Tag, ApiError> {
        self.check_failure()?;
        let mut state = self.state();
        let tag = state.tags.iter_mut().find(|t| t.id == id).ok_or_else(|| ApiError::Status {
            status: 404,
            detail: "Tag not found".to_string(),
        })?;
        if let Some(name) = &patch.name {
            tag.name = name.clone();
        }
        if let Some(color) = &patch.color {
            tag.color = Some(color.clone());
        }
        let updated = tag.clone();
        for task in state.tasks.iter_mut() {
            for task_tag in task.tags.iter_mut().filter(|t| t.id == id) {
                *task_tag = updated.clone();
            }
        }
        Ok(updated)
    }

    async fn delete_tag(&self, id: u64) -> Result<(), ApiError> {
        self.check_failure()?;
        let mut state = self.state();
        state.tags.retain(|t| t.id != id);
        for task in state.tasks.iter_mut() {
            task.tags.retain(|t| t.id != id);
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl ChatApi for FakeBackend {
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        self.check_failure()?;
        let mut state = self.state();
        let conversation_id = match request.conversation_id {
            Some(id) => id,
            None => {
                let id = state.conversations.len() as u64 + 1;
                state.conversations.push(Conversation {
                    id,
                    title: request.message.chars().take(50).collect(),
                    created_at: "2024-05-01T09:00:00".to_string(),
                    updated_at: "2024-05-01T09:00:00".to_string(),
                });
                id
            }
        };

        let tool_calls = std::mem::take(&mut state.chat_tool_calls);
        for call in tool_calls.iter().filter(|c| c.tool == "add_task") {
            let id = Self::next_task_id(&state);
            let mut task = crate::models::fixtures::task(id, false);
            if let Some(title) = call.args.get("title").and_then(|v| v.as_str()) {
                task.title = title.to_string();
            }
            state.tasks.push(task);
        }

        let reply = format!("Done: {}", request.message);
        let messages = state.messages.entry(conversation_id).or_default();
        messages.push(ChatMessage::user(request.message.clone()));
        messages.push(ChatMessage::assistant(reply.clone(), &tool_calls));

        Ok(ChatResponse {
            conversation_id,
            response: reply,
            tool_calls: (!tool_calls.is_empty()).then_some(tool_calls),
        })
    }

    async fn list_conversations(&self) -> Result<Vec<Conversation>, ApiError> {
        Ok(self.state().conversations.clone())
    }

    async fn conversation_messages(&self, conversation_id: u64) -> Result<Vec<ChatMessage>, ApiError> {
        self.state()
            .messages
            .get(&conversation_id)
            .cloned()
            .ok_or_else(|| ApiError::Status {
                status: 404,
                detail: "Conversation not found".to_string(),
            })
    }

    async fn delete_conversation(&self, conversation_id: u64) -> Result<(), ApiError> {
        self.check_failure()?;
        let mut state = self.state();
        state.conversations.retain(|c| c.id != conversation_id);
        state.messages.remove(&conversation_id);
        Ok(())
    }
}
