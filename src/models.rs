//! Frontend Models
//!
//! Data structures matching backend entities and request bodies.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Authenticated account (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    pub created_at: String,
}

impl User {
    /// Name when set, otherwise the email address
    pub fn display_name(&self) -> &str {
        self.name.as_deref().filter(|n| !n.is_empty()).unwrap_or(&self.email)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == s)
    }
}

/// Task data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub estimated_minutes: Option<u32>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    pub created_at: String,
    pub updated_at: String,
}

/// Tag data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: u64,
    pub title: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// One message of a stored or live conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub id: Option<u64>,
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub tool_calls: Option<Value>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: None,
            role: Role::User,
            content: content.into(),
            tool_calls: None,
            created_at: None,
        }
    }

    pub fn assistant(content: impl Into<String>, tool_calls: &[ToolCall]) -> Self {
        Self {
            id: None,
            role: Role::Assistant,
            content: content.into(),
            tool_calls: (!tool_calls.is_empty()).then(|| serde_json::json!(tool_calls)),
            created_at: None,
        }
    }

    /// Number of tool invocations recorded on the message.
    ///
    /// Stored messages carry either a bare array or `{"tools": [...]}`.
    pub fn tool_call_count(&self) -> usize {
        match &self.tool_calls {
            Some(Value::Array(calls)) => calls.len(),
            Some(Value::Object(map)) => map.get("tools").and_then(Value::as_array).map_or(0, Vec::len),
            _ => 0,
        }
    }
}

/// Record of a tool the assistant ran on the user's behalf
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub tool: String,
    #[serde(default)]
    pub args: Value,
    #[serde(default)]
    pub result: Value,
}

// ========================
// Responses
// ========================

/// One page of tasks plus server-side counts.
///
/// `completed` counts every task of the user while `total` honours the
/// filters, so `pending` may come back negative.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TaskListResponse {
    pub tasks: Vec<Task>,
    pub total: i64,
    pub completed: i64,
    pub pending: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
    pub expires_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub conversation_id: u64,
    pub response: String,
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCall>>,
}

// ========================
// Request Bodies
// ========================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SignupData {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct NewTask {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<u32>,
    pub tag_ids: Vec<u64>,
}

/// Partial task update; unset fields are left alone by the backend
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<u64>>,
}

impl TaskPatch {
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Default::default()
        }
    }

    /// Local prediction of the patch on a cached task. Tag changes are left
    /// for the refetch since only ids are known here.
    pub fn apply_to(&self, task: &Task) -> Task {
        let mut next = task.clone();
        if let Some(title) = &self.title {
            next.title = title.clone();
        }
        if let Some(description) = &self.description {
            next.description = Some(description.clone());
        }
        if let Some(completed) = self.completed {
            next.completed = completed;
        }
        if let Some(priority) = self.priority {
            next.priority = priority;
        }
        if let Some(category) = &self.category {
            next.category = Some(category.clone());
        }
        if let Some(due_date) = &self.due_date {
            next.due_date = Some(due_date.clone());
        }
        if let Some(minutes) = self.estimated_minutes {
            next.estimated_minutes = Some(minutes);
        }
        next
    }
}

impl From<NewTask> for TaskPatch {
    fn from(task: NewTask) -> Self {
        Self {
            title: Some(task.title),
            description: task.description,
            completed: None,
            priority: Some(task.priority),
            category: task.category,
            due_date: task.due_date,
            estimated_minutes: task.estimated_minutes,
            tag_ids: Some(task.tag_ids),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTag {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TagPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_ignores_unknown_fields_and_defaults() {
        let json = r#"{
            "id": 7, "user_id": "u-1", "title": "Write report", "completed": false,
            "priority": "high", "created_at": "2024-05-01T09:00:00", "updated_at": "2024-05-01T09:00:00"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.priority, Priority::High);
        assert!(task.tags.is_empty());
        assert_eq!(task.due_date, None);
    }

    #[test]
    fn test_tool_call_count_shapes() {
        let mut msg = ChatMessage::user("hi");
        assert_eq!(msg.tool_call_count(), 0);

        msg.tool_calls = Some(serde_json::json!([{"tool": "add_task"}, {"tool": "list_tasks"}]));
        assert_eq!(msg.tool_call_count(), 2);

        msg.tool_calls = Some(serde_json::json!({"tools": [{"tool": "add_task"}]}));
        assert_eq!(msg.tool_call_count(), 1);
    }

    #[test]
    fn test_patch_skips_unset_fields() {
        let body = serde_json::to_value(TaskPatch::completed(true)).unwrap();
        assert_eq!(body, serde_json::json!({"completed": true}));
    }

    #[test]
    fn test_patch_apply_to() {
        let task = fixtures::task(1, false);
        let patch = TaskPatch {
            title: Some("Renamed".into()),
            priority: Some(Priority::Low),
            ..Default::default()
        };
        let next = patch.apply_to(&task);
        assert_eq!(next.title, "Renamed");
        assert_eq!(next.priority, Priority::Low);
        assert!(!next.completed);
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let mut user = fixtures::user();
        assert_eq!(user.display_name(), "Ada");
        user.name = Some(String::new());
        assert_eq!(user.display_name(), "ada@example.com");
    }
}
