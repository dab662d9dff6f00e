//! Form Validation
//!
//! Client-side checks run before any request is made. Each form yields
//! either its request body or per-field messages.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::{Credentials, NewTask, Priority, SignupData, Task};
use crate::stats::parse_due;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

pub const TITLE_MAX_CHARS: usize = 500;
pub const PASSWORD_MIN_CHARS: usize = 8;

/// Field name to message
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn add(&mut self, field: &'static str, message: &str) {
        self.0.entry(field).or_insert_with(|| message.to_string());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn remove(&mut self, field: &str) {
        self.0.remove(field);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

fn check_email(errors: &mut FieldErrors, email: &str) {
    if email.trim().is_empty() {
        errors.add("email", "Email is required");
    } else if !EMAIL_RE.is_match(email.trim()) {
        errors.add("email", "Invalid email format");
    }
}

pub fn validate_login(email: &str, password: &str) -> Result<Credentials, FieldErrors> {
    let mut errors = FieldErrors::default();
    check_email(&mut errors, email);
    if password.is_empty() {
        errors.add("password", "Password is required");
    }
    errors.into_result(Credentials {
        email: email.trim().to_string(),
        password: password.to_string(),
    })
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupForm {
    pub fn validate(&self) -> Result<SignupData, FieldErrors> {
        let mut errors = FieldErrors::default();
        if self.name.trim().is_empty() {
            errors.add("name", "Name is required");
        }
        check_email(&mut errors, &self.email);
        if self.password.is_empty() {
            errors.add("password", "Password is required");
        } else if self.password.chars().count() < PASSWORD_MIN_CHARS {
            errors.add("password", "Password must be at least 8 characters");
        }
        if self.confirm_password.is_empty() {
            errors.add("confirm_password", "Please confirm your password");
        } else if self.confirm_password != self.password {
            errors.add("confirm_password", "Passwords do not match");
        }
        errors.into_result(SignupData {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            name: Some(self.name.trim().to_string()),
        })
    }
}

/// Raw task form fields as typed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub category: String,
    /// `datetime-local` value, e.g. `2024-05-10T09:30`
    pub due_date: String,
    pub estimated_minutes: String,
    pub tag_ids: Vec<u64>,
}

impl TaskDraft {
    /// Prefill for editing an existing task
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            priority: task.priority,
            category: task.category.clone().unwrap_or_default(),
            due_date: task
                .due_date
                .as_deref()
                .and_then(parse_due)
                .map(|d| d.format("%Y-%m-%dT%H:%M").to_string())
                .unwrap_or_default(),
            estimated_minutes: task.estimated_minutes.map(|m| m.to_string()).unwrap_or_default(),
            tag_ids: task.tags.iter().map(|t| t.id).collect(),
        }
    }

    pub fn validate(&self) -> Result<NewTask, FieldErrors> {
        let mut errors = FieldErrors::default();
        let title = self.title.trim();
        if title.is_empty() {
            errors.add("title", "Title is required");
        } else if self.title.chars().count() > TITLE_MAX_CHARS {
            errors.add("title", "Title must be less than 500 characters");
        }

        let minutes = self.estimated_minutes.trim();
        let estimated_minutes = if minutes.is_empty() {
            None
        } else {
            match minutes.parse::<u32>() {
                Ok(m) if m > 0 => Some(m),
                _ => {
                    errors.add("estimated_minutes", "Estimated time must be positive");
                    None
                }
            }
        };

        let optional = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };

        errors.into_result(NewTask {
            title: title.to_string(),
            description: optional(&self.description),
            priority: self.priority,
            category: optional(&self.category),
            due_date: optional(&self.due_date),
            estimated_minutes,
            tag_ids: self.tag_ids.clone(),
        })
    }
}
