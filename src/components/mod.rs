//! UI Components
//!
//! Reusable Leptos components.

mod bulk_actions_bar;
mod chat_input;
mod chat_message;
mod chatbot;
mod dashboard;
mod delete_confirm_button;
mod field_error;
mod login_page;
mod modal;
mod search_and_filter;
mod shortcuts_help;
mod signup_page;
mod tags_manager;
mod task_form;
mod task_item;
mod task_statistics;
mod theme_toggle;
mod toaster;

pub use bulk_actions_bar::BulkActionsBar;
pub use chat_input::ChatInput;
pub use chat_message::ChatMessageView;
pub use chatbot::Chatbot;
pub use dashboard::Dashboard;
pub use delete_confirm_button::DeleteConfirmButton;
pub use field_error::FieldError;
pub use login_page::LoginPage;
pub use modal::Modal;
pub use search_and_filter::SearchAndFilter;
pub use shortcuts_help::ShortcutsHelp;
pub use signup_page::SignupPage;
pub use tags_manager::TagsManager;
pub use task_form::TaskForm;
pub use task_item::TaskItem;
pub use task_statistics::TaskStatistics;
pub use theme_toggle::ThemeToggle;
pub use toaster::{ToastHost, Toaster};
