//! Task Endpoints

use async_trait::async_trait;
use reqwest::Method;

use super::{ApiClient, ApiError};
use crate::filters::TaskQuery;
use crate::models::{NewTask, Task, TaskListResponse, TaskPatch};

#[async_trait(?Send)]
pub trait TaskApi: Send + Sync {
    async fn list_tasks(&self, query: &TaskQuery) -> Result<TaskListResponse, ApiError>;
    async fn create_task(&self, task: &NewTask) -> Result<Task, ApiError>;
    async fn update_task(&self, id: u64, patch: &TaskPatch) -> Result<Task, ApiError>;
    async fn delete_task(&self, id: u64) -> Result<(), ApiError>;
    async fn bulk_delete(&self, ids: &[u64]) -> Result<(), ApiError>;
    /// One request for every id; the backend ignores `tag_ids` here
    async fn bulk_update(&self, ids: &[u64], patch: &TaskPatch) -> Result<Vec<Task>, ApiError>;
}

#[async_trait(?Send)]
impl TaskApi for ApiClient {
    async fn list_tasks(&self, query: &TaskQuery) -> Result<TaskListResponse, ApiError> {
        self.json(self.request(Method::GET, "/tasks/").query(&query.query_pairs())).await
    }

    async fn create_task(&self, task: &NewTask) -> Result<Task, ApiError> {
        self.json(self.request(Method::POST, "/tasks/").json(task)).await
    }

    async fn update_task(&self, id: u64, patch: &TaskPatch) -> Result<Task, ApiError> {
        self.json(self.request(Method::PATCH, &format!("/tasks/{}/", id)).json(patch)).await
    }

    async fn delete_task(&self, id: u64) -> Result<(), ApiError> {
        self.empty(self.request(Method::DELETE, &format!("/tasks/{}/", id))).await
    }

    async fn bulk_delete(&self, ids: &[u64]) -> Result<(), ApiError> {
        self.empty(self.request(Method::POST, "/tasks/bulk-delete/").json(ids)).await
    }

    async fn bulk_update(&self, ids: &[u64], patch: &TaskPatch) -> Result<Vec<Task>, ApiError> {
        let task_ids: Vec<(&str, u64)> = ids.iter().map(|id| ("task_ids", *id)).collect();
        self.json(
            self.request(Method::PATCH, "/tasks/bulk-update/")
                .query(&task_ids)
                .json(patch),
        )
        .await
    }
}
