//! Task Queries
//!
//! Cached task lists keyed by resolved filter, plus the task mutations.
//! Every successful write marks all cached lists stale; toggles and bulk
//! updates are applied optimistically to the list on screen first.

use std::sync::Arc;

use query_cache::{Optimistic, QueryCache};

use crate::api::{ApiError, TaskApi};
use crate::filters::TaskQuery;
use crate::models::{NewTask, Task, TaskListResponse, TaskPatch};

pub type TaskCache = QueryCache<TaskQuery, TaskListResponse>;

#[derive(Clone)]
pub struct TaskStore {
    api: Arc<dyn TaskApi>,
    cache: TaskCache,
}

impl TaskStore {
    pub fn new(api: Arc<dyn TaskApi>) -> Self {
        Self {
            api,
            cache: TaskCache::new(),
        }
    }

    pub fn cache(&self) -> &TaskCache {
        &self.cache
    }

    pub fn cached(&self, query: &TaskQuery) -> Option<TaskListResponse> {
        self.cache.get(query)
    }

    /// Cached list when fresh, otherwise fetch it.
    ///
    /// `Ok(None)` means the fetch was cancelled by a newer request or an
    /// optimistic update.
    pub async fn load(&self, query: &TaskQuery) -> Result<Option<TaskListResponse>, ApiError> {
        if !self.cache.needs_fetch(query) {
            return Ok(self.cache.get(query));
        }
        self.refetch(query).await
    }

    pub async fn refetch(&self, query: &TaskQuery) -> Result<Option<TaskListResponse>, ApiError> {
        let fetched = self
            .cache
            .fetch(query.clone(), self.api.list_tasks(query))
            .await?;
        Ok(fetched.into_option())
    }

    pub async fn create(&self, task: &NewTask) -> Result<Task, ApiError> {
        let created = self.api.create_task(task).await?;
        log::info!("created task {}", created.id);
        self.cache.invalidate_all();
        Ok(created)
    }

    pub async fn update(&self, id: u64, patch: &TaskPatch) -> Result<Task, ApiError> {
        let updated = self.api.update_task(id, patch).await?;
        self.cache.invalidate_all();
        Ok(updated)
    }

    pub async fn delete(&self, id: u64) -> Result<(), ApiError> {
        self.api.delete_task(id).await?;
        log::info!("deleted task {}", id);
        self.cache.invalidate_all();
        Ok(())
    }

    pub async fn bulk_delete(&self, ids: &[u64]) -> Result<(), ApiError> {
        self.api.bulk_delete(ids).await?;
        log::info!("bulk deleted {} tasks", ids.len());
        self.cache.invalidate_all();
        Ok(())
    }

    /// Flip one task's completion, optimistically on the `visible` list
    pub async fn toggle_completion(
        &self,
        visible: &TaskQuery,
        id: u64,
        completed: bool,
    ) -> Result<Task, ApiError> {
        let patch = TaskPatch::completed(completed);
        let update = Optimistic::apply(&self.cache, visible.clone(), |page| patch_page(page, &[id], &patch));
        update.settle(self.api.update_task(id, &patch)).await
    }

    /// Apply `patch` to every id in a single request, optimistically on the
    /// `visible` list
    pub async fn bulk_update(
        &self,
        visible: &TaskQuery,
        ids: &[u64],
        patch: &TaskPatch,
    ) -> Result<Vec<Task>, ApiError> {
        let update = Optimistic::apply(&self.cache, visible.clone(), |page| patch_page(page, ids, patch));
        let updated = update.settle(self.api.bulk_update(ids, patch)).await?;
        log::info!("bulk updated {} tasks", updated.len());
        Ok(updated)
    }
}

/// Predicted page after `patch` lands on `ids`. Counts move only for tasks
/// whose completion actually flips.
fn patch_page(page: &TaskListResponse, ids: &[u64], patch: &TaskPatch) -> TaskListResponse {
    let mut next = page.clone();
    for task in next.tasks.iter_mut().filter(|t| ids.contains(&t.id)) {
        let was_completed = task.completed;
        *task = patch.apply_to(task);
        match (was_completed, task.completed) {
            (false, true) => {
                next.completed += 1;
                next.pending -= 1;
            }
            (true, false) => {
                next.completed -= 1;
                next.pending += 1;
            }
            _ => {}
        }
    }
    next
}
