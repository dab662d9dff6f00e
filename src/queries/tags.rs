//! Tag Queries
//!
//! The user's tag list. Renaming or deleting a tag also changes the tags
//! embedded in tasks, so those writes invalidate the task lists too.

use std::sync::Arc;

use query_cache::QueryCache;

use super::tasks::TaskCache;
use crate::api::{ApiError, TagApi};
use crate::models::{NewTag, Tag, TagPatch};

/// Single-entry cache; the key is `()`
pub type TagCache = QueryCache<(), Vec<Tag>>;

/// Palette offered when creating a tag
pub const TAG_COLORS: [&str; 8] = [
    "#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6", "#EC4899", "#6366F1", "#14B8A6",
];

#[derive(Clone)]
pub struct TagStore {
    api: Arc<dyn TagApi>,
    cache: TagCache,
    tasks: TaskCache,
}

impl TagStore {
    pub fn new(api: Arc<dyn TagApi>, tasks: TaskCache) -> Self {
        Self {
            api,
            cache: TagCache::new(),
            tasks,
        }
    }

    pub fn cache(&self) -> &TagCache {
        &self.cache
    }

    pub fn cached(&self) -> Vec<Tag> {
        self.cache.get(&()).unwrap_or_default()
    }

    pub async fn load(&self) -> Result<Option<Vec<Tag>>, ApiError> {
        if !self.cache.needs_fetch(&()) {
            return Ok(self.cache.get(&()));
        }
        let fetched = self.cache.fetch((), self.api.list_tags()).await?;
        Ok(fetched.into_option())
    }

    pub async fn create(&self, tag: &NewTag) -> Result<Tag, ApiError> {
        let created = self.api.create_tag(tag).await?;
        log::info!("created tag {:?}", created.name);
        self.cache.invalidate_all();
        Ok(created)
    }

    pub async fn update(&self, id: u64, patch: &TagPatch) -> Result<Tag, ApiError> {
        let updated = self.api.update_tag(id, patch).await?;
        self.cache.invalidate_all();
        self.tasks.invalidate_all();
        Ok(updated)
    }

    pub async fn delete(&self, id: u64) -> Result<(), ApiError> {
        self.api.delete_tag(id).await?;
        log::info!("deleted tag {}", id);
        self.cache.invalidate_all();
        self.tasks.invalidate_all();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::TaskQuery;
    use crate::models::fixtures;
    use crate::queries::fakes::FakeBackend;
    use crate::queries::tasks::TaskStore;

    #[tokio::test]
    async fn test_create_marks_tags_stale_only() {
        let backend = FakeBackend::new();
        let tasks = TaskStore::new(backend.clone());
        let tags = TagStore::new(backend.clone(), tasks.cache().clone());
        tasks.load(&TaskQuery::default()).await.unwrap();
        tags.load().await.unwrap();

        tags.create(&NewTag {
            name: "urgent".into(),
            color: Some(TAG_COLORS[3].into()),
        })
        .await
        .unwrap();

        assert!(tags.cache().is_stale(&()));
        assert!(!tasks.cache().is_stale(&TaskQuery::default()));
        assert_eq!(tags.load().await.unwrap().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rename_invalidates_tasks() {
        let mut tagged = fixtures::task(1, false);
        tagged.tags = vec![fixtures::tag(5, "home")];
        let backend = FakeBackend::with_tasks(vec![tagged]);
        backend.seed_tags(vec![fixtures::tag(5, "home")]);
        let tasks = TaskStore::new(backend.clone());
        let tags = TagStore::new(backend.clone(), tasks.cache().clone());
        let visible = TaskQuery::default();
        tasks.load(&visible).await.unwrap();

        tags.update(
            5,
            &TagPatch {
                name: Some("house".into()),
                color: None,
            },
        )
        .await
        .unwrap();

        assert!(tasks.cache().is_stale(&visible));
        let fresh = tasks.load(&visible).await.unwrap().unwrap();
        assert_eq!(fresh.tasks[0].tags[0].name, "house");
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_caches_fresh() {
        let backend = FakeBackend::new();
        backend.seed_tags(vec![fixtures::tag(5, "home")]);
        let tasks = TaskStore::new(backend.clone());
        let tags = TagStore::new(backend.clone(), tasks.cache().clone());
        tags.load().await.unwrap();

        backend.fail_next("Tag in use");
        let result = tags.delete(5).await;

        assert_eq!(result.unwrap_err().to_string(), "Tag in use");
        assert!(!tags.cache().is_stale(&()));
        assert_eq!(tags.cached().len(), 1);
    }
}
