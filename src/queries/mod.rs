//! Client-side Queries
//!
//! Cached views of backend data and the mutations that keep them in sync.

mod auth;
mod chat;
mod tags;
mod tasks;

#[cfg(test)]
pub(crate) mod fakes;

use std::sync::Arc;

use crate::api::{ApiClient, AuthApi, ChatApi, TagApi, TaskApi};
use crate::session::Session;

pub use auth::AuthStore;
pub use chat::ChatStore;
pub use tags::{TagStore, TAG_COLORS};
pub use tasks::TaskStore;

/// Every store, wired to one backend and one session
#[derive(Clone)]
pub struct Services {
    pub auth: AuthStore,
    pub tasks: TaskStore,
    pub tags: TagStore,
    pub chat: ChatStore,
}

impl Services {
    pub fn new(client: ApiClient) -> Self {
        let client = Arc::new(client);
        let session = client.session().clone();
        Self::with_backends(session, client.clone(), client.clone(), client.clone(), client)
    }

    pub fn with_backends(
        session: Session,
        auth: Arc<dyn AuthApi>,
        tasks: Arc<dyn TaskApi>,
        tags: Arc<dyn TagApi>,
        chat: Arc<dyn ChatApi>,
    ) -> Self {
        let tasks = TaskStore::new(tasks);
        let tags = TagStore::new(tags, tasks.cache().clone());
        let chat = ChatStore::new(chat, tasks.cache().clone(), tags.cache().clone());
        Self {
            auth: AuthStore::new(session, auth),
            tasks,
            tags,
            chat,
        }
    }

    /// Drop all cached data, cancelling in-flight fetches
    pub fn clear_caches(&self) {
        self.tasks.cache().clear();
        self.tags.cache().clear();
        self.chat.clear();
    }

    pub fn logout(&self) {
        self.auth.logout();
        self.clear_caches();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::TaskQuery;
    use crate::models::fixtures;
    use crate::session::MemoryStorage;
    use fakes::FakeBackend;

    #[tokio::test]
    async fn test_logout_clears_session_and_caches() {
        let backend = FakeBackend::with_tasks(vec![fixtures::task(1, false)]);
        let session = Session::load(Arc::new(MemoryStorage::default()));
        let services = Services::with_backends(
            session.clone(),
            backend.clone(),
            backend.clone(),
            backend.clone(),
            backend.clone(),
        );
        backend.register("ada@example.com", "pw", fixtures::user());
        services
            .auth
            .login(&crate::models::Credentials {
                email: "ada@example.com".into(),
                password: "pw".into(),
            })
            .await
            .unwrap();
        services.tasks.load(&TaskQuery::default()).await.unwrap();

        services.logout();

        assert!(!session.is_authenticated());
        assert_eq!(services.tasks.cached(&TaskQuery::default()), None);
    }
}
