//! Tag Endpoints

use async_trait::async_trait;
use reqwest::Method;

use super::{ApiClient, ApiError};
use crate::models::{NewTag, Tag, TagPatch};

#[async_trait(?Send)]
pub trait TagApi: Send + Sync {
    async fn list_tags(&self) -> Result<Vec<Tag>, ApiError>;
    async fn create_tag(&self, tag: &NewTag) -> Result<Tag, ApiError>;
    async fn update_tag(&self, id: u64, patch: &TagPatch) -> Result<Tag, ApiError>;
    async fn delete_tag(&self, id: u64) -> Result<(), ApiError>;
}

#[async_trait(?Send)]
impl TagApi for ApiClient {
    async fn list_tags(&self) -> Result<Vec<Tag>, ApiError> {
        self.json(self.request(Method::GET, "/tags/")).await
    }

    async fn create_tag(&self, tag: &NewTag) -> Result<Tag, ApiError> {
        self.json(self.request(Method::POST, "/tags/").json(tag)).await
    }

    async fn update_tag(&self, id: u64, patch: &TagPatch) -> Result<Tag, ApiError> {
        self.json(self.request(Method::PATCH, &format!("/tags/{}/", id)).json(patch)).await
    }

    async fn delete_tag(&self, id: u64) -> Result<(), ApiError> {
        self.empty(self.request(Method::DELETE, &format!("/tags/{}/", id))).await
    }
}
