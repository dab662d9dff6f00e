//! Auth Endpoints

use async_trait::async_trait;
use reqwest::Method;

use super::{ApiClient, ApiError};
use crate::models::{AuthResponse, Credentials, SignupData, User};

#[async_trait(?Send)]
pub trait AuthApi: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError>;
    async fn signup(&self, data: &SignupData) -> Result<AuthResponse, ApiError>;
    /// Current user for the attached bearer token
    async fn me(&self) -> Result<User, ApiError>;
}

#[async_trait(?Send)]
impl AuthApi for ApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        self.json(self.request(Method::POST, "/auth/login").json(credentials)).await
    }

    async fn signup(&self, data: &SignupData) -> Result<AuthResponse, ApiError> {
        self.json(self.request(Method::POST, "/auth/signup").json(data)).await
    }

    async fn me(&self) -> Result<User, ApiError> {
        self.json(self.request(Method::GET, "/auth/me")).await
    }
}
