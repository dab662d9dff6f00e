//! Auth Queries
//!
//! Login, signup, logout and the current-user lookup, all going through the
//! shared [`Session`].

use std::sync::Arc;

use crate::api::{ApiError, AuthApi};
use crate::models::{Credentials, SignupData, User};
use crate::session::Session;

#[derive(Clone)]
pub struct AuthStore {
    api: Arc<dyn AuthApi>,
    session: Session,
}

impl AuthStore {
    pub fn new(session: Session, api: Arc<dyn AuthApi>) -> Self {
        Self { api, session }
    }

    #[cfg(test)]
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        let auth = self.api.login(credentials).await?;
        self.session.establish(&auth);
        log::info!("logged in as {}", auth.user.email);
        Ok(auth.user)
    }

    pub async fn signup(&self, data: &SignupData) -> Result<User, ApiError> {
        let auth = self.api.signup(data).await?;
        self.session.establish(&auth);
        log::info!("signed up as {}", auth.user.email);
        Ok(auth.user)
    }

    /// Verify the stored token with the backend.
    ///
    /// No token means no user, without a request. Any failure wipes the
    /// stored session.
    pub async fn current_user(&self) -> Option<User> {
        self.session.token()?;
        match self.api.me().await {
            Ok(user) => {
                self.session.update_user(user.clone());
                Some(user)
            }
            Err(e) => {
                log::warn!("stored session rejected: {}", e);
                self.session.clear();
                None
            }
        }
    }

    pub fn logout(&self) {
        log::info!("logged out");
        self.session.clear();
    }
}
