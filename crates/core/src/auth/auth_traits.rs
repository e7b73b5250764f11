use async_trait::async_trait;
use std::sync::Mutex;

use super::auth_model::{
    AuthPayload, LoginCredentials, PasswordChange, ProfileUpdate, RegisterRequest,
    StoredCredentials, User,
};
use crate::errors::{Error, Result};

/// Trait defining the contract for auth endpoints.
#[async_trait]
pub trait AuthApiTrait: Send + Sync {
    /// `POST /auth/login`
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthPayload>;

    /// `POST /auth/register`
    async fn register(&self, request: &RegisterRequest) -> Result<AuthPayload>;

    /// `POST /auth/logout`
    async fn logout(&self) -> Result<()>;

    /// `GET /auth/me`
    async fn me(&self) -> Result<User>;

    /// `PUT /auth/me`
    async fn update_profile(&self, update: &ProfileUpdate) -> Result<User>;

    /// `PUT /auth/password`
    async fn change_password(&self, change: &PasswordChange) -> Result<()>;

    /// `DELETE /users/delete`
    async fn delete_account(&self) -> Result<()>;
}

/// Backend liveness, outside the `/api` prefix and without auth.
#[async_trait]
pub trait SystemApiTrait: Send + Sync {
    /// `GET /health`. True when the body reports success.
    async fn health(&self) -> Result<bool>;
}

/// Persisted token and user.
///
/// Shared between the transport, which reads the token and clears it on
/// 401/403, and the auth context, which writes it on login.
pub trait CredentialStoreTrait: Send + Sync {
    fn load(&self) -> Result<StoredCredentials>;
    fn save(&self, credentials: &StoredCredentials) -> Result<()>;
    fn clear(&self) -> Result<()>;

    /// The bearer token, if one is stored. Read failures count as none.
    fn token(&self) -> Option<String> {
        self.load()
            .ok()
            .and_then(|c| c.token)
            .filter(|t| !t.is_empty())
    }
}

/// Credentials held in memory for the lifetime of the process.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    credentials: Mutex<StoredCredentials>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(credentials: StoredCredentials) -> Self {
        Self {
            credentials: Mutex::new(credentials),
        }
    }
}

impl CredentialStoreTrait for InMemoryCredentialStore {
    fn load(&self) -> Result<StoredCredentials> {
        self.credentials
            .lock()
            .map(|c| c.clone())
            .map_err(|e| Error::storage(e.to_string()))
    }

    fn save(&self, credentials: &StoredCredentials) -> Result<()> {
        let mut guard = self
            .credentials
            .lock()
            .map_err(|e| Error::storage(e.to_string()))?;
        *guard = credentials.clone();
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.save(&StoredCredentials::default())
    }
}
