use log::{debug, error, info, warn};
use std::sync::{Arc, RwLock};

use super::auth_constants::ACCOUNT_DELETE_CONFIRMATION;
use super::auth_model::{
    AuthOutcome, AuthPayload, AuthState, LoginCredentials, PasswordChange, ProfileUpdate,
    RegisterRequest, StoredCredentials, User,
};
use super::auth_traits::{AuthApiTrait, CredentialStoreTrait, SystemApiTrait};
use crate::errors::{Error, Result, ValidationError};
use crate::events::{ClientEvent, ClientEventSink};

const CONNECTION_FAILED: &str = "Connection to the server failed. Please try again later.";

/// Application-wide authentication context.
///
/// Owned by the application root and handed out as `Arc<AuthService>`.
/// Readers get snapshots of the state, never a live reference.
pub struct AuthService {
    api: Arc<dyn AuthApiTrait>,
    system: Arc<dyn SystemApiTrait>,
    credentials: Arc<dyn CredentialStoreTrait>,
    event_sink: Arc<dyn ClientEventSink>,
    state: RwLock<AuthState>,
}

impl AuthService {
    pub fn new(
        api: Arc<dyn AuthApiTrait>,
        system: Arc<dyn SystemApiTrait>,
        credentials: Arc<dyn CredentialStoreTrait>,
        event_sink: Arc<dyn ClientEventSink>,
    ) -> Self {
        Self {
            api,
            system,
            credentials,
            event_sink,
            state: RwLock::new(AuthState::default()),
        }
    }

    pub fn state(&self) -> AuthState {
        self.state.read().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state().user
    }

    /// True iff a user is in state and a token is persisted.
    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some() && self.credentials.token().is_some()
    }

    fn update_state(&self, apply: impl FnOnce(&mut AuthState)) {
        match self.state.write() {
            Ok(mut state) => apply(&mut state),
            Err(e) => error!("Auth state lock poisoned: {}", e),
        }
    }

    fn stored_credentials(&self) -> StoredCredentials {
        self.credentials.load().unwrap_or_else(|e| {
            warn!("Could not read stored credentials: {}", e);
            StoredCredentials::default()
        })
    }

    fn persist(&self, credentials: &StoredCredentials) {
        if let Err(e) = self.credentials.save(credentials) {
            error!("Failed to persist credentials: {}", e);
        }
    }

    fn clear_credentials(&self) {
        if let Err(e) = self.credentials.clear() {
            error!("Failed to clear credentials: {}", e);
        }
    }

    fn set_user(&self, user: Option<User>) {
        let authenticated = user.is_some();
        let changed = self.current_user().is_some() != authenticated;
        self.update_state(|s| s.user = user);
        if changed {
            self.event_sink
                .emit(ClientEvent::AuthStateChanged { authenticated });
        }
    }

    /// Restores the signed-in user at startup.
    ///
    /// A reachable backend confirms the stored token through `/auth/me`. When
    /// the backend is down, or the profile read fails for a reason other than
    /// auth, the cached user is kept.
    pub async fn initialize(&self) -> AuthState {
        self.update_state(|s| s.loading = true);

        let connected = self.check_health().await;
        self.update_state(|s| s.backend_connected = connected);

        let stored = self.stored_credentials();
        let user = match (stored.has_token(), stored.user.clone()) {
            (true, Some(cached)) if !connected => {
                warn!("Backend not reachable, using cached user {}", cached.email);
                Some(cached)
            }
            (true, Some(cached)) => match self.api.me().await {
                Ok(user) => {
                    debug!("Confirmed stored session for {}", user.email);
                    self.persist(&StoredCredentials {
                        token: stored.token.clone(),
                        user: Some(user.clone()),
                    });
                    Some(user)
                }
                Err(e) if e.is_unauthorized() => {
                    info!("Stored token was rejected, signing out");
                    self.clear_credentials();
                    None
                }
                Err(e) => {
                    warn!("Profile check failed ({}), using cached user", e);
                    Some(cached)
                }
            },
            _ => None,
        };

        self.set_user(user);
        self.update_state(|s| s.loading = false);
        self.state()
    }

    async fn check_health(&self) -> bool {
        match self.system.health().await {
            Ok(healthy) => healthy,
            Err(e) => {
                warn!("Backend health check failed: {}", e);
                false
            }
        }
    }

    /// Re-runs the health check. The reconnect affordance.
    pub async fn test_backend_connection(&self) -> bool {
        let connected = self.check_health().await;
        self.update_state(|s| s.backend_connected = connected);
        connected
    }

    fn accept(&self, payload: AuthPayload) -> AuthOutcome {
        self.persist(&StoredCredentials::from_payload(&payload));
        self.set_user(Some(payload.user.clone()));
        AuthOutcome::Success { user: payload.user }
    }

    /// Signs in. Never returns an error: every failure becomes
    /// `AuthOutcome::Failed` with a message for the user.
    pub async fn login(&self, credentials: LoginCredentials) -> AuthOutcome {
        if let Err(e) = credentials.validate() {
            return AuthOutcome::Failed {
                error: failure_message(&e),
            };
        }
        self.update_state(|s| s.loading = true);
        let outcome = match self.api.login(&credentials).await {
            Ok(payload) => {
                info!("Signed in as {}", payload.user.email);
                self.accept(payload)
            }
            Err(e) => {
                warn!("Login failed: {}", e);
                AuthOutcome::Failed {
                    error: failure_message(&e),
                }
            }
        };
        self.update_state(|s| s.loading = false);
        outcome
    }

    /// Registers and signs in. Never returns an error.
    pub async fn register(&self, request: RegisterRequest) -> AuthOutcome {
        if let Err(e) = request.validate() {
            return AuthOutcome::Failed {
                error: failure_message(&e),
            };
        }
        self.update_state(|s| s.loading = true);
        let outcome = match self.api.register(&request).await {
            Ok(payload) => {
                info!("Registered {}", payload.user.email);
                self.accept(payload)
            }
            Err(e) => {
                warn!("Registration failed: {}", e);
                AuthOutcome::Failed {
                    error: failure_message(&e),
                }
            }
        };
        self.update_state(|s| s.loading = false);
        outcome
    }

    /// Signs out. The server call is best-effort; local state is always cleared.
    pub async fn logout(&self) {
        if let Err(e) = self.api.logout().await {
            debug!("Server logout failed, clearing locally anyway: {}", e);
        }
        self.clear_credentials();
        self.set_user(None);
    }

    /// Re-reads the profile from the server into state.
    pub async fn refresh_profile(&self) -> Result<User> {
        let user = self.api.me().await?;
        self.store_user(&user);
        Ok(user)
    }

    pub async fn update_profile(&self, update: ProfileUpdate) -> AuthOutcome {
        if let Err(e) = update.validate() {
            return AuthOutcome::Failed {
                error: failure_message(&e),
            };
        }
        match self.api.update_profile(&update).await {
            Ok(user) => {
                self.store_user(&user);
                AuthOutcome::Success { user }
            }
            Err(e) => AuthOutcome::Failed {
                error: failure_message(&e),
            },
        }
    }

    pub async fn change_password(&self, change: PasswordChange) -> Result<()> {
        change.validate()?;
        self.api.change_password(&change).await
    }

    /// Deletes the account once the user has typed the confirmation text.
    /// A server refusal comes back as an error and keeps the user signed in.
    pub async fn delete_account(&self, confirmation: &str) -> Result<()> {
        if confirmation.trim() != ACCOUNT_DELETE_CONFIRMATION {
            return Err(ValidationError::InvalidInput(format!(
                "Please type \"{}\" to confirm account deletion",
                ACCOUNT_DELETE_CONFIRMATION
            ))
            .into());
        }
        self.api.delete_account().await?;
        info!("Account deleted");
        self.clear_credentials();
        self.set_user(None);
        Ok(())
    }

    fn store_user(&self, user: &User) {
        let mut stored = self.stored_credentials();
        stored.user = Some(user.clone());
        self.persist(&stored);
        self.set_user(Some(user.clone()));
    }
}

/// Message shown to the user for a failed auth action.
fn failure_message(error: &Error) -> String {
    match error {
        Error::Validation(e) => e.to_string(),
        Error::Rejected { message, .. } | Error::Unauthorized(message) => message.clone(),
        Error::Unreachable(_) => CONNECTION_FAILED.to_string(),
        other => other.to_string(),
    }
}
