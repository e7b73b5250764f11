//! Auth module - user models, auth endpoints, credential storage and the
//! application-wide auth context.

mod auth_constants;
mod auth_model;
mod auth_service;
mod auth_traits;


pub use auth_constants::*;
pub use auth_model::{
    AuthOutcome, AuthPayload, AuthState, LoginCredentials, PasswordChange, ProfileUpdate,
    RegisterRequest, StoredCredentials, User,
};
pub use auth_service::AuthService;
pub use auth_traits::{
    AuthApiTrait, CredentialStoreTrait, InMemoryCredentialStore, SystemApiTrait,
};
