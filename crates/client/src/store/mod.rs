//! File-backed stores for credentials and the session recovery cache.

mod credential_store;
mod json_file;
mod session_state_store;

pub use credential_store::{FileCredentialStore, CREDENTIALS_FILE};
pub use json_file::JsonFile;
pub use session_state_store::{FileSessionStateStore, SESSION_STATE_FILE};
