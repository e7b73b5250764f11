//! BankrollGod Client - REST transport and local file stores.
//!
//! This crate implements the core API traits against the BankrollGod backend
//! and provides the file-backed credential and session-recovery stores used
//! by the command line client.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use bankrollgod_client::{BankrollGodClient, ClientConfig, FileCredentialStore};
//! use bankrollgod_core::events::NoOpClientEventSink;
//!
//! let credentials = Arc::new(FileCredentialStore::in_dir(".bankrollgod"));
//! let client = BankrollGodClient::new(
//!     ClientConfig::default(),
//!     credentials,
//!     Arc::new(NoOpClientEventSink),
//! )?;
//! let bankrolls = BankrollApiTrait::list(&client).await?;
//! ```

mod api;
mod client;
mod envelope;
mod store;

pub use client::{build_path, BankrollGodClient, ClientConfig};
pub use envelope::ApiEnvelope;
pub use store::{
    FileCredentialStore, FileSessionStateStore, JsonFile, CREDENTIALS_FILE, SESSION_STATE_FILE,
};
