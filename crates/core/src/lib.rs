//! BankrollGod Core - Domain models, services, and API seams.
//!
//! This crate holds the client-side logic of the BankrollGod poker bankroll
//! tracker. It never talks HTTP itself: every backend call goes through the
//! `*ApiTrait` seams, which the `bankrollgod-client` crate implements.

pub mod auth;
pub mod bankrolls;
pub mod constants;
pub mod errors;
pub mod events;
pub mod games;
pub mod overlay;
pub mod sessions;
pub mod stats;
pub mod utils;
pub mod view;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
