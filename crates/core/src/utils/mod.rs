//! Small helpers shared across domain modules.

pub mod serde_lenient;
pub mod time_utils;
