use std::path::PathBuf;
use std::time::Duration;

use bankrollgod_client::ClientConfig;
use bankrollgod_core::constants::{
    DEFAULT_API_URL, DEFAULT_OVERLAY_POLL_SECS, DEFAULT_SESSION_POLL_SECS, DEFAULT_TIMEOUT_SECS,
};

pub const DEFAULT_DATA_DIR: &str = ".bankrollgod";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub data_dir: PathBuf,
    pub timeout: Duration,
    pub session_poll: Duration,
    pub overlay_poll: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            session_poll: Duration::from_secs(DEFAULT_SESSION_POLL_SECS),
            overlay_poll: Duration::from_secs(DEFAULT_OVERLAY_POLL_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = value("BRG_API_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let data_dir = value("BRG_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        Self {
            api_url,
            data_dir,
            timeout: seconds("BRG_TIMEOUT_SECS", value("BRG_TIMEOUT_SECS"), DEFAULT_TIMEOUT_SECS),
            session_poll: seconds(
                "BRG_SESSION_POLL_SECS",
                value("BRG_SESSION_POLL_SECS"),
                DEFAULT_SESSION_POLL_SECS,
            ),
            overlay_poll: seconds(
                "BRG_OVERLAY_POLL_SECS",
                value("BRG_OVERLAY_POLL_SECS"),
                DEFAULT_OVERLAY_POLL_SECS,
            ),
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.api_url.clone(), self.timeout)
    }
}

/// Parses a positive number of seconds, falling back to `default` with a warning.
fn seconds(key: &str, raw: Option<String>, default: u64) -> Duration {
    let Some(raw) = raw else {
        return Duration::from_secs(default);
    };
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Duration::from_secs(secs),
        _ => {
            tracing::warn!(
                "Ignoring {}={:?}, expected a positive number of seconds; using {}",
                key,
                raw,
                default
            );
            Duration::from_secs(default)
        }
    }
}
