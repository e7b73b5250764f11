/// Backend used when no API URL is configured.
pub const DEFAULT_API_URL: &str = "https://bankrollgod-backend.onrender.com/api";

/// Per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// How often the active-session projection is refreshed.
pub const DEFAULT_SESSION_POLL_SECS: u64 = 30;

/// How often overlays re-read their snapshot.
pub const DEFAULT_OVERLAY_POLL_SECS: u64 = 5;

/// Decimal places money is shown with.
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;
