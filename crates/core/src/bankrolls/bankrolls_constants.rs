/// Currency assumed when the backend omits one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Confirmation token the backend requires in the body of a bankroll delete.
pub const DELETE_CONFIRMATION: &str = "DELETE";

/// Default page size when listing a bankroll's sessions.
pub const DEFAULT_SESSION_PAGE_SIZE: u32 = 20;
