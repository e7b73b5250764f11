/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Text the user must type before the account is deleted.
pub const ACCOUNT_DELETE_CONFIRMATION: &str = "DELETE";
