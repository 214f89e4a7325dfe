//! Storage key constants.

/// Keys under which session tokens are persisted.
pub struct StorageKeys;

impl StorageKeys {
    /// Short-lived bearer credential
    pub const ACCESS_TOKEN: &'static str = "accessToken";

    /// Longer-lived credential exchanged for a new access token
    pub const REFRESH_TOKEN: &'static str = "refreshToken";
}
