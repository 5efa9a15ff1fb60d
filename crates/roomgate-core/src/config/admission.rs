//! Admission protocol configuration.

use serde::{Deserialize, Serialize};

/// Admission protocol configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionConfig {
    /// Maximum number of distinct session tokens concurrently admitted to
    /// one room.
    #[serde(default = "default_capacity")]
    pub capacity: u32,
    /// Time-to-live applied to room metadata records at creation, in
    /// seconds. `0` means no expiry.
    #[serde(default = "default_room_ttl")]
    pub room_ttl_seconds: u64,
    /// Landing location callers are redirected to when a room is missing
    /// or full.
    #[serde(default = "default_landing_path")]
    pub landing_path: String,
    /// Session cookie settings.
    #[serde(default)]
    pub cookie: CookieConfig,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            room_ttl_seconds: default_room_ttl(),
            landing_path: default_landing_path(),
            cookie: CookieConfig::default(),
        }
    }
}

/// Session cookie configuration.
///
/// The cookie is always flagged `HttpOnly` and scoped to the room's path;
/// only the `Secure` flag is configurable so local development over plain
/// HTTP stays possible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookieConfig {
    /// Cookie name carrying the session token.
    #[serde(default = "default_cookie_name")]
    pub name: String,
    /// Whether the cookie is restricted to secure transport.
    #[serde(default = "default_true")]
    pub secure: bool,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: default_cookie_name(),
            secure: true,
        }
    }
}

fn default_capacity() -> u32 {
    2
}

fn default_room_ttl() -> u64 {
    86_400
}

fn default_landing_path() -> String {
    "/landing".to_string()
}

fn default_cookie_name() -> String {
    "room_session".to_string()
}

fn default_true() -> bool {
    true
}
