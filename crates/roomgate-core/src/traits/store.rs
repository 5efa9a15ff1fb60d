//! Room store trait for pluggable key-value backends.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::result::AppResult;

/// Outcome of one atomic admission attempt against a room key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdmitDecision {
    /// The room key does not exist. Nothing was written.
    NotFound,
    /// The room is at capacity. Nothing was written.
    Full,
    /// The candidate token was appended to the admitted sequence.
    Admitted,
}

/// Trait for room metadata backends (Redis or in-memory).
///
/// Implementations must be thread-safe and linearize [`admit`] calls per
/// room key: no concurrent invocation may observe or mutate the admitted
/// sequence between one invocation's read and write. The backend's atomic
/// execution facility is the sole mutation gate for the admitted sequence;
/// callers never issue a raw read-modify-write against it.
///
/// [`admit`]: RoomStore::admit
#[async_trait]
pub trait RoomStore: Send + Sync + std::fmt::Debug {
    /// Atomically admit `candidate_token` into the room at `room_key`.
    ///
    /// In one indivisible unit: checks that the room exists, counts the
    /// distinct tokens already admitted, enforces `capacity`, and appends
    /// the candidate on success. Duplicate entries already present count
    /// once toward capacity but are written back verbatim.
    async fn admit(
        &self,
        room_key: &str,
        candidate_token: &str,
        capacity: u32,
    ) -> AppResult<AdmitDecision>;

    /// Read the raw `connected` field of a room.
    ///
    /// Returns `None` when the room or the field is absent. The value is
    /// returned in whatever shape the backend produces (structured array
    /// or raw JSON string); callers normalize via
    /// [`crate::connected::normalize`].
    async fn connected_field(&self, room_key: &str) -> AppResult<Option<Value>>;

    /// Check whether a room key exists.
    async fn room_exists(&self, room_key: &str) -> AppResult<bool>;

    /// Create a room metadata record with a creation timestamp and an
    /// optional TTL. Never touches the admitted sequence.
    async fn create_room(
        &self,
        room_key: &str,
        created_at: DateTime<Utc>,
        ttl: Option<Duration>,
    ) -> AppResult<()>;

    /// Delete a room metadata record.
    async fn delete_room(&self, room_key: &str) -> AppResult<()>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
