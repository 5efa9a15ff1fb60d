//! In-memory room store using a Tokio mutex for single-node deployments.
//!
//! The mutex serializes admissions the way the Redis script engine does in
//! multi-node mode, so the same capacity invariant holds. Room records keep
//! their `connected` value in whatever shape it was written (structured
//! array or raw JSON string); readers normalize.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use roomgate_core::connected;
use roomgate_core::result::AppResult;
use roomgate_core::traits::store::{AdmitDecision, RoomStore};

/// One room's metadata record.
#[derive(Debug, Clone)]
struct RoomRecord {
    /// Stored `connected` value, in its original shape. Absent until the
    /// first admission.
    connected: Option<Value>,
    /// Creation timestamp. Never mutated by admission.
    created_at: DateTime<Utc>,
    /// Expiry deadline, if the room was created with a TTL.
    expires_at: Option<DateTime<Utc>>,
}

impl RoomRecord {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|deadline| deadline <= now)
    }
}

/// In-memory room store using a Tokio mutex for thread safety.
///
/// Suitable for single-node deployments and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryRoomStore {
    /// Protected room records.
    rooms: Arc<Mutex<HashMap<String, RoomRecord>>>,
}

impl MemoryRoomStore {
    /// Creates a new empty in-memory room store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite a room's stored `connected` value with an arbitrary shape.
    ///
    /// Fixture injection for tests: lets a suite seed the raw-string shape,
    /// legacy duplicates, or garbage exactly as an older writer would have
    /// left them. The room must already exist.
    pub async fn seed_connected(&self, room_key: &str, value: Value) {
        let mut rooms = self.rooms.lock().await;
        if let Some(record) = rooms.get_mut(room_key) {
            record.connected = Some(value);
        }
    }
}

/// Decode a stored `connected` value into its raw entry list for rewrite.
///
/// Mirrors the script-side view: only the array part survives, but entries
/// of any type within it are preserved verbatim so an append never drops
/// pre-existing duplicates or foreign elements.
fn decode_entries(value: Option<&Value>) -> Vec<Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.clone(),
        Some(Value::String(raw)) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        Some(_) => Vec::new(),
    }
}

#[async_trait]
impl RoomStore for MemoryRoomStore {
    async fn admit(
        &self,
        room_key: &str,
        candidate_token: &str,
        capacity: u32,
    ) -> AppResult<AdmitDecision> {
        let now = Utc::now();
        let mut rooms = self.rooms.lock().await;

        let Some(record) = rooms.get_mut(room_key) else {
            debug!(room_key = %room_key, "Admission attempted against missing room");
            return Ok(AdmitDecision::NotFound);
        };
        if record.is_expired(now) {
            rooms.remove(room_key);
            debug!(room_key = %room_key, "Admission attempted against expired room");
            return Ok(AdmitDecision::NotFound);
        }

        let tokens = connected::normalize(record.connected.as_ref());
        if connected::distinct_count(&tokens) >= capacity as usize {
            warn!(room_key = %room_key, capacity, "Admission denied: room full");
            return Ok(AdmitDecision::Full);
        }

        let mut entries = decode_entries(record.connected.as_ref());
        entries.push(Value::String(candidate_token.to_string()));
        record.connected = Some(Value::Array(entries));

        info!(room_key = %room_key, "Token admitted");
        Ok(AdmitDecision::Admitted)
    }

    async fn connected_field(&self, room_key: &str) -> AppResult<Option<Value>> {
        let now = Utc::now();
        let rooms = self.rooms.lock().await;
        Ok(rooms
            .get(room_key)
            .filter(|record| !record.is_expired(now))
            .and_then(|record| record.connected.clone()))
    }

    async fn room_exists(&self, room_key: &str) -> AppResult<bool> {
        let now = Utc::now();
        let rooms = self.rooms.lock().await;
        Ok(rooms
            .get(room_key)
            .is_some_and(|record| !record.is_expired(now)))
    }

    async fn create_room(
        &self,
        room_key: &str,
        created_at: DateTime<Utc>,
        ttl: Option<Duration>,
    ) -> AppResult<()> {
        let expires_at = ttl.and_then(|ttl| {
            chrono::Duration::from_std(ttl)
                .ok()
                .map(|ttl| created_at + ttl)
        });
        let mut rooms = self.rooms.lock().await;

        // Re-creating an existing room refreshes its metadata but, like a
        // field-level write on a hash, leaves the admitted sequence alone.
        rooms
            .entry(room_key.to_string())
            .and_modify(|record| {
                record.created_at = created_at;
                record.expires_at = expires_at;
            })
            .or_insert(RoomRecord {
                connected: None,
                created_at,
                expires_at,
            });

        info!(room_key = %room_key, "Room metadata record created");
        Ok(())
    }

    async fn delete_room(&self, room_key: &str) -> AppResult<()> {
        let mut rooms = self.rooms.lock().await;
        rooms.remove(room_key);
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_admit_into_missing_room() {
        let store = MemoryRoomStore::new();
        let decision = store.admit("meta:none", "t1", 2).await.unwrap();
        assert_eq!(decision, AdmitDecision::NotFound);
        assert!(!store.room_exists("meta:none").await.unwrap());
    }

    #[tokio::test]
    async fn test_admit_and_read_back() {
        let store = MemoryRoomStore::new();
        store.create_room("meta:r1", Utc::now(), None).await.unwrap();

        let decision = store.admit("meta:r1", "t1", 2).await.unwrap();
        assert_eq!(decision, AdmitDecision::Admitted);

        let value = store.connected_field("meta:r1").await.unwrap().unwrap();
        assert_eq!(connected::normalize(Some(&value)), vec!["t1"]);
    }

    #[tokio::test]
    async fn test_capacity_gate() {
        let store = MemoryRoomStore::new();
        store.create_room("meta:r2", Utc::now(), None).await.unwrap();

        assert_eq!(
            store.admit("meta:r2", "t1", 1).await.unwrap(),
            AdmitDecision::Admitted
        );
        assert_eq!(
            store.admit("meta:r2", "t2", 1).await.unwrap(),
            AdmitDecision::Full
        );
    }

    #[tokio::test]
    async fn test_expired_room_reads_as_missing() {
        let store = MemoryRoomStore::new();
        store
            .create_room("meta:gone", Utc::now(), Some(Duration::from_secs(0)))
            .await
            .unwrap();

        assert!(!store.room_exists("meta:gone").await.unwrap());
        assert_eq!(
            store.admit("meta:gone", "t1", 2).await.unwrap(),
            AdmitDecision::NotFound
        );
    }

    #[tokio::test]
    async fn test_recreate_preserves_connected() {
        let store = MemoryRoomStore::new();
        store.create_room("meta:r3", Utc::now(), None).await.unwrap();
        store.admit("meta:r3", "t1", 2).await.unwrap();

        store.create_room("meta:r3", Utc::now(), None).await.unwrap();
        let value = store.connected_field("meta:r3").await.unwrap().unwrap();
        assert_eq!(connected::normalize(Some(&value)), vec!["t1"]);
    }

    #[tokio::test]
    async fn test_append_preserves_foreign_entries() {
        let store = MemoryRoomStore::new();
        store.create_room("meta:r4", Utc::now(), None).await.unwrap();
        store.seed_connected("meta:r4", json!(["t1", 7])).await;

        store.admit("meta:r4", "t2", 2).await.unwrap();
        let value = store.connected_field("meta:r4").await.unwrap().unwrap();
        assert_eq!(value, json!(["t1", 7, "t2"]));
    }
}
