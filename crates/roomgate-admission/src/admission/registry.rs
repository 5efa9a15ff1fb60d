//! Room provisioning.
//!
//! Creates and removes room metadata records. Provisioning writes the
//! creation timestamp and applies the configured TTL; it never touches the
//! admitted sequence, which belongs exclusively to the store's atomic
//! admission.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::info;

use roomgate_core::config::admission::AdmissionConfig;
use roomgate_core::result::AppResult;
use roomgate_core::traits::store::RoomStore;
use roomgate_store::keys;

/// Provisions room metadata records ahead of any join attempt.
#[derive(Debug, Clone)]
pub struct RoomRegistry {
    /// Room metadata store.
    store: Arc<dyn RoomStore>,
    /// TTL applied to new rooms. `None` means no expiry.
    room_ttl: Option<Duration>,
}

impl RoomRegistry {
    /// Creates a new room registry.
    pub fn new(store: Arc<dyn RoomStore>, config: &AdmissionConfig) -> Self {
        let room_ttl = match config.room_ttl_seconds {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        Self { store, room_ttl }
    }

    /// Creates the metadata record for a room.
    pub async fn create(&self, room_id: &str) -> AppResult<()> {
        let room_key = keys::room_meta(room_id);
        self.store
            .create_room(&room_key, Utc::now(), self.room_ttl)
            .await?;
        info!(room_id = %room_id, ttl = ?self.room_ttl, "Room provisioned");
        Ok(())
    }

    /// Returns whether a room currently exists.
    pub async fn exists(&self, room_id: &str) -> AppResult<bool> {
        self.store.room_exists(&keys::room_meta(room_id)).await
    }

    /// Removes a room's metadata record.
    pub async fn remove(&self, room_id: &str) -> AppResult<()> {
        self.store.delete_room(&keys::room_meta(room_id)).await?;
        info!(room_id = %room_id, "Room removed");
        Ok(())
    }
}
