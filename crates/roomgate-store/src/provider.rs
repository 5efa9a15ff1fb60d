//! Store manager that dispatches to the configured provider.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::info;

use roomgate_core::config::store::StoreConfig;
use roomgate_core::error::AppError;
use roomgate_core::result::AppResult;
use roomgate_core::traits::store::{AdmitDecision, RoomStore};

/// Store manager that wraps the configured room store provider.
///
/// The provider is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct StoreManager {
    /// The inner room store.
    inner: Arc<dyn RoomStore>,
}

impl StoreManager {
    /// Create a new store manager from configuration.
    pub async fn new(config: &StoreConfig) -> AppResult<Self> {
        let inner: Arc<dyn RoomStore> = match config.provider.as_str() {
            #[cfg(feature = "redis-backend")]
            "redis" => {
                info!("Initializing Redis room store");
                let client = crate::redis::RedisClient::connect(&config.redis).await?;
                Arc::new(crate::redis::RedisRoomStore::new(client))
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory room store");
                Arc::new(crate::memory::MemoryRoomStore::new())
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown store provider: '{other}'. Supported: memory, redis"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a store manager from an existing provider (for testing).
    pub fn from_provider(provider: Arc<dyn RoomStore>) -> Self {
        Self { inner: provider }
    }

    /// Get a reference to the inner provider.
    pub fn provider(&self) -> &dyn RoomStore {
        self.inner.as_ref()
    }
}

#[async_trait]
impl RoomStore for StoreManager {
    async fn admit(
        &self,
        room_key: &str,
        candidate_token: &str,
        capacity: u32,
    ) -> AppResult<AdmitDecision> {
        self.inner.admit(room_key, candidate_token, capacity).await
    }

    async fn connected_field(&self, room_key: &str) -> AppResult<Option<Value>> {
        self.inner.connected_field(room_key).await
    }

    async fn room_exists(&self, room_key: &str) -> AppResult<bool> {
        self.inner.room_exists(room_key).await
    }

    async fn create_room(
        &self,
        room_key: &str,
        created_at: DateTime<Utc>,
        ttl: Option<Duration>,
    ) -> AppResult<()> {
        self.inner.create_room(room_key, created_at, ttl).await
    }

    async fn delete_room(&self, room_key: &str) -> AppResult<()> {
        self.inner.delete_room(room_key).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
