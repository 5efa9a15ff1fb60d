//! Redis-based room store using a Lua script for atomic admission.
//!
//! Suitable for multi-node deployments: every request-handling instance
//! shares the same admitted sequence, and the script engine linearizes
//! admissions per room key.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use serde_json::Value;
use tracing::{debug, info, warn};

use roomgate_core::connected::{CONNECTED_FIELD, CREATED_AT_FIELD};
use roomgate_core::error::{AppError, ErrorKind};
use roomgate_core::result::AppResult;
use roomgate_core::traits::store::{AdmitDecision, RoomStore};

use super::client::RedisClient;

/// Lua script for atomic room admission.
///
/// KEYS[1] = room metadata key (`meta:<roomId>`)
/// ARGV[1] = candidate session token
/// ARGV[2] = capacity bound
///
/// Returns:
///   1 = admitted (candidate appended to the sequence)
///   0 = full (distinct count at capacity, nothing written)
///  -1 = room not found (nothing written)
///
/// The `connected` field is JSON text; a value that fails to decode to an
/// array reads as an empty sequence. Duplicate entries count once toward
/// capacity but are written back verbatim. Only the array part of the
/// decoded value is kept so the write-back always re-encodes as a JSON
/// array.
const ADMIT_SCRIPT: &str = r#"
    local room_key = KEYS[1]
    local candidate = ARGV[1]
    local capacity = tonumber(ARGV[2])

    if redis.call('EXISTS', room_key) == 0 then
        return -1
    end

    local entries = {}
    local raw = redis.call('HGET', room_key, 'connected')
    if raw then
        local ok, decoded = pcall(cjson.decode, raw)
        if ok and type(decoded) == 'table' then
            for i, entry in ipairs(decoded) do
                entries[i] = entry
            end
        end
    end

    local seen = {}
    local distinct = 0
    for _, entry in ipairs(entries) do
        if type(entry) == 'string' and not seen[entry] then
            seen[entry] = true
            distinct = distinct + 1
        end
    end

    if distinct >= capacity then
        return 0
    end

    table.insert(entries, candidate)
    redis.call('HSET', room_key, 'connected', cjson.encode(entries))
    return 1
"#;

/// Redis-backed room store for multi-node deployments.
#[derive(Debug, Clone)]
pub struct RedisRoomStore {
    /// Redis client.
    client: RedisClient,
}

impl RedisRoomStore {
    /// Create a new Redis-based room store.
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    /// Map a Redis error to an AppError.
    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::Store, format!("Redis error: {e}"), e)
    }
}

#[async_trait]
impl RoomStore for RedisRoomStore {
    async fn admit(
        &self,
        room_key: &str,
        candidate_token: &str,
        capacity: u32,
    ) -> AppResult<AdmitDecision> {
        let full_key = self.client.prefixed_key(room_key);
        let mut conn = self.client.conn_mut();

        let code: i64 = redis::Script::new(ADMIT_SCRIPT)
            .key(&full_key)
            .arg(candidate_token)
            .arg(capacity.to_string())
            .invoke_async(&mut conn)
            .await
            .map_err(Self::map_err)?;

        match code {
            1 => {
                info!(room_key = %room_key, "Token admitted via Redis");
                Ok(AdmitDecision::Admitted)
            }
            0 => {
                warn!(room_key = %room_key, capacity, "Admission denied: room full");
                Ok(AdmitDecision::Full)
            }
            -1 => {
                debug!(room_key = %room_key, "Admission attempted against missing room");
                Ok(AdmitDecision::NotFound)
            }
            other => Err(AppError::internal(format!(
                "Unexpected admission script result: {other}"
            ))),
        }
    }

    async fn connected_field(&self, room_key: &str) -> AppResult<Option<Value>> {
        let full_key = self.client.prefixed_key(room_key);
        let mut conn = self.client.conn_mut();

        let raw: Option<String> = conn
            .hget(&full_key, CONNECTED_FIELD)
            .await
            .map_err(Self::map_err)?;

        // Redis hands back unparsed text; normalization treats it as the
        // raw-string shape.
        Ok(raw.map(Value::String))
    }

    async fn room_exists(&self, room_key: &str) -> AppResult<bool> {
        let full_key = self.client.prefixed_key(room_key);
        let mut conn = self.client.conn_mut();
        let exists: bool = conn.exists(&full_key).await.map_err(Self::map_err)?;
        Ok(exists)
    }

    async fn create_room(
        &self,
        room_key: &str,
        created_at: DateTime<Utc>,
        ttl: Option<Duration>,
    ) -> AppResult<()> {
        let full_key = self.client.prefixed_key(room_key);
        let mut conn = self.client.conn_mut();

        let _: () = conn
            .hset(&full_key, CREATED_AT_FIELD, created_at.to_rfc3339())
            .await
            .map_err(Self::map_err)?;

        if let Some(ttl) = ttl {
            let _: bool = conn
                .expire(&full_key, ttl.as_secs() as i64)
                .await
                .map_err(Self::map_err)?;
        }

        info!(room_key = %room_key, "Room metadata record created");
        Ok(())
    }

    async fn delete_room(&self, room_key: &str) -> AppResult<()> {
        let full_key = self.client.prefixed_key(room_key);
        let mut conn = self.client.conn_mut();
        let _: () = conn.del(&full_key).await.map_err(Self::map_err)?;
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.conn_mut();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(pong == "PONG")
    }
}
