//! Re-validation of presented session tokens.
//!
//! The fast path in [`AdmissionGate`] deliberately trusts a presented
//! token without touching the store; this reader is the authoritative
//! re-check that must run before any protected action. The room's
//! admitted sequence, not the client-held copy, is the source of truth.
//!
//! [`AdmissionGate`]: super::client::AdmissionGate

use std::sync::Arc;

use tracing::debug;

use roomgate_core::connected;
use roomgate_core::error::AppError;
use roomgate_core::result::AppResult;
use roomgate_core::traits::store::RoomStore;
use roomgate_store::keys;

/// Checks presented tokens against a room's admitted sequence.
#[derive(Debug, Clone)]
pub struct TokenValidator {
    /// Room metadata store.
    store: Arc<dyn RoomStore>,
}

impl TokenValidator {
    /// Creates a new token validator.
    pub fn new(store: Arc<dyn RoomStore>) -> Self {
        Self { store }
    }

    /// Returns whether `token` is in the room's admitted sequence.
    ///
    /// A missing room, a missing `connected` field, or an empty token all
    /// read as not admitted; only a store transport failure is an error.
    /// Read-only: no admission is attempted on behalf of the caller.
    pub async fn is_admitted(&self, room_id: &str, token: &str) -> AppResult<bool> {
        if token.is_empty() {
            return Ok(false);
        }

        let room_key = keys::room_meta(room_id);
        let Some(value) = self.store.connected_field(&room_key).await? else {
            debug!(room_id = %room_id, "Re-validation against missing room or field");
            return Ok(false);
        };

        let admitted = connected::normalize(Some(&value));
        Ok(admitted.iter().any(|t| t == token))
    }

    /// Guard form of [`is_admitted`]: rejects with an authorization error
    /// instead of returning `false`.
    ///
    /// [`is_admitted`]: Self::is_admitted
    pub async fn authorize(&self, room_id: &str, token: &str) -> AppResult<()> {
        if self.is_admitted(room_id, token).await? {
            Ok(())
        } else {
            Err(AppError::authorization(
                "Session token is not admitted to this room",
            ))
        }
    }
}
