//! Caller-side admission logic.
//!
//! `AdmissionGate` is invoked once per inbound room-scoped request, in
//! whatever concurrency model the host request layer uses. Invocations are
//! independent and may run concurrently against the same room; correctness
//! comes from the store's atomic admission, not from anything here.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use roomgate_core::config::admission::AdmissionConfig;
use roomgate_core::connected;
use roomgate_core::result::AppResult;
use roomgate_core::traits::store::{AdmitDecision, RoomStore};
use roomgate_store::keys;

use super::token::TokenGenerator;

/// Outcome of one admission attempt, as seen by the request layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdmissionOutcome {
    /// The caller already holds a token for this room; the store was not
    /// consulted. Staleness is the re-validation reader's concern.
    AlreadyAdmitted(String),
    /// A fresh token was admitted and durably recorded.
    Admitted(String),
    /// The room does not exist.
    RoomNotFound,
    /// The room is at capacity.
    RoomFull,
}

/// Read-only occupancy report for a room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomOccupancy {
    /// Number of distinct admitted tokens.
    pub distinct_admitted: usize,
    /// Raw length of the admitted sequence, duplicates included.
    pub raw_entries: usize,
    /// Configured capacity bound.
    pub capacity: u32,
}

/// The admission client: decides fast path vs. slow path and maps the
/// store's atomic decision into caller-visible outcomes.
#[derive(Debug, Clone)]
pub struct AdmissionGate {
    /// Room metadata store.
    store: Arc<dyn RoomStore>,
    /// Session token generator.
    tokens: TokenGenerator,
    /// Maximum distinct tokens concurrently admitted per room.
    capacity: u32,
}

impl AdmissionGate {
    /// Creates a new admission gate.
    pub fn new(store: Arc<dyn RoomStore>, config: &AdmissionConfig) -> Self {
        Self {
            store,
            tokens: TokenGenerator::new(),
            capacity: config.capacity,
        }
    }

    /// Attempts to admit a caller into a room.
    ///
    /// With `existing_token` present this is a pure fast path: no store
    /// access, the token is echoed back. Otherwise a fresh candidate is
    /// generated and the store's atomic admission decides. The candidate is
    /// only handed to the caller once the store has confirmed it was
    /// recorded; the caller must associate it with the session (cookie)
    /// *after* that confirmation, never before.
    ///
    /// A transport failure surfaces as an error, never as an implicit
    /// denial or admission. Retrying is the caller's policy decision; a
    /// retry goes through this method again so it gets a fresh candidate.
    pub async fn try_admit(
        &self,
        room_id: &str,
        existing_token: Option<&str>,
    ) -> AppResult<AdmissionOutcome> {
        if let Some(token) = existing_token {
            debug!(room_id = %room_id, "Existing token presented, skipping store");
            return Ok(AdmissionOutcome::AlreadyAdmitted(token.to_string()));
        }

        let candidate = self.tokens.generate();
        let room_key = keys::room_meta(room_id);

        let decision = self
            .store
            .admit(&room_key, &candidate, self.capacity)
            .await?;

        let outcome = match decision {
            AdmitDecision::Admitted => {
                info!(room_id = %room_id, "Admission granted");
                AdmissionOutcome::Admitted(candidate)
            }
            AdmitDecision::Full => AdmissionOutcome::RoomFull,
            AdmitDecision::NotFound => AdmissionOutcome::RoomNotFound,
        };

        Ok(outcome)
    }

    /// Returns the occupancy of a room, or `None` if the room does not
    /// exist. Read-only; never touches the admitted sequence.
    pub async fn occupancy(&self, room_id: &str) -> AppResult<Option<RoomOccupancy>> {
        let room_key = keys::room_meta(room_id);

        if !self.store.room_exists(&room_key).await? {
            return Ok(None);
        }

        let value = self.store.connected_field(&room_key).await?;
        let tokens = connected::normalize(value.as_ref());

        Ok(Some(RoomOccupancy {
            distinct_admitted: connected::distinct_count(&tokens),
            raw_entries: tokens.len(),
            capacity: self.capacity,
        }))
    }

    /// The configured capacity bound.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }
}
