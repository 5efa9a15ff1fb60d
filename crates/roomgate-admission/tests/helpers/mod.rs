//! Shared helpers for admission integration tests.

use std::sync::Arc;

use chrono::Utc;

use roomgate_admission::AdmissionGate;
use roomgate_core::config::admission::AdmissionConfig;
use roomgate_core::traits::store::RoomStore;
use roomgate_store::keys;
use roomgate_store::memory::MemoryRoomStore;

/// Admission config with the given capacity and defaults elsewhere.
pub fn admission_config(capacity: u32) -> AdmissionConfig {
    AdmissionConfig {
        capacity,
        ..AdmissionConfig::default()
    }
}

/// Provision a fresh room directly on the store.
pub async fn fresh_room(store: &MemoryRoomStore, room_id: &str) {
    store
        .create_room(&keys::room_meta(room_id), Utc::now(), None)
        .await
        .unwrap();
}

/// Build an admission gate over the store with the given capacity.
pub fn gate(store: Arc<MemoryRoomStore>, capacity: u32) -> AdmissionGate {
    AdmissionGate::new(store, &admission_config(capacity))
}
