//! Integration tests for the admission protocol against the in-memory store.

mod helpers;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Value, json};

use roomgate_admission::{AdmissionOutcome, RoomRegistry, TokenValidator};
use roomgate_core::connected;
use roomgate_core::error::ErrorKind;
use roomgate_core::result::AppResult;
use roomgate_core::traits::store::{AdmitDecision, RoomStore};
use roomgate_store::keys;
use roomgate_store::memory::MemoryRoomStore;

/// Store wrapper that counts every call reaching the backend.
#[derive(Debug)]
struct CountingStore {
    inner: MemoryRoomStore,
    calls: AtomicUsize,
}

impl CountingStore {
    fn new(inner: MemoryRoomStore) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl RoomStore for CountingStore {
    async fn admit(
        &self,
        room_key: &str,
        candidate_token: &str,
        capacity: u32,
    ) -> AppResult<AdmitDecision> {
        self.tick();
        self.inner.admit(room_key, candidate_token, capacity).await
    }

    async fn connected_field(&self, room_key: &str) -> AppResult<Option<Value>> {
        self.tick();
        self.inner.connected_field(room_key).await
    }

    async fn room_exists(&self, room_key: &str) -> AppResult<bool> {
        self.tick();
        self.inner.room_exists(room_key).await
    }

    async fn create_room(
        &self,
        room_key: &str,
        created_at: DateTime<Utc>,
        ttl: Option<Duration>,
    ) -> AppResult<()> {
        self.tick();
        self.inner.create_room(room_key, created_at, ttl).await
    }

    async fn delete_room(&self, room_key: &str) -> AppResult<()> {
        self.tick();
        self.inner.delete_room(room_key).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.tick();
        self.inner.health_check().await
    }
}

#[tokio::test]
async fn test_sequential_fill_then_full() {
    let store = Arc::new(MemoryRoomStore::new());
    helpers::fresh_room(&store, "r1").await;
    let gate = helpers::gate(Arc::clone(&store), 2);

    let AdmissionOutcome::Admitted(first) = gate.try_admit("r1", None).await.unwrap() else {
        panic!("first admission should succeed");
    };
    let AdmissionOutcome::Admitted(second) = gate.try_admit("r1", None).await.unwrap() else {
        panic!("second admission should succeed");
    };
    assert_ne!(first, second);

    assert_eq!(
        gate.try_admit("r1", None).await.unwrap(),
        AdmissionOutcome::RoomFull
    );
}

#[tokio::test]
async fn test_missing_room_rejected_without_mutation() {
    let store = Arc::new(MemoryRoomStore::new());
    let gate = helpers::gate(Arc::clone(&store), 2);

    assert_eq!(
        gate.try_admit("ghost", None).await.unwrap(),
        AdmissionOutcome::RoomNotFound
    );
    assert!(!store.room_exists(&keys::room_meta("ghost")).await.unwrap());
}

#[tokio::test]
async fn test_duplicate_entries_consume_one_slot() {
    let store = Arc::new(MemoryRoomStore::new());
    helpers::fresh_room(&store, "dup").await;
    store
        .seed_connected(&keys::room_meta("dup"), json!(["t1", "t1"]))
        .await;
    let gate = helpers::gate(Arc::clone(&store), 2);

    let occupancy = gate.occupancy("dup").await.unwrap().unwrap();
    assert_eq!(occupancy.distinct_admitted, 1);
    assert_eq!(occupancy.raw_entries, 2);

    assert!(matches!(
        gate.try_admit("dup", None).await.unwrap(),
        AdmissionOutcome::Admitted(_)
    ));
    assert_eq!(
        gate.try_admit("dup", None).await.unwrap(),
        AdmissionOutcome::RoomFull
    );
}

#[tokio::test]
async fn test_fast_path_performs_no_store_calls() {
    let counting = Arc::new(CountingStore::new(MemoryRoomStore::new()));
    let gate = roomgate_admission::AdmissionGate::new(
        Arc::clone(&counting) as Arc<dyn RoomStore>,
        &helpers::admission_config(2),
    );

    let outcome = gate.try_admit("r1", Some("held-token")).await.unwrap();
    assert_eq!(
        outcome,
        AdmissionOutcome::AlreadyAdmitted("held-token".to_string())
    );
    assert_eq!(counting.calls(), 0);
}

#[tokio::test]
async fn test_validator_checks_membership() {
    let store = Arc::new(MemoryRoomStore::new());
    helpers::fresh_room(&store, "v1").await;
    let gate = helpers::gate(Arc::clone(&store), 2);
    let validator = TokenValidator::new(Arc::clone(&store) as Arc<dyn RoomStore>);

    let AdmissionOutcome::Admitted(token) = gate.try_admit("v1", None).await.unwrap() else {
        panic!("admission should succeed");
    };

    assert!(validator.is_admitted("v1", &token).await.unwrap());
    assert!(!validator.is_admitted("v1", "forged").await.unwrap());
    assert!(!validator.is_admitted("v1", "").await.unwrap());
    assert!(!validator.is_admitted("ghost", &token).await.unwrap());

    let err = validator.authorize("v1", "forged").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
}

#[tokio::test]
async fn test_structured_and_raw_shapes_normalize_identically() {
    let store = Arc::new(MemoryRoomStore::new());
    helpers::fresh_room(&store, "shapes").await;
    let room_key = keys::room_meta("shapes");

    let structured = json!(["a", "b"]);
    store.seed_connected(&room_key, structured.clone()).await;
    let from_structured =
        connected::normalize(store.connected_field(&room_key).await.unwrap().as_ref());

    let raw = Value::String(serde_json::to_string(&structured).unwrap());
    store.seed_connected(&room_key, raw).await;
    let from_raw = connected::normalize(store.connected_field(&room_key).await.unwrap().as_ref());

    assert_eq!(from_structured, vec!["a", "b"]);
    assert_eq!(from_structured, from_raw);
}

#[tokio::test]
async fn test_registry_lifecycle() {
    let store = Arc::new(MemoryRoomStore::new());
    let registry = RoomRegistry::new(
        Arc::clone(&store) as Arc<dyn RoomStore>,
        &helpers::admission_config(2),
    );

    registry.create("lobby").await.unwrap();
    assert!(registry.exists("lobby").await.unwrap());

    registry.remove("lobby").await.unwrap();
    assert!(!registry.exists("lobby").await.unwrap());
}

#[tokio::test]
async fn test_occupancy_reporting() {
    let store = Arc::new(MemoryRoomStore::new());
    helpers::fresh_room(&store, "occ").await;
    let gate = helpers::gate(Arc::clone(&store), 2);

    assert!(gate.occupancy("ghost").await.unwrap().is_none());

    gate.try_admit("occ", None).await.unwrap();
    gate.try_admit("occ", None).await.unwrap();

    let occupancy = gate.occupancy("occ").await.unwrap().unwrap();
    assert_eq!(occupancy.distinct_admitted, 2);
    assert_eq!(occupancy.raw_entries, 2);
    assert_eq!(occupancy.capacity, 2);
}
