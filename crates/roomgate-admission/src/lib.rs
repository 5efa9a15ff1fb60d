//! # roomgate-admission
//!
//! The admission protocol for Roomgate: admits clients into
//! capacity-bounded rooms, issuing each admitted client a room-scoped
//! session token. The atomic decision runs inside the store
//! (see `roomgate-store`); this crate holds the caller-side logic — the
//! fast/slow admission paths, token generation, re-validation of presented
//! tokens, room provisioning, and the edge-facing cookie/redirect types.

pub mod admission;

pub use admission::client::{AdmissionGate, AdmissionOutcome, RoomOccupancy};
pub use admission::edge::EdgeAction;
pub use admission::registry::RoomRegistry;
pub use admission::token::TokenGenerator;
pub use admission::validator::TokenValidator;
