//! Race-free room admission over the shared key-value store.
//!
//! The store's atomic script execution is the sole mutation gate for the
//! admitted-token sequence; everything in this module either calls it or
//! only reads.

pub mod client;
pub mod edge;
pub mod registry;
pub mod token;
pub mod validator;

pub use client::{AdmissionGate, AdmissionOutcome, RoomOccupancy};
pub use edge::EdgeAction;
pub use registry::RoomRegistry;
pub use token::TokenGenerator;
pub use validator::TokenValidator;
