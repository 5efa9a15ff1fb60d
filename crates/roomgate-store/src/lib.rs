//! # roomgate-store
//!
//! Room metadata store backends for Roomgate. Supports two modes:
//!
//! - **memory**: In-process store behind a mutex, for single-node use and tests
//! - **redis**: Redis-backed store using the [redis](https://crates.io/crates/redis) crate,
//!   with the admission decision executed server-side as a Lua script
//!
//! The provider is selected at runtime based on configuration.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::StoreManager;
