//! # roomgate-core
//!
//! Core crate for Roomgate. Contains the `RoomStore` trait, configuration
//! schemas, the stored-value normalization rules, and the unified error
//! system.
//!
//! This crate has **no** internal dependencies on other Roomgate crates.

pub mod config;
pub mod connected;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
