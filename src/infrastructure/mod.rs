//! Infrastructure layer providing external service integrations.
//!
//! This module contains implementations for external concerns like
//! device storage, the marketplace API, and other system-level operations.

pub mod persistence;
pub mod catalog;

pub use persistence::*;
pub use catalog::*;
