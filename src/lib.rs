//! GOMARKET - Terminal Storefront Library
//!
//! A terminal-based marketplace storefront with a persistent shopping cart,
//! built in Rust.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
