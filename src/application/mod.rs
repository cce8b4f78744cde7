//! Application layer managing state and business workflows.
//!
//! This module coordinates between the domain layer and presentation layer,
//! managing the cart store, application state, and user interactions.

pub mod cart;
pub mod state;

pub use cart::*;
pub use state::*;
