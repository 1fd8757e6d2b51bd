//! Wire model shared by the switchboard signaling relay.
//!
//! Envelopes are JSON text frames discriminated by their `type` field.

mod model;

pub use model::*;
