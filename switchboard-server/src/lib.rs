//! WebSocket signaling relay for browser-to-browser WebRTC calls.
//!
//! Peers connect on `/ws`, receive a short identity, join rooms by name and
//! exchange `offer`, `answer` and `ice-candidate` envelopes addressed to one
//! another. The relay never inspects SDP or ICE payloads.

pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod room;
pub mod signaling;

pub use config::RelayConfig;
pub use error::{RelayError, RelayResult};
pub use http::{app, run};
pub use logging::init_tracing;
pub use room::*;
pub use signaling::*;
