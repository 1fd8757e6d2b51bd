mod connection_registry;
mod router;
mod signaling_service;
mod ws_handler;

pub use connection_registry::*;
pub use signaling_service::*;
pub use ws_handler::*;
