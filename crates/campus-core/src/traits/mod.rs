//! Seams between the client core and its environment.

pub mod key_value;
pub mod transport;

pub use key_value::KeyValueStore;
pub use transport::{Method, OutboundRequest, Transport, TransportResponse};
