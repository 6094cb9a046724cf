//! Network transports implementing [`Transport`](campus_core::Transport).

pub mod reqwest_transport;

pub use reqwest_transport::ReqwestTransport;
