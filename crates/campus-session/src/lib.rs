//! # campus-session
//!
//! Single source of truth for "is anyone logged in, and who".
//! [`SessionController`] is the only writer of the token store; views
//! subscribe to its state and events instead of reading storage directly.

pub mod controller;
pub mod decoder;
pub mod guard;

pub use controller::SessionController;
pub use decoder::decode;
pub use guard::{resolve_route, RouteDecision};
