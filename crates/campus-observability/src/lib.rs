//! # campus-observability
//!
//! Tracing subscriber setup. Library crates only emit `tracing` events;
//! the embedding binary calls one of the `init_*` functions once.

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, init_tracing_with_config, init_tracing_with_filter, LOG_ENV};
