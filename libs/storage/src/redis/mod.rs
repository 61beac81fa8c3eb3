//! Cache client backed by Redis
//!
//! get / set-with-expiration / delete plus an event-driven liveness flag.

mod client;
mod config;
mod health;
mod value;

pub use client::CacheClient;
pub use config::{CacheConfig, DEFAULT_URL};
pub use value::CacheValue;
