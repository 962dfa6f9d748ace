//! Seeded sampling contract: draws non-repeating integers from a
//! per-request seed and a per-height external digest, records each
//! draw under its seed, and serves it back.

pub mod access_guard;
pub mod command;
pub mod config;
pub mod context;
pub mod contract;
pub mod error;
pub mod event;
pub mod host;
pub mod rng;
pub mod sampler;
pub mod store;
pub mod types;
