//! Keepalive - periodically increments a Redis counter as a liveness signal
//!
//! # Architecture
//! - `config`: `.env`, `config.toml` and environment loading
//! - `store`: counter backends (Redis, in-memory)
//! - `keepalive`: the tick-and-increment loop
//! - `runtime`: startup, signal wait and graceful shutdown
//! - `system`: logging and signal plumbing

pub mod config;
pub mod errors;
pub mod keepalive;
pub mod runtime;
pub mod store;
pub mod system;
