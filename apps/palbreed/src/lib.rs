//! # palbreed
//!
//! Application layer for the palbreed breeding calculator: CLI, HTTP API
//! and configuration on top of `palbreed-core`.

pub mod api;
pub mod cli;
pub mod config;
