//! Integration test utilities for the messenger gateway
//!
//! This crate provides helpers for running end-to-end tests against
//! the WebSocket gateway and the upload endpoint.

pub mod client;
pub mod fixtures;
pub mod helpers;

pub use client::GatewayClient;
pub use fixtures::*;
pub use helpers::*;
