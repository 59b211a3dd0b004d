//! # messenger-gateway
//!
//! WebSocket gateway and routing hub for the LAN messenger.

pub mod connection;
pub mod events;
pub mod handlers;
pub mod hub;
pub mod protocol;
pub mod server;
pub mod upload;

pub use server::{create_app, create_gateway_state, run, GatewayState};
