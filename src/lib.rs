//! FOV Server Library
//!
//! Tracks live agents reporting position and heading over WebSockets and tells
//! each one which other agents sit inside its forward field of view.
//! The main binary is in `src/main.rs`.

pub mod api;
pub mod config;
pub mod error;
pub mod fov;
pub mod geo;
pub mod session;
/// Application state management
///
/// Handles the agent registry and state shared across connections.
pub mod state;
pub mod websocket;
