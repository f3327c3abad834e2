//! Room-based WebSocket chat relay.
//!
//! Clients open or join rooms over a WebSocket connection and broadcast short
//! text messages to everyone currently in the room. Each room keeps a bounded
//! history that is handed to new members when they join.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
