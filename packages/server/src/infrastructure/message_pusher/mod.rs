//! Outbound message delivery implementations.
//!
//! - `websocket`: pushes JSON text frames onto per-connection channels

pub mod websocket;

pub use websocket::WebSocketMessagePusher;
