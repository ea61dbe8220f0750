//! Data Transfer Objects (DTOs) of the focus room server.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket frames (inbound actions, outbound events)
//! - `http`: HTTP API request and response bodies

pub mod conversion;
pub mod http;
pub mod websocket;
