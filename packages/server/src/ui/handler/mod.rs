//! Request handlers.

mod http;
mod websocket;

pub use http::{claim_reward, health_check};
pub use websocket::websocket_handler;
