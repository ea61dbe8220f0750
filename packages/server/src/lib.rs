//! Focus room coordination server.
//!
//! Participants join named rooms over WebSocket, share a countdown timer,
//! see each other's live status and chat. Attendance in a session gates an
//! HTTP reward claim.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
