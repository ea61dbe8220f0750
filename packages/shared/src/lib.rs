//! Utilities shared by the focus room packages.

pub mod logger;
pub mod time;
