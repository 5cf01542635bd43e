//! Route handlers.

pub mod config;
pub mod fallback;
pub mod health;
pub mod logs;
