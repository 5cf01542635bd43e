//! # boyce-api
//!
//! HTTP process for Boyce built on Axum.
//!
//! Serves the health, config, and log endpoints behind proxy-header
//! resolution and request logging middleware.

pub mod app;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use state::AppState;
