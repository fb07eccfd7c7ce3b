//! CodeLens web UI and HTTP API.
//!
//! Serves the chat page, accepts question/screenshot submissions, and exposes
//! the session over a small JSON API.

pub mod attachments;
pub mod chat_api;
pub mod control_ui;
pub mod health_api;
pub mod server;

pub use server::{GatewayState, build_router, start_server};
