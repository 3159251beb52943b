//! Axum HTTP server, routing, and middleware.
//!
//! # Responsibilities
//! - Define the Axum router with all routes and shared middleware.
//! - Inject shared application state (`AppState`) into handlers.
//! - Translate core errors into status codes without leaking which part of a
//!   record was wrong.

pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;
