//! # Web Handlers for the Campsite Checker
//!
//! This crate provides the HTTP check endpoint and the route registration used
//! by the web server.

/// Handlers for the availability check endpoint
mod check_handlers;
pub use check_handlers::*;
