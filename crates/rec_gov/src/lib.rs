//! # RecGov
//!
//! This crate provides a client for the recreation.gov availability API, used to fetch
//! campground availability, campground names and timed-entry pass availability.

/// HTTP client for the recreation.gov endpoints.
mod client;
pub use client::*;

/// Errors returned by the recreation.gov client.
mod error;
pub use error::*;

/// Browser User-Agent pool used to randomize request headers.
mod user_agent;
pub use user_agent::*;
