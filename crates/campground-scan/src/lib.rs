//! # Campground Scan
//!
//! This crate decides whether recreation.gov facilities have availability.
//! It evaluates raw availability payloads over a requested date window, turns the
//! outcome into structured reports and hands them to notification channels.

/// Types for scan results and errors
mod scan_types;
pub use scan_types::*;

/// Date windows and the policies that decide which dates they target
mod date_window;
pub use date_window::*;

/// Availability evaluation for campground and pass payloads
mod availability;
pub use availability::*;

/// Per-park checks and batch reports, with their text rendering
mod report;
pub use report::*;

/// Notification seam and message building
mod notification_service;
pub use notification_service::*;

/// Sequential check execution over a list of parks
mod executor;
pub use executor::*;

/// Checker configuration loaded from the environment
mod config;
pub use config::*;
