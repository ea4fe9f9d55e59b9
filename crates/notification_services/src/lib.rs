//! # Notification Services
//!
//! This crate provides the channels availability reports are announced through:
//! email over AWS SES, text messages over AWS SNS, text-to-speech and plain logging.

/// Channel implementations and the notifier factory.
pub mod service;
/// Text-to-speech channel.
pub mod speech;
/// Channel selection and configuration.
pub mod types;

pub use service::{
    LogNotifier, MultiNotifier, SesEmailNotifier, SnsSmsNotifier, build_notifier,
    format_phone_number,
};
pub use speech::SpeechNotifier;
pub use types::{NotificationChannel, NotificationConfig};
