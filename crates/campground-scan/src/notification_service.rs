use serde::Serialize;

use crate::{AvailabilityReport, ParkCheck, ReportKind};

/// Booking page of a campground, followed by its ID.
pub const CAMPGROUND_BOOKING_URL: &str = "https://www.recreation.gov/camping/campgrounds/";

/// Logged when a report has nothing to announce.
pub const NO_AVAILABILITY_MESSAGE: &str = "No campsites available, not tweeting 😞";

/// Trait for notification channels (email, SMS, speech, log)
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `message`, optionally to `target` instead of the channel's
    /// configured recipient. Returns a delivery ID.
    async fn notify(
        &self,
        message: &NotificationMessage,
        target: Option<&str>,
    ) -> Result<String, NotificationError>;
}

/// Errors raised by notification channels
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    /// Email channel failure
    #[error("Email error: {0}")]
    Email(String),
    /// SMS channel failure
    #[error("SMS error: {0}")]
    Sms(String),
    /// Text-to-speech failure
    #[error("Speech error: {0}")]
    Speech(String),
    /// Invalid channel selection or settings
    #[error("Notification config error: {0}")]
    Config(String),
}

/// Everything a channel needs to announce availability, built from a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationMessage {
    /// Email subject
    pub subject: String,
    /// Short text for SMS and speech
    pub short_text: String,
    /// Long text for email
    pub body: String,
    /// Booking links of the campgrounds with availability
    pub links: Vec<String>,
    /// One sentence per park with availability
    pub lines: Vec<String>,
}

impl NotificationMessage {
    /// Build the message for `report`, or `None` if nothing is available.
    pub fn from_report(report: &AvailabilityReport) -> Option<Self> {
        if !report.has_availability() {
            return None;
        }

        let mut lines = Vec::new();
        let mut links = Vec::new();

        for check in report.available_checks() {
            match check {
                ParkCheck::Campground(check) => {
                    lines.push(format!(
                        "{} site(s) available in {}",
                        check.availability.available, check.name
                    ));
                    links.push(format!("{}{}", CAMPGROUND_BOOKING_URL, check.park_id));
                }
                ParkCheck::Pass(check) => {
                    lines.push(format!(
                        "{} pass(es) available for {}",
                        check.availability.available(),
                        check.facility_id
                    ));
                }
            }
        }

        let subject = match report.kind {
            ReportKind::Campgrounds { .. } => "Campsite available!",
            ReportKind::Passes { .. } => "Pass available!",
        };

        let short_text = format!(" 🏕🏕🏕\n{}", lines.join("\n"));

        let mut body = report.render();
        if !links.is_empty() {
            body.push_str("\n\n");
            body.push_str(&links.join("\n"));
        }

        Some(Self {
            subject: subject.to_string(),
            short_text,
            body,
            links,
            lines,
        })
    }
}
