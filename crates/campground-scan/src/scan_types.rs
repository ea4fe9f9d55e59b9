use rec_gov::RecGovError;
use serde::{Deserialize, Serialize};

use crate::NotificationError;

/// Body returned to callers that fail the shared-key check.
pub const UNAUTHORIZED_BODY: &str = "No data.";

/// Number of fully free sites in a campground over a date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampgroundAvailability {
    /// Sites free on every targeted date
    pub available: u32,
    /// Site count reported upstream
    pub total: u32,
}

impl CampgroundAvailability {
    /// Whether at least one site is free.
    pub fn has_availability(&self) -> bool {
        self.available > 0
    }
}

/// Sales eligibility of the two booking windows of a timed-entry pass.
///
/// This is a coarse proxy, not a count of physical units, so it is kept apart
/// from [`CampgroundAvailability`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassAvailability {
    /// `threshold_exists` flag of the PRIMARY window
    pub primary: bool,
    /// `threshold_exists` flag of the SECONDARY window
    pub secondary: bool,
}

impl PassAvailability {
    /// Number of windows with the threshold flag set, always 0, 1 or 2.
    pub fn available(&self) -> u8 {
        u8::from(self.primary) + u8::from(self.secondary)
    }

    /// Whether any window is open.
    pub fn has_availability(&self) -> bool {
        self.available() > 0
    }
}

/// Custom error type for scan operations
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Upstream answered with a non-200 status
    #[error("ERROR, {status} code received from {url}: {body}")]
    UpstreamRequestFailed {
        /// HTTP status code
        status: u16,
        /// Requested URL
        url: String,
        /// Response body
        body: String,
    },

    /// Network error before any response was received
    #[error("Network error: {0}")]
    Network(String),

    /// Payload is missing a key or has an unexpected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Input date does not match YYYY-MM-DD
    #[error("Not a valid date: '{0}'.")]
    InvalidDate(String),

    /// Park ID is not a positive integer
    #[error("Not a valid park ID: '{0}'.")]
    InvalidParkId(String),

    /// End date is not after the start date
    #[error("Invalid date range: end date {end} must be after start date {start}")]
    InvalidDateRange {
        /// Requested start date
        start: String,
        /// Requested end date
        end: String,
    },

    /// Caller did not present the configured key
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// A notification channel failed
    #[error("Notification error: {0}")]
    Notification(#[from] NotificationError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<RecGovError> for ScanError {
    fn from(err: RecGovError) -> Self {
        match err {
            RecGovError::UpstreamRequestFailed { status, url, body } => {
                ScanError::UpstreamRequestFailed { status, url, body }
            }
            RecGovError::Transport(msg) => ScanError::Network(msg),
            RecGovError::MalformedResponse(msg) => ScanError::MalformedResponse(msg),
            RecGovError::ClientBuild(msg) => ScanError::ConfigError(msg),
        }
    }
}

impl actix_web::ResponseError for ScanError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;

        match self {
            ScanError::InvalidDate(_)
            | ScanError::InvalidDateRange { .. }
            | ScanError::InvalidParkId(_) => StatusCode::BAD_REQUEST,
            ScanError::AuthenticationFailed => StatusCode::FORBIDDEN,
            ScanError::UpstreamRequestFailed { .. }
            | ScanError::Network(_)
            | ScanError::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
            ScanError::Notification(_) | ScanError::ConfigError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        let body = match self {
            ScanError::AuthenticationFailed => UNAUTHORIZED_BODY.to_string(),
            other => other.to_string(),
        };

        actix_web::HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;
    use actix_web::http::StatusCode;

    #[test]
    fn test_pass_availability_count() {
        let none = PassAvailability { primary: false, secondary: false };
        let one = PassAvailability { primary: false, secondary: true };
        let both = PassAvailability { primary: true, secondary: true };

        assert_eq!(none.available(), 0);
        assert_eq!(one.available(), 1);
        assert_eq!(both.available(), 2);
        assert!(!none.has_availability());
        assert!(one.has_availability());
    }

    #[test]
    fn test_rec_gov_errors_convert() {
        let err: ScanError = RecGovError::UpstreamRequestFailed {
            status: 500,
            url: "https://www.recreation.gov/api".to_string(),
            body: "boom".to_string(),
        }
        .into();
        assert!(matches!(err, ScanError::UpstreamRequestFailed { status: 500, .. }));

        let err: ScanError = RecGovError::MalformedResponse("bad".to_string()).into();
        assert!(matches!(err, ScanError::MalformedResponse(_)));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ScanError::AuthenticationFailed.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ScanError::InvalidDate("06/01/2024".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ScanError::InvalidParkId("pines".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ScanError::MalformedResponse("missing `campsites`".to_string()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_invalid_date_message() {
        let err = ScanError::InvalidDate("2024-13-01".to_string());
        assert_eq!(err.to_string(), "Not a valid date: '2024-13-01'.");
    }
}
