use std::time::Duration;

use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::{RecGovError, random_user_agent};

/// Public recreation.gov host.
pub const DEFAULT_BASE_URL: &str = "https://www.recreation.gov";

/// Date format accepted on the command line and by the ticket endpoint.
pub const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Midnight-UTC timestamp format used by the camps endpoints, both in query
/// parameters and as keys of the per-site availability mapping.
pub const UPSTREAM_DATE_FORMAT: &str = "%Y-%m-%dT00:00:00Z";

const AVAILABILITY_ENDPOINT: &str = "/api/camps/availability/campground/";
const MAIN_PAGE_ENDPOINT: &str = "/api/camps/campgrounds/";
const PASS_AVAILABILITY_ENDPOINT: &str = "/api/ticket/availability/facility/";

/// Format a date the way the camps endpoints expect it.
pub fn format_upstream_date(date: NaiveDate) -> String {
    date.format(UPSTREAM_DATE_FORMAT).to_string()
}

/// Client for the recreation.gov availability API.
///
/// A User-Agent is picked at random from the browser pool when the client is
/// built and attached to every request it sends.
#[derive(Debug, Clone)]
pub struct RecGovClient {
    client: Client,
    base_url: String,
    user_agent: String,
}

impl RecGovClient {
    /// Create a new client against `base_url` (usually [`DEFAULT_BASE_URL`]).
    pub fn new(base_url: impl Into<String>) -> Result<Self, RecGovError> {
        let user_agent = random_user_agent().to_string();

        let client = Client::builder()
            .user_agent(&user_agent)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| RecGovError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user_agent,
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// User-Agent header attached to every request.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Fetch the raw campground availability payload for a date range.
    pub async fn get_campground_availability(
        &self,
        park_id: u64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Value, RecGovError> {
        let url = format!("{}{}{}", self.base_url, AVAILABILITY_ENDPOINT, park_id);
        let params = [
            ("start_date", format_upstream_date(start_date)),
            ("end_date", format_upstream_date(end_date)),
        ];

        log::debug!("Querying for {} with these params: {:?}", url, params);
        self.send_request(&url, &params).await
    }

    /// Look up the display name of a campground.
    pub async fn get_campground_name(&self, park_id: u64) -> Result<String, RecGovError> {
        let url = format!("{}{}{}", self.base_url, MAIN_PAGE_ENDPOINT, park_id);
        let resp = self.send_request(&url, &[]).await?;

        resp.get("campground")
            .and_then(|campground| campground.get("facility_name"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                RecGovError::MalformedResponse(format!(
                    "campground.facility_name missing for {}",
                    park_id
                ))
            })
    }

    /// Fetch the raw timed-entry pass availability payload for a single date.
    pub async fn get_pass_availability(
        &self,
        facility_id: u64,
        date: NaiveDate,
    ) -> Result<Value, RecGovError> {
        let url = format!(
            "{}{}{}",
            self.base_url, PASS_AVAILABILITY_ENDPOINT, facility_id
        );
        let params = [("date", date.format(INPUT_DATE_FORMAT).to_string())];

        log::debug!("Querying for {} with these params: {:?}", url, params);
        self.send_request(&url, &params).await
    }

    async fn send_request(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<Value, RecGovError> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| RecGovError::Transport(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            log::warn!("❌ {} returned {}: {}", url, status, body);

            return Err(RecGovError::UpstreamRequestFailed {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }

        response.json::<Value>().await.map_err(|e| {
            RecGovError::MalformedResponse(format!("Failed to parse response from {}: {}", url, e))
        })
    }
}
