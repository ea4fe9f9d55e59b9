use std::sync::Arc;

use chrono::NaiveDate;
use rec_gov::RecGovClient;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::availability::{evaluate_campground, evaluate_pass};
use crate::{
    AvailabilityReport, CampgroundCheck, DateWindow, DateWindowPolicy, NO_AVAILABILITY_MESSAGE,
    NotificationMessage, Notifier, ParkCheck, ParkFailure, PassCheck, ScanError,
};

/// Source of raw availability payloads.
#[async_trait::async_trait]
pub trait AvailabilitySource: Send + Sync {
    /// Raw campground availability payload for `window`.
    async fn campground_availability(
        &self,
        park_id: u64,
        window: &DateWindow,
    ) -> Result<Value, ScanError>;

    /// Display name of a campground.
    async fn campground_name(&self, park_id: u64) -> Result<String, ScanError>;

    /// Raw pass availability payload for `date`.
    async fn pass_availability(
        &self,
        facility_id: u64,
        date: NaiveDate,
    ) -> Result<Value, ScanError>;
}

#[async_trait::async_trait]
impl AvailabilitySource for RecGovClient {
    async fn campground_availability(
        &self,
        park_id: u64,
        window: &DateWindow,
    ) -> Result<Value, ScanError> {
        Ok(self
            .get_campground_availability(park_id, window.start, window.end)
            .await?)
    }

    async fn campground_name(&self, park_id: u64) -> Result<String, ScanError> {
        Ok(self.get_campground_name(park_id).await?)
    }

    async fn pass_availability(
        &self,
        facility_id: u64,
        date: NaiveDate,
    ) -> Result<Value, ScanError> {
        Ok(self.get_pass_availability(facility_id, date).await?)
    }
}

/// What a batch does when one park's check fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the batch and return the error
    #[default]
    Abort,
    /// Record the failure in the report and check the remaining parks
    Continue,
}

/// Configuration for [`ScanExecutor`]
#[derive(Debug, Clone, Default)]
pub struct ScanExecutorConfig {
    /// Behaviour on a failed park check (default: abort)
    pub failure_policy: FailurePolicy,
}

/// Runs availability checks one park after the other
pub struct ScanExecutor {
    source: Arc<dyn AvailabilitySource>,
    notifier: Option<Arc<dyn Notifier>>,
    config: ScanExecutorConfig,
}

impl ScanExecutor {
    /// Create an executor over `source`, optionally announcing results through `notifier`.
    pub fn new(
        source: Arc<dyn AvailabilitySource>,
        notifier: Option<Arc<dyn Notifier>>,
        config: Option<ScanExecutorConfig>,
    ) -> Self {
        Self {
            source,
            notifier,
            config: config.unwrap_or_default(),
        }
    }

    /// Check one campground over the nights of `window`.
    pub async fn check_campground(
        &self,
        park_id: u64,
        window: &DateWindow,
    ) -> Result<CampgroundCheck, ScanError> {
        debug!(
            "Checking campground {} from {} to {}",
            park_id, window.start, window.end
        );

        let payload = self.source.campground_availability(park_id, window).await?;
        let name = self.source.campground_name(park_id).await?;
        let availability = evaluate_campground(&payload, window, DateWindowPolicy::Nights)?;

        Ok(CampgroundCheck {
            park_id,
            name,
            availability,
        })
    }

    /// Check one timed-entry facility on `date`.
    pub async fn check_pass(
        &self,
        facility_id: u64,
        date: NaiveDate,
    ) -> Result<PassCheck, ScanError> {
        debug!("Checking passes for {} on {}", facility_id, date);

        let payload = self.source.pass_availability(facility_id, date).await?;
        let availability = evaluate_pass(&payload)?;

        Ok(PassCheck {
            facility_id,
            date,
            availability,
        })
    }

    /// Check every campground in `park_ids`, in order.
    pub async fn scan_campgrounds(
        &self,
        park_ids: &[u64],
        window: &DateWindow,
    ) -> Result<AvailabilityReport, ScanError> {
        let mut report = AvailabilityReport::campgrounds(*window);

        for &park_id in park_ids {
            let outcome = self
                .check_campground(park_id, window)
                .await
                .map(ParkCheck::Campground);
            self.record(&mut report, park_id, outcome)?;
        }

        info!(
            "Checked {} campground(s), {} with availability",
            report.checks.len(),
            report.available_checks().count()
        );
        Ok(report)
    }

    /// Check every pass facility in `facility_ids` on `date`, in order.
    pub async fn scan_passes(
        &self,
        facility_ids: &[u64],
        date: NaiveDate,
    ) -> Result<AvailabilityReport, ScanError> {
        let mut report = AvailabilityReport::passes(date);

        for &facility_id in facility_ids {
            let outcome = self
                .check_pass(facility_id, date)
                .await
                .map(ParkCheck::Pass);
            self.record(&mut report, facility_id, outcome)?;
        }

        info!(
            "Checked {} pass facility(ies), {} with availability",
            report.checks.len(),
            report.available_checks().count()
        );
        Ok(report)
    }

    fn record(
        &self,
        report: &mut AvailabilityReport,
        park_id: u64,
        outcome: Result<ParkCheck, ScanError>,
    ) -> Result<(), ScanError> {
        match outcome {
            Ok(check) => {
                report.checks.push(check);
                Ok(())
            }
            Err(e) => match self.config.failure_policy {
                FailurePolicy::Abort => Err(e),
                FailurePolicy::Continue => {
                    error!("Check failed for {}: {}", park_id, e);
                    report.failures.push(ParkFailure {
                        park_id,
                        error: e.to_string(),
                    });
                    Ok(())
                }
            },
        }
    }

    /// Announce `report` through the configured notifier.
    ///
    /// Returns the delivery ID, or `None` when there is no notifier or nothing
    /// to announce.
    pub async fn notify(
        &self,
        report: &AvailabilityReport,
        target: Option<&str>,
    ) -> Result<Option<String>, ScanError> {
        let Some(message) = NotificationMessage::from_report(report) else {
            info!("{}", NO_AVAILABILITY_MESSAGE);
            return Ok(None);
        };

        let Some(notifier) = &self.notifier else {
            return Ok(None);
        };

        let delivery_id = notifier.notify(&message, target).await?;
        info!("Availability notification sent: {}", delivery_id);
        Ok(Some(delivery_id))
    }
}
