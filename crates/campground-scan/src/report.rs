use std::fmt;

use chrono::NaiveDate;
use rec_gov::INPUT_DATE_FORMAT;
use serde::Serialize;

use crate::{CampgroundAvailability, DateWindow, PassAvailability};

/// Marker for a park with availability.
pub const SUCCESS_EMOJI: &str = "🏕";
/// Marker for a park without availability.
pub const FAILURE_EMOJI: &str = "❌";

/// Pick the marker for a line.
pub fn status_emoji(available: bool) -> &'static str {
    if available {
        SUCCESS_EMOJI
    } else {
        FAILURE_EMOJI
    }
}

/// Outcome of checking one campground.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampgroundCheck {
    /// Campground ID
    pub park_id: u64,
    /// Facility name as reported upstream
    pub name: String,
    /// Evaluated availability
    pub availability: CampgroundAvailability,
}

impl fmt::Display for CampgroundCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}): {} site(s) available out of {} site(s)",
            status_emoji(self.availability.has_availability()),
            self.name,
            self.park_id,
            self.availability.available,
            self.availability.total
        )
    }
}

/// Outcome of checking one timed-entry facility.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassCheck {
    /// Facility ID
    pub facility_id: u64,
    /// Date checked
    pub date: NaiveDate,
    /// Evaluated availability
    pub availability: PassAvailability,
}

impl fmt::Display for PassCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {} pass(es) available",
            status_emoji(self.availability.has_availability()),
            self.facility_id,
            self.availability.available()
        )
    }
}

/// A successful check of either kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParkCheck {
    /// Campground check
    Campground(CampgroundCheck),
    /// Pass check
    Pass(PassCheck),
}

impl ParkCheck {
    /// ID of the park that was checked.
    pub fn park_id(&self) -> u64 {
        match self {
            ParkCheck::Campground(check) => check.park_id,
            ParkCheck::Pass(check) => check.facility_id,
        }
    }

    /// Whether the park has anything bookable.
    pub fn has_availability(&self) -> bool {
        match self {
            ParkCheck::Campground(check) => check.availability.has_availability(),
            ParkCheck::Pass(check) => check.availability.has_availability(),
        }
    }
}

impl fmt::Display for ParkCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParkCheck::Campground(check) => fmt::Display::fmt(check, f),
            ParkCheck::Pass(check) => fmt::Display::fmt(check, f),
        }
    }
}

/// A park whose check failed while the batch kept going.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParkFailure {
    /// ID of the park
    pub park_id: u64,
    /// Error message
    pub error: String,
}

impl fmt::Display for ParkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: check failed: {}", FAILURE_EMOJI, self.park_id, self.error)
    }
}

/// What a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportKind {
    /// Campgrounds over a stay
    Campgrounds {
        /// Requested stay
        window: DateWindow,
    },
    /// Timed-entry passes on one day
    Passes {
        /// Requested day
        date: NaiveDate,
    },
}

/// Structured result of checking a batch of parks, in request order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailabilityReport {
    /// What was checked
    pub kind: ReportKind,
    /// Successful checks
    pub checks: Vec<ParkCheck>,
    /// Parks whose check failed
    pub failures: Vec<ParkFailure>,
}

impl AvailabilityReport {
    /// Empty campground report for `window`.
    pub fn campgrounds(window: DateWindow) -> Self {
        Self::new(ReportKind::Campgrounds { window })
    }

    /// Empty pass report for `date`.
    pub fn passes(date: NaiveDate) -> Self {
        Self::new(ReportKind::Passes { date })
    }

    fn new(kind: ReportKind) -> Self {
        Self {
            kind,
            checks: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Whether any checked park has availability.
    pub fn has_availability(&self) -> bool {
        self.checks.iter().any(ParkCheck::has_availability)
    }

    /// Checks with availability.
    pub fn available_checks(&self) -> impl Iterator<Item = &ParkCheck> {
        self.checks.iter().filter(|check| check.has_availability())
    }

    /// Headline sentence for the whole batch.
    pub fn summary(&self) -> String {
        match (&self.kind, self.has_availability()) {
            (ReportKind::Campgrounds { window }, true) => format!(
                "There are campsites available from {} to {}!!!",
                window.start.format(INPUT_DATE_FORMAT),
                window.end.format(INPUT_DATE_FORMAT)
            ),
            (ReportKind::Campgrounds { .. }, false) => {
                "There are no campsites available :(".to_string()
            }
            (ReportKind::Passes { date }, true) => format!(
                "There are passes available for {}!!!",
                date.format(INPUT_DATE_FORMAT)
            ),
            (ReportKind::Passes { .. }, false) => "There are no passes available :(".to_string(),
        }
    }

    /// One line per park, failures after checks.
    pub fn lines(&self) -> Vec<String> {
        self.checks
            .iter()
            .map(ToString::to_string)
            .chain(self.failures.iter().map(ToString::to_string))
            .collect()
    }

    /// Summary followed by the per-park lines.
    pub fn render(&self) -> String {
        let mut out = self.summary();
        for line in self.lines() {
            out.push('\n');
            out.push_str(&line);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_input_date;

    fn date(s: &str) -> NaiveDate {
        parse_input_date(s).unwrap()
    }

    fn campground(park_id: u64, name: &str, available: u32, total: u32) -> ParkCheck {
        ParkCheck::Campground(CampgroundCheck {
            park_id,
            name: name.to_string(),
            availability: CampgroundAvailability { available, total },
        })
    }

    #[test]
    fn test_campground_lines() {
        assert_eq!(
            campground(232447, "UPPER PINES", 2, 238).to_string(),
            "🏕 UPPER PINES (232447): 2 site(s) available out of 238 site(s)"
        );
        assert_eq!(
            campground(232450, "LOWER PINES", 0, 60).to_string(),
            "❌ LOWER PINES (232450): 0 site(s) available out of 60 site(s)"
        );
    }

    #[test]
    fn test_pass_line() {
        let check = PassCheck {
            facility_id: 10086745,
            date: date("2024-07-04"),
            availability: PassAvailability {
                primary: true,
                secondary: true,
            },
        };

        assert_eq!(check.to_string(), "🏕 10086745: 2 pass(es) available");
    }

    #[test]
    fn test_campground_report_render() {
        let window = DateWindow::new(date("2024-06-01"), date("2024-06-03"));
        let mut report = AvailabilityReport::campgrounds(window);
        report.checks.push(campground(1, "A", 0, 10));
        report.checks.push(campground(2, "B", 3, 10));
        report.failures.push(ParkFailure {
            park_id: 3,
            error: "Malformed response: missing `campsites`".to_string(),
        });

        assert!(report.has_availability());
        assert_eq!(report.available_checks().count(), 1);
        assert_eq!(
            report.render(),
            "There are campsites available from 2024-06-01 to 2024-06-03!!!\n\
             ❌ A (1): 0 site(s) available out of 10 site(s)\n\
             🏕 B (2): 3 site(s) available out of 10 site(s)\n\
             ❌ 3: check failed: Malformed response: missing `campsites`"
        );
    }

    #[test]
    fn test_summaries_without_availability() {
        let window = DateWindow::new(date("2024-06-01"), date("2024-06-03"));
        let campgrounds = AvailabilityReport::campgrounds(window);
        let passes = AvailabilityReport::passes(date("2024-07-04"));

        assert_eq!(campgrounds.summary(), "There are no campsites available :(");
        assert_eq!(passes.summary(), "There are no passes available :(");
    }

    #[test]
    fn test_pass_summary_with_availability() {
        let mut report = AvailabilityReport::passes(date("2024-07-04"));
        report.checks.push(ParkCheck::Pass(PassCheck {
            facility_id: 10086745,
            date: date("2024-07-04"),
            availability: PassAvailability {
                primary: false,
                secondary: true,
            },
        }));

        assert_eq!(report.summary(), "There are passes available for 2024-07-04!!!");
    }
}
