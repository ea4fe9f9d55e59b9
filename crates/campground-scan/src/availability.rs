use std::collections::HashSet;

use chrono::NaiveDate;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::{
    CampgroundAvailability, DateWindow, DateWindowPolicy, PassAvailability, ScanError,
    parse_upstream_date,
};

/// Status string upstream uses for a bookable site-date.
pub const AVAILABLE_STATUS: &str = "Available";

const PRIMARY_THRESHOLD: &str = "/booking_windows/PRIMARY/advanced_sales_details/threshold_exists";
const SECONDARY_THRESHOLD: &str =
    "/booking_windows/SECONDARY/advanced_sales_details/threshold_exists";

fn malformed(msg: impl Into<String>) -> ScanError {
    ScanError::MalformedResponse(msg.into())
}

/// Count the campsites free on every targeted date of `window`.
///
/// `total` is the upstream `count` as reported; it is not checked against the
/// size of the `campsites` mapping. A site is free when its per-date mapping is
/// non-empty and every entry whose date is targeted by `policy` has status
/// [`AVAILABLE_STATUS`]. Entries for other dates do not affect the count but
/// must still be well formed.
pub fn evaluate_campground(
    response: &Value,
    window: &DateWindow,
    policy: DateWindowPolicy,
) -> Result<CampgroundAvailability, ScanError> {
    let total = response
        .get("count")
        .ok_or_else(|| malformed("missing `count`"))?
        .as_u64()
        .and_then(|count| u32::try_from(count).ok())
        .ok_or_else(|| malformed("`count` is not a non-negative integer"))?;

    let campsites = response
        .get("campsites")
        .ok_or_else(|| malformed("missing `campsites`"))?
        .as_object()
        .ok_or_else(|| malformed("`campsites` is not an object"))?;

    let targets = window.target_dates(policy);
    let mut available = 0u32;

    for (site_id, site) in campsites {
        let availabilities = site
            .get("availabilities")
            .and_then(Value::as_object)
            .ok_or_else(|| malformed(format!("site {site_id} has no `availabilities` object")))?;

        if site_is_available(site_id, availabilities, &targets)? {
            available += 1;
            debug!("Available site {}: {}", available, site_id);
        }
    }

    if available > total {
        warn!(
            "{} sites available but upstream only reports {} in total",
            available, total
        );
    }

    Ok(CampgroundAvailability { available, total })
}

fn site_is_available(
    site_id: &str,
    availabilities: &Map<String, Value>,
    targets: &HashSet<NaiveDate>,
) -> Result<bool, ScanError> {
    let mut available = !availabilities.is_empty();

    // every entry is validated, only the status comparison stops early
    for (date, status) in availabilities {
        let day = parse_upstream_date(date)
            .ok_or_else(|| malformed(format!("site {site_id}: `{date}` is not a date")))?;
        let status = status
            .as_str()
            .ok_or_else(|| malformed(format!("site {site_id}: status for {date} is not a string")))?;

        if available && targets.contains(&day) && status != AVAILABLE_STATUS {
            available = false;
        }
    }

    Ok(available)
}

/// Read the PRIMARY and SECONDARY threshold flags of a pass availability payload.
///
/// Only the first element of the payload array is inspected. A missing key or a
/// flag that is not a boolean is an error, never a zero.
pub fn evaluate_pass(response: &Value) -> Result<PassAvailability, ScanError> {
    let first = response
        .as_array()
        .ok_or_else(|| malformed("pass availability is not an array"))?
        .first()
        .ok_or_else(|| malformed("pass availability array is empty"))?;

    let primary = threshold_flag(first, PRIMARY_THRESHOLD)?;
    let secondary = threshold_flag(first, SECONDARY_THRESHOLD)?;
    debug!("primary: {}, secondary: {}", primary, secondary);

    Ok(PassAvailability { primary, secondary })
}

fn threshold_flag(entry: &Value, pointer: &str) -> Result<bool, ScanError> {
    entry
        .pointer(pointer)
        .ok_or_else(|| malformed(format!("missing `{pointer}`")))?
        .as_bool()
        .ok_or_else(|| malformed(format!("`{pointer}` is not a boolean")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_input_date;
    use serde_json::json;

    fn window(start: &str, end: &str) -> DateWindow {
        DateWindow::new(
            parse_input_date(start).unwrap(),
            parse_input_date(end).unwrap(),
        )
    }

    fn pass_payload(primary: bool, secondary: bool) -> Value {
        json!([{
            "booking_windows": {
                "PRIMARY": { "advanced_sales_details": { "threshold_exists": primary } },
                "SECONDARY": { "advanced_sales_details": { "threshold_exists": secondary } }
            }
        }])
    }

    #[test]
    fn test_only_fully_available_site_counts() {
        let response = json!({
            "count": 3,
            "campsites": {
                "A": { "availabilities": { "2024-06-01": "Available", "2024-06-02": "Available" } },
                "B": { "availabilities": { "2024-06-01": "Reserved" } },
                "C": { "availabilities": {} }
            }
        });

        let result = evaluate_campground(
            &response,
            &window("2024-06-01", "2024-06-02"),
            DateWindowPolicy::Nights,
        )
        .unwrap();

        assert_eq!(result, CampgroundAvailability { available: 1, total: 3 });
    }

    #[test]
    fn test_available_count_matches_fully_free_sites() {
        for total in 0..6u32 {
            for free in 0..=total {
                let mut campsites = Map::new();
                for i in 0..total {
                    let status = if i < free { "Available" } else { "Reserved" };
                    campsites.insert(
                        format!("site-{i}"),
                        json!({ "availabilities": {
                            "2024-06-01T00:00:00Z": "Available",
                            "2024-06-02T00:00:00Z": status
                        }}),
                    );
                }
                let response = json!({ "count": total, "campsites": campsites });

                let result = evaluate_campground(
                    &response,
                    &window("2024-06-01", "2024-06-03"),
                    DateWindowPolicy::Nights,
                )
                .unwrap();

                assert_eq!(result, CampgroundAvailability { available: free, total });
            }
        }
    }

    #[test]
    fn test_empty_mapping_is_never_available() {
        let response = json!({ "count": 1, "campsites": { "A": { "availabilities": {} } } });

        let result = evaluate_campground(
            &response,
            &window("2024-06-01", "2024-06-01"),
            DateWindowPolicy::Nights,
        )
        .unwrap();

        assert_eq!(result.available, 0);
    }

    #[test]
    fn test_unavailable_date_outside_window_is_ignored() {
        let response = json!({
            "count": 1,
            "campsites": {
                "A": { "availabilities": {
                    "2024-06-01T00:00:00Z": "Available",
                    "2024-06-02T00:00:00Z": "Available",
                    "2024-06-03T00:00:00Z": "Reserved",
                    "2024-05-31T00:00:00Z": "Not Available"
                } }
            }
        });

        let result = evaluate_campground(
            &response,
            &window("2024-06-01", "2024-06-03"),
            DateWindowPolicy::Nights,
        )
        .unwrap();

        assert_eq!(result, CampgroundAvailability { available: 1, total: 1 });
    }

    #[test]
    fn test_missing_dates_do_not_exclude_site() {
        let response = json!({
            "count": 1,
            "campsites": { "A": { "availabilities": { "2024-06-01T00:00:00Z": "Available" } } }
        });

        let result = evaluate_campground(
            &response,
            &window("2024-06-01", "2024-06-05"),
            DateWindowPolicy::Nights,
        )
        .unwrap();

        assert_eq!(result.available, 1);
    }

    #[test]
    fn test_start_date_only_policy() {
        let response = json!({
            "count": 1,
            "campsites": { "A": { "availabilities": {
                "2024-06-01T00:00:00Z": "Available",
                "2024-06-02T00:00:00Z": "Reserved"
            } } }
        });
        let window = window("2024-06-01", "2024-06-03");

        let start_only =
            evaluate_campground(&response, &window, DateWindowPolicy::StartDateOnly).unwrap();
        let nights = evaluate_campground(&response, &window, DateWindowPolicy::Nights).unwrap();

        assert_eq!(start_only.available, 1);
        assert_eq!(nights.available, 0);
    }

    #[test]
    fn test_available_may_exceed_reported_count() {
        let response = json!({
            "count": 0,
            "campsites": { "A": { "availabilities": { "2024-06-01": "Available" } } }
        });

        let result = evaluate_campground(
            &response,
            &window("2024-06-01", "2024-06-02"),
            DateWindowPolicy::Nights,
        )
        .unwrap();

        assert_eq!(result, CampgroundAvailability { available: 1, total: 0 });
    }

    #[test]
    fn test_missing_campsites_is_malformed() {
        let response = json!({ "count": 0 });

        let err = evaluate_campground(
            &response,
            &window("2024-06-01", "2024-06-02"),
            DateWindowPolicy::Nights,
        )
        .unwrap_err();

        assert!(matches!(err, ScanError::MalformedResponse(_)));
    }

    #[test]
    fn test_missing_count_is_malformed() {
        let response = json!({ "campsites": {} });

        let err = evaluate_campground(
            &response,
            &window("2024-06-01", "2024-06-02"),
            DateWindowPolicy::Nights,
        )
        .unwrap_err();

        assert!(matches!(err, ScanError::MalformedResponse(_)));
    }

    #[test]
    fn test_malformed_site_entries() {
        let cases = [
            json!({ "count": 1, "campsites": { "A": {} } }),
            json!({ "count": 1, "campsites": { "A": { "availabilities": { "tomorrow": "Available" } } } }),
            json!({ "count": 1, "campsites": { "A": { "availabilities": { "2024-06-01": 1 } } } }),
            json!({ "count": 1, "campsites": { "A": { "availabilities": {
                "2024-06-01T00:00:00Z": "Available",
                "2024-06-05T00:00:00Z": 1
            } } } }),
            json!({ "count": 1, "campsites": { "A": { "availabilities": {
                "2024-06-01T00:00:00Z": "Reserved",
                "zzz": "Available"
            } } } }),
            json!({ "count": 1, "campsites": { "A": { "availabilities": {
                "2024-06-01Tgarbage": "Available"
            } } } }),
            json!({ "count": -1, "campsites": {} }),
            json!({ "count": 1, "campsites": [] }),
        ];

        for response in cases {
            let err = evaluate_campground(
                &response,
                &window("2024-06-01", "2024-06-02"),
                DateWindowPolicy::Nights,
            )
            .unwrap_err();
            assert!(
                matches!(err, ScanError::MalformedResponse(_)),
                "{response} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_pass_threshold_flags() {
        assert_eq!(evaluate_pass(&pass_payload(true, true)).unwrap().available(), 2);
        assert_eq!(evaluate_pass(&pass_payload(true, false)).unwrap().available(), 1);
        assert_eq!(evaluate_pass(&pass_payload(false, true)).unwrap().available(), 1);
        assert_eq!(evaluate_pass(&pass_payload(false, false)).unwrap().available(), 0);
    }

    #[test]
    fn test_pass_missing_keys_are_malformed() {
        let cases = [
            json!({}),
            json!([]),
            json!([{ "booking_windows": {} }]),
            json!([{
                "booking_windows": {
                    "PRIMARY": { "advanced_sales_details": { "threshold_exists": true } }
                }
            }]),
            json!([{
                "booking_windows": {
                    "PRIMARY": { "advanced_sales_details": { "threshold_exists": "yes" } },
                    "SECONDARY": { "advanced_sales_details": { "threshold_exists": false } }
                }
            }]),
        ];

        for response in cases {
            let err = evaluate_pass(&response).unwrap_err();
            assert!(
                matches!(err, ScanError::MalformedResponse(_)),
                "{response} gave {err:?}"
            );
        }
    }
}
