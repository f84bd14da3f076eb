//! The record shape published to Socrata.

use crate::repository::ProblemRow;
use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;

/// Public report pages live under this prefix.
pub const REPORT_URL_BASE: &str = "http://collideosco.pe/report/";

/// SODA location column value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    /// WGS84 longitude.
    pub longitude: f64,
    /// WGS84 latitude.
    pub latitude: f64,
}

/// One dataset row.
///
/// The raw `confirmed`, `latitude` and `longitude` columns are replaced by
/// `occurred`, `url` and `location`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SodaReport {
    /// Problem ID.
    pub id: i32,
    /// Report category.
    pub category: String,
    /// Report title.
    pub title: String,
    /// Confirmation time in ISO 8601.
    pub occurred: Option<String>,
    /// Public report page.
    pub url: String,
    /// Report position.
    pub location: Location,
}

impl From<ProblemRow> for SodaReport {
    fn from(row: ProblemRow) -> Self {
        Self {
            id: row.id,
            category: row.category,
            title: row.title,
            occurred: row.confirmed.as_ref().map(isoformat),
            url: format!("{REPORT_URL_BASE}{}", row.id),
            location: Location {
                longitude: row.longitude,
                latitude: row.latitude,
            },
        }
    }
}

/// Formats a naive timestamp as `YYYY-MM-DDTHH:MM:SS`, adding `.ffffff`
/// only when there are sub-second microseconds.
#[must_use]
pub fn isoformat(timestamp: &NaiveDateTime) -> String {
    let seconds = timestamp.format("%Y-%m-%dT%H:%M:%S");
    match timestamp.nanosecond() / 1_000 {
        0 => seconds.to_string(),
        micros => format!("{seconds}.{micros:06}"),
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn at(micros: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2016, 3, 14)
            .unwrap()
            .and_hms_micro_opt(9, 26, 53, micros)
            .unwrap()
    }

    #[test]
    fn test_isoformat() {
        assert_eq!(isoformat(&at(0)), "2016-03-14T09:26:53");
        assert_eq!(isoformat(&at(589_793)), "2016-03-14T09:26:53.589793");
        assert_eq!(isoformat(&at(7)), "2016-03-14T09:26:53.000007");
    }

    #[test]
    fn test_row_to_report_json() {
        let row = ProblemRow {
            id: 42,
            latitude: 51.5,
            longitude: -0.125,
            confirmed: Some(at(250_000)),
            category: "Collision".to_string(),
            title: "Car hit cyclist".to_string(),
        };

        let json = serde_json::to_string(&SodaReport::from(row)).unwrap();
        assert_eq!(
            json,
            concat!(
                r#"{"id":42,"category":"Collision","title":"Car hit cyclist","#,
                r#""occurred":"2016-03-14T09:26:53.250000","#,
                r#""url":"http://collideosco.pe/report/42","#,
                r#""location":{"longitude":-0.125,"latitude":51.5}}"#
            )
        );
    }

    #[test]
    fn test_unconfirmed_time_is_null() {
        let report = SodaReport::from(ProblemRow {
            id: 1,
            latitude: 0.0,
            longitude: 0.0,
            confirmed: None,
            category: String::new(),
            title: String::new(),
        });
        assert_eq!(report.occurred, None);
        assert_eq!(report.url, "http://collideosco.pe/report/1");
    }
}
