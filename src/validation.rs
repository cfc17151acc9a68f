//! Prediction accuracy checks and their CSV persistence.
//!
//! A validation run asks how well the long-term climatological normal
//! "predicts" the actual daily temperatures observed on one calendar day
//! across recent years, per location.

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::Path;
use tracing::debug;

/// One place to validate, loaded from a JSON locations file.
#[derive(Debug, Clone, Deserialize)]
pub struct Location {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// One finished validation run for one location.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationRecord {
    pub timestamp: DateTime<Utc>,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub month: u32,
    pub day: u32,
    pub predicted_temp: f64,
    pub actual_count: usize,
    pub accuracy_percent: f64,
}

/// Reads a JSON array of locations: `[{"name": ..., "lat": ..., "lon": ...}]`.
pub fn load_locations(path: &str) -> Result<Vec<Location>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read locations file {path}"))?;
    let locations: Vec<Location> =
        serde_json::from_str(&raw).with_context(|| format!("invalid locations file {path}"))?;
    Ok(locations)
}

/// Temperatures observed on the given calendar day, in series order.
pub fn actuals_for_day(series: &[(NaiveDate, f64)], month: u32, day: u32) -> Vec<f64> {
    series
        .iter()
        .filter(|(date, _)| date.month() == month && date.day() == day)
        .map(|(_, temp)| *temp)
        .collect()
}

/// Share of actuals that fall within `tolerance` of the prediction, as a
/// percentage. `None` when there are no actuals to judge against.
pub fn accuracy_percent(predicted: f64, actuals: &[f64], tolerance: f64) -> Option<f64> {
    if actuals.is_empty() {
        return None;
    }

    let within = actuals
        .iter()
        .filter(|temp| (*temp - predicted).abs() <= tolerance)
        .count();

    Some(within as f64 / actuals.len() as f64 * 100.0)
}

/// Appends a [`ValidationRecord`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, record: &ValidationRecord) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // header only on first write
        .from_writer(file);

    writer.serialize(record)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn sample_record() -> ValidationRecord {
        ValidationRecord {
            timestamp: Utc::now(),
            name: "Testville".to_string(),
            lat: 12.5,
            lon: 77.0,
            month: 8,
            day: 15,
            predicted_temp: 24.3,
            actual_count: 5,
            accuracy_percent: 80.0,
        }
    }

    #[test]
    fn test_accuracy_counts_values_within_tolerance() {
        let actuals = [24.0, 26.0, 30.0];
        assert_eq!(accuracy_percent(25.0, &actuals, 2.5), Some(2.0 / 3.0 * 100.0));
    }

    #[test]
    fn test_accuracy_tolerance_boundary_is_inclusive() {
        let actuals = [27.5, 22.5];
        assert_eq!(accuracy_percent(25.0, &actuals, 2.5), Some(100.0));
    }

    #[test]
    fn test_accuracy_without_actuals_is_none() {
        assert_eq!(accuracy_percent(25.0, &[], 2.5), None);
    }

    #[test]
    fn test_actuals_for_day_filters_calendar_day() {
        let series = vec![
            (NaiveDate::from_ymd_opt(2020, 8, 15).unwrap(), 24.0),
            (NaiveDate::from_ymd_opt(2020, 8, 16).unwrap(), 30.0),
            (NaiveDate::from_ymd_opt(2021, 8, 15).unwrap(), 25.0),
            (NaiveDate::from_ymd_opt(2021, 9, 15).unwrap(), 19.0),
        ];

        assert_eq!(actuals_for_day(&series, 8, 15), vec![24.0, 25.0]);
    }

    #[test]
    fn test_load_locations_parses_json_array() {
        let path = temp_path("atmo_rater_test_locations.json");
        fs::write(
            &path,
            r#"[{"name": "Bengaluru", "lat": 12.97, "lon": 77.59}]"#,
        )
        .unwrap();

        let locations = load_locations(&path).unwrap();
        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].name, "Bengaluru");
        assert_eq!(locations[0].lat, 12.97);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_record_creates_file() {
        let path = temp_path("atmo_rater_test_create.csv");
        let _ = fs::remove_file(&path); // clean up any prior run

        append_record(&path, &sample_record()).unwrap();

        assert!(Path::new(&path).exists());
        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.is_empty());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_record_writes_header_once() {
        let path = temp_path("atmo_rater_test_header.csv");
        let _ = fs::remove_file(&path);

        append_record(&path, &sample_record()).unwrap();
        append_record(&path, &sample_record()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        // Header line should appear exactly once
        let header_count = content.lines().filter(|l| l.contains("timestamp")).count();
        assert_eq!(header_count, 1);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_record_two_rows() {
        let path = temp_path("atmo_rater_test_rows.csv");
        let _ = fs::remove_file(&path);

        append_record(&path, &sample_record()).unwrap();
        append_record(&path, &sample_record()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);

        fs::remove_file(&path).unwrap();
    }
}
