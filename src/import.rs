//! File import parsing.
//!
//! Every function here is pure over the file contents; reading the file and
//! applying the result belong to the caller.

use std::io::Read;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{DashboardError, Result};
use crate::meetings::validate_dataset;
use crate::models::{Meeting, MetricKind, Trend};
use crate::performance::PerformanceSample;
use crate::workforce::WorkforceRow;

#[derive(Debug, Deserialize)]
struct PerformanceCsvRow {
    #[serde(default)]
    metric: Option<String>,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    trend: Option<String>,
}

/// Rejects anything but `.csv` files.
pub fn ensure_csv(file_name: &str) -> Result<()> {
    if file_name.to_ascii_lowercase().ends_with(".csv") {
        Ok(())
    } else {
        Err(DashboardError::UnsupportedFile(file_name.to_string()))
    }
}

/// Builds a reader whose header row is lowercased so column lookup ignores
/// case.
fn csv_reader<R: Read>(input: R) -> Result<csv::Reader<R>> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(input);
    let headers: StringRecord = reader
        .headers()?
        .iter()
        .map(|h| h.to_lowercase())
        .collect();
    reader.set_headers(headers);
    Ok(reader)
}

fn required(field: Option<String>, name: &str) -> Result<String> {
    field.ok_or_else(|| DashboardError::InvalidData(format!("{name} is required")))
}

/// Parses performance samples from CSV text. The first bad row aborts the
/// whole import.
pub fn parse_performance_csv(contents: &str) -> Result<Vec<PerformanceSample>> {
    let mut reader = csv_reader(contents.as_bytes())?;
    let mut samples = Vec::new();

    for result in reader.deserialize::<PerformanceCsvRow>() {
        let row = result?;
        let metric = required(row.metric, "Metric")?;
        let value = required(row.value, "Value")?;
        let date = required(row.date, "Date")?;

        let metric: MetricKind = metric.parse()?;
        let value = value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| DashboardError::InvalidData(format!("Value must be a number: {value}")))?;
        let timestamp = NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|_| {
            DashboardError::InvalidData(format!("Date must use YYYY-MM-DD: {date}"))
        })?;
        let trend = match row.trend {
            Some(trend) => trend.parse()?,
            None => Trend::Stable,
        };

        samples.push(PerformanceSample {
            metric,
            value,
            timestamp,
            trend,
        });
    }

    if samples.is_empty() {
        return Err(DashboardError::Empty);
    }
    Ok(samples)
}

/// Checks the file name, then parses its CSV contents.
pub fn parse_performance_file(file_name: &str, contents: &str) -> Result<Vec<PerformanceSample>> {
    ensure_csv(file_name)?;
    parse_performance_csv(contents)
}

pub fn parse_workforce_csv(contents: &str) -> Result<Vec<WorkforceRow>> {
    let mut reader = csv_reader(contents.as_bytes())?;
    let rows = reader
        .deserialize::<WorkforceRow>()
        .collect::<std::result::Result<Vec<_>, _>>()?;

    if rows.is_empty() {
        return Err(DashboardError::Empty);
    }
    Ok(rows)
}

/// Parses and validates a meeting dataset from JSON text.
pub fn parse_meeting_dataset(contents: &str) -> Result<Vec<Meeting>> {
    let dataset: Value = serde_json::from_str(contents)?;
    validate_dataset(&dataset)?;
    serde_json::from_value(dataset)
        .map_err(|err| DashboardError::InvalidDataset(format!("Invalid meeting record: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_match_regardless_of_case() {
        let csv = "METRIC,Value,date,Trend\nefficiency,82,2026-01-15,increasing\nQuality, 70.5 ,2026-01-16,\n";
        let samples = parse_performance_csv(csv).unwrap();

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].metric, MetricKind::Efficiency);
        assert_eq!(samples[0].trend, Trend::Increasing);
        assert_eq!(samples[1].metric, MetricKind::Quality);
        assert_eq!(samples[1].value, 70.5);
        assert_eq!(samples[1].trend, Trend::Stable);
    }

    #[test]
    fn missing_trend_column_defaults_to_stable() {
        let samples = parse_performance_csv("metric,value,date\nleadership,90,2026-02-01\n").unwrap();
        assert_eq!(samples[0].trend, Trend::Stable);
    }

    #[test]
    fn missing_metric_aborts_import() {
        let csv = "metric,value,date\nefficiency,82,2026-01-15\n,70,2026-01-16\n";
        let err = parse_performance_csv(csv).unwrap_err();
        assert_eq!(err.to_string(), "Invalid data format: Metric is required");
    }

    #[test]
    fn missing_value_aborts_import() {
        let csv = "metric,value,date\nengagement,,2026-01-16\n";
        let err = parse_performance_csv(csv).unwrap_err();
        assert_eq!(err.to_string(), "Invalid data format: Value is required");
    }

    #[test]
    fn unknown_metric_and_bad_numbers_are_rejected() {
        let err = parse_performance_csv("metric,value,date\nhappiness,1,2026-01-16\n").unwrap_err();
        assert_eq!(err.to_string(), "Invalid data format: Unknown metric: happiness");

        let err = parse_performance_csv("metric,value,date\nquality,high,2026-01-16\n").unwrap_err();
        assert!(err.to_string().starts_with("Invalid data format: Value must be a number"));

        let err = parse_performance_csv("metric,value,date\nquality,5,16/01/2026\n").unwrap_err();
        assert!(err.to_string().contains("YYYY-MM-DD"));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        for raw in ["NaN", "inf", "-infinity"] {
            let csv = format!("metric,value,date\nquality,{raw},2026-01-16\n");
            let err = parse_performance_csv(&csv).unwrap_err();
            assert_eq!(
                err.to_string(),
                format!("Invalid data format: Value must be a number: {raw}")
            );
        }
    }

    #[test]
    fn empty_sheet_is_rejected() {
        let err = parse_performance_csv("metric,value,date\n").unwrap_err();
        assert!(matches!(err, DashboardError::Empty));
    }

    #[test]
    fn only_csv_files_are_accepted() {
        assert!(ensure_csv("scores.CSV").is_ok());
        let err = parse_performance_file("scores.xlsx", "metric,value,date\n").unwrap_err();
        assert_eq!(err.to_string(), "Please upload a CSV file");
    }

    #[test]
    fn workforce_rows_parse_with_optional_columns() {
        let csv = "Name,Role,Workload,Tasks\nAvery Lee,Analyst,85,9\n";
        let rows = parse_workforce_csv(csv).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Avery Lee");
        assert_eq!(rows[0].workload, 85);
        assert!(rows[0].id.is_none());
        assert!(rows[0].trend.is_none());
    }

    #[test]
    fn meeting_dataset_parses_after_validation() {
        let json = r#"[{"id":"1","title":"T","date":"2025-01-01","participants":[],"actionItems":[],"decisions":[]}]"#;
        let meetings = parse_meeting_dataset(json).unwrap();
        assert_eq!(meetings.len(), 1);
        assert_eq!(meetings[0].title, "T");
    }

    #[test]
    fn malformed_json_reports_json_error() {
        let err = parse_meeting_dataset("[{").unwrap_err();
        assert!(err.to_string().starts_with("Invalid JSON format"));
    }

    #[test]
    fn invalid_meeting_surfaces_validation_message() {
        let json = r#"[{"id":1,"title":"T","date":"2025-01-01","participants":[],"actionItems":[],"decisions":[]}]"#;
        let err = parse_meeting_dataset(json).unwrap_err();
        assert_eq!(err.to_string(), "Meeting ID must be a string");
    }

    #[test]
    fn mistyped_optional_field_is_a_dataset_error() {
        let json = r#"[{"id":"1","title":"T","date":"2025-01-01","participants":[],"actionItems":[],"decisions":[],"keyTakeaways":"none"}]"#;
        let err = parse_meeting_dataset(json).unwrap_err();
        assert_eq!(err.to_string(), "Key takeaways must be an array");
    }

    #[test]
    fn malformed_follow_up_task_is_not_a_json_error() {
        let json = r#"[{"id":"1","title":"T","date":"2025-01-01","participants":[],"actionItems":[],"decisions":[],"followUpTasks":[{"title":"x"}]}]"#;
        let err = parse_meeting_dataset(json).unwrap_err();
        assert!(matches!(err, DashboardError::InvalidDataset(_)));
        assert!(err.to_string().starts_with("Invalid meeting record"));
    }
}
