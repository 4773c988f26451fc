//! Field-format checks over raw records.
//!
//! Runs on the untyped records, so it reports every problem instead of
//! stopping at the first one.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::reports::FormatReport;

static STOP_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z]\w+\s(\w+\s)*(Road|Avenue|Boulevard|Street)$").expect("valid regex")
});
static STOP_TYPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(S|O|F|)$").expect("valid regex"));
static ARRIVAL_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("valid regex"));

/// Identifiers must be non-zero integers that fit a line id.
fn is_identifier(value: Option<&Value>) -> bool {
    value.and_then(Value::as_i64).is_some_and(|id| id != 0)
}

fn matches_pattern(value: Option<&Value>, pattern: &Regex) -> bool {
    value
        .and_then(Value::as_str)
        .is_some_and(|s| pattern.is_match(s))
}

/// Counts format errors per field across all records.
#[tracing::instrument(skip(records), fields(records = records.len()))]
pub fn check_formats(records: &[Value]) -> FormatReport {
    let mut report = FormatReport::default();

    for record in records {
        if !is_identifier(record.get("bus_id")) {
            report.bus_id += 1;
        }
        if !is_identifier(record.get("stop_id")) {
            report.stop_id += 1;
        }
        if !matches_pattern(record.get("stop_name"), &STOP_NAME) {
            report.stop_name += 1;
        }
        if !matches_pattern(record.get("stop_type"), &STOP_TYPE) {
            report.stop_type += 1;
        }
        if !matches_pattern(record.get("a_time"), &ARRIVAL_TIME) {
            report.a_time += 1;
        }
    }

    debug!(errors = report.total(), "Format check complete");
    report
}
