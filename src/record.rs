//! Typed stop records as they arrive in the input payload.

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{CheckError, Result};

/// Bus line identifier (`bus_id` on the wire).
pub type LineId = i64;

/// Wire format of `a_time`.
pub const ARRIVAL_TIME_FORMAT: &str = "%H:%M";

/// Role of a stop within its line (`stop_type` on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StopRole {
    #[serde(rename = "S")]
    Start,
    #[serde(rename = "F")]
    Finish,
    #[serde(rename = "O")]
    OnDemand,
    #[serde(rename = "")]
    Regular,
}

impl StopRole {
    /// The single-letter code used in the input (`""` for regular stops).
    pub fn code(self) -> &'static str {
        match self {
            StopRole::Start => "S",
            StopRole::Finish => "F",
            StopRole::OnDemand => "O",
            StopRole::Regular => "",
        }
    }
}

/// One bus stop record from the input.
///
/// Unknown keys (e.g. `next_stop`) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StopRecord {
    #[serde(rename = "bus_id")]
    pub line_id: LineId,
    pub stop_id: i64,
    pub stop_name: String,
    #[serde(rename = "stop_type")]
    pub role: StopRole,
    #[serde(rename = "a_time", deserialize_with = "deserialize_arrival_time")]
    pub arrival_time: NaiveTime,
}

/// Parses an `"HH:MM"` time of day.
pub fn parse_arrival_time(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value, ARRIVAL_TIME_FORMAT).map_err(|_| {
        CheckError::InvalidArrivalTime {
            value: value.to_string(),
        }
    })
}

fn deserialize_arrival_time<'de, D>(deserializer: D) -> std::result::Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_arrival_time(&raw).map_err(serde::de::Error::custom)
}
