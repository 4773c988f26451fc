//! Fault types raised while loading and ingesting stop records.
//!
//! Data-quality findings (missing termini, time inversions, role conflicts)
//! are report output, not faults, and never appear here.

use crate::record::LineId;

pub type Result<T> = std::result::Result<T, CheckError>;

/// Faults that abort a run.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// The payload is not a JSON array of records.
    #[error("invalid payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// `bus_id` is missing or not an integer
    #[error("bus_id is not int! (record {position})")]
    InvalidBusId { position: usize },

    /// A second start or a second finish stop for the same line
    #[error("There are two starts or ends for the line: {line_id}.")]
    DuplicateTerminus { line_id: LineId },

    /// Any other required field is absent or has the wrong type
    #[error("invalid record {position}: {source}")]
    InvalidRecord {
        position: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid arrival time: {value:?}")]
    InvalidArrivalTime { value: String },
}
