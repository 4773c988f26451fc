//! JSON payload parser for stop-record datasets.

use serde_json::Value;

use crate::error::Result;

/// Decodes a JSON array of records from raw bytes.
///
/// Records are kept as untyped values; typing happens one record at a time
/// during ingestion so the first bad record aborts in input order.
///
/// # Errors
///
/// Returns an error if the bytes are not a JSON array.
pub fn parse_records(bytes: &[u8]) -> Result<Vec<Value>> {
    Ok(serde_json::from_slice(bytes)?)
}
