//! Sequential ingestion of raw records into a [`LineRegistry`].

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{CheckError, Result};
use crate::record::StopRecord;
use crate::registry::LineRegistry;

/// Owns the raw records of one run and the registry they are folded into.
#[derive(Debug)]
pub struct Ingestor {
    records: Vec<Value>,
    registry: LineRegistry,
}

impl Ingestor {
    pub fn new(records: Vec<Value>) -> Self {
        Ingestor {
            records,
            registry: LineRegistry::new(),
        }
    }

    pub fn records(&self) -> &[Value] {
        &self.records
    }

    pub fn registry(&self) -> &LineRegistry {
        &self.registry
    }

    pub fn into_registry(self) -> LineRegistry {
        self.registry
    }

    /// Folds every record into the registry in input order.
    ///
    /// Stops at the first faulty record; records after it are not looked at.
    ///
    /// # Errors
    ///
    /// - [`CheckError::InvalidBusId`] if `bus_id` is absent or not an integer.
    /// - [`CheckError::InvalidRecord`] if any other field fails to decode.
    /// - [`CheckError::DuplicateTerminus`] from the registry.
    #[tracing::instrument(skip(self), fields(records = self.records.len()))]
    pub fn ingest(&mut self) -> Result<()> {
        for (position, raw) in self.records.iter().enumerate() {
            let record = decode_record(position, raw)?;
            debug!(
                position,
                line_id = record.line_id,
                stop_name = %record.stop_name,
                "Ingesting record"
            );
            self.registry.upsert(record)?;
        }

        info!(lines = self.registry.len(), "Ingestion complete");
        Ok(())
    }
}

/// Types one raw record, checking `bus_id` before anything else.
fn decode_record(position: usize, raw: &Value) -> Result<StopRecord> {
    if raw.get("bus_id").and_then(Value::as_i64).is_none() {
        return Err(CheckError::InvalidBusId { position });
    }

    StopRecord::deserialize(raw).map_err(|source| CheckError::InvalidRecord { position, source })
}
