//! Per-line aggregation of stop records and the reports derived from it.

use chrono::NaiveTime;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

use crate::error::{CheckError, Result};
use crate::record::{LineId, StopRecord, StopRole};
use crate::reports::{
    ArrivalReport, LineCount, LineSummary, OnDemandReport, TimeViolation, Topology,
};

/// A validated stop attached to a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stop {
    stop_id: i64,
    stop_name: String,
    role: StopRole,
    arrival_time: NaiveTime,
}

impl Stop {
    pub fn stop_id(&self) -> i64 {
        self.stop_id
    }

    pub fn stop_name(&self) -> &str {
        &self.stop_name
    }

    pub fn role(&self) -> StopRole {
        self.role
    }

    pub fn arrival_time(&self) -> NaiveTime {
        self.arrival_time
    }
}

impl From<StopRecord> for Stop {
    fn from(record: StopRecord) -> Self {
        Stop {
            stop_id: record.stop_id,
            stop_name: record.stop_name,
            role: record.role,
            arrival_time: record.arrival_time,
        }
    }
}

/// All stops of one bus line, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    line_id: LineId,
    stops: Vec<Stop>,
    has_start: bool,
    has_end: bool,
}

impl Line {
    fn new(line_id: LineId) -> Self {
        Line {
            line_id,
            stops: Vec::new(),
            has_start: false,
            has_end: false,
        }
    }

    pub fn line_id(&self) -> LineId {
        self.line_id
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub fn has_start(&self) -> bool {
        self.has_start
    }

    pub fn has_end(&self) -> bool {
        self.has_end
    }

    /// Appends a stop. The line is left untouched when the stop would be a
    /// second start or a second finish.
    fn push(&mut self, stop: Stop) -> Result<()> {
        let duplicate = match stop.role {
            StopRole::Start => self.has_start,
            StopRole::Finish => self.has_end,
            StopRole::OnDemand | StopRole::Regular => false,
        };
        if duplicate {
            warn!(
                line_id = self.line_id,
                stop_name = %stop.stop_name,
                role = stop.role.code(),
                "Duplicate terminus"
            );
            return Err(CheckError::DuplicateTerminus {
                line_id: self.line_id,
            });
        }

        match stop.role {
            StopRole::Start => self.has_start = true,
            StopRole::Finish => self.has_end = true,
            StopRole::OnDemand | StopRole::Regular => {}
        }
        self.stops.push(stop);
        Ok(())
    }
}

/// Owns every [`Line`] seen so far, keyed by line id.
///
/// Iteration follows the order in which lines were first seen.
#[derive(Debug, Clone, Default)]
pub struct LineRegistry {
    lines: Vec<Line>,
    index: HashMap<LineId, usize>,
}

impl LineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one record into its line, creating the line on first sight.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::DuplicateTerminus`] if the record is a second
    /// start or finish stop for its line.
    pub fn upsert(&mut self, record: StopRecord) -> Result<()> {
        let line_id = record.line_id;
        if let Some(&slot) = self.index.get(&line_id) {
            return self.lines[slot].push(record.into());
        }

        let mut line = Line::new(line_id);
        line.push(record.into())?;
        debug!(line_id, "New line");
        self.index.insert(line_id, self.lines.len());
        self.lines.push(line);
        Ok(())
    }

    pub fn get(&self, line_id: LineId) -> Option<&Line> {
        self.index.get(&line_id).map(|&slot| &self.lines[slot])
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn all_stops(&self) -> impl Iterator<Item = &Stop> {
        self.lines.iter().flat_map(|line| line.stops.iter())
    }

    /// How many times each stop name occurs across every line and role.
    pub fn name_occurrences(&self) -> HashMap<&str, usize> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for stop in self.all_stops() {
            *counts.entry(stop.stop_name.as_str()).or_default() += 1;
        }
        counts
    }

    /// Stop counts per line, in discovery order.
    #[tracing::instrument(skip(self), fields(lines = self.lines.len()))]
    pub fn line_summary(&self) -> LineSummary {
        LineSummary {
            lines: self
                .lines
                .iter()
                .map(|line| LineCount {
                    bus_id: line.line_id,
                    stops: line.stop_count(),
                })
                .collect(),
        }
    }

    /// Start, transfer and finish stop names, or the lines missing a terminus.
    ///
    /// A transfer stop is any name used more than once in the whole dataset.
    #[tracing::instrument(skip(self), fields(lines = self.lines.len()))]
    pub fn topology(&self) -> Topology {
        let incomplete: Vec<LineId> = self
            .lines
            .iter()
            .filter(|line| !line.has_start || !line.has_end)
            .map(|line| line.line_id)
            .collect();
        if !incomplete.is_empty() {
            debug!(incomplete = incomplete.len(), "Lines without start or end");
            return Topology::MissingTerminus { lines: incomplete };
        }

        let names_with_role = |role: StopRole| -> Vec<String> {
            self.all_stops()
                .filter(|stop| stop.role == role)
                .map(|stop| stop.stop_name.as_str())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .map(str::to_string)
                .collect()
        };

        let transfer = self
            .name_occurrences()
            .into_iter()
            .filter(|&(_, count)| count > 1)
            .map(|(name, _)| name)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();

        Topology::Complete {
            start: names_with_role(StopRole::Start),
            transfer,
            finish: names_with_role(StopRole::Finish),
        }
    }

    /// First arrival-time inversion per line, lines in ascending id order.
    #[tracing::instrument(skip(self), fields(lines = self.lines.len()))]
    pub fn arrival_order(&self) -> ArrivalReport {
        let mut sorted: Vec<&Line> = self.lines.iter().collect();
        sorted.sort_by_key(|line| line.line_id);

        let violations: Vec<TimeViolation> = sorted
            .into_iter()
            .filter_map(|line| {
                line.stops
                    .windows(2)
                    .find(|pair| pair[0].arrival_time > pair[1].arrival_time)
                    .map(|pair| TimeViolation {
                        bus_id: line.line_id,
                        station: pair[1].stop_name.clone(),
                    })
            })
            .collect();

        debug!(violations = violations.len(), "Arrival order checked");
        ArrivalReport { violations }
    }

    /// On-demand stops whose name is also used as a transfer point.
    #[tracing::instrument(skip(self), fields(lines = self.lines.len()))]
    pub fn stop_role_conflicts(&self) -> OnDemandReport {
        let occurrences = self.name_occurrences();

        let wrong_stop_type = self
            .all_stops()
            .filter(|stop| stop.role == StopRole::OnDemand)
            .filter(|stop| occurrences.get(stop.stop_name.as_str()).copied().unwrap_or(0) > 1)
            .map(|stop| stop.stop_name.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();

        OnDemandReport { wrong_stop_type }
    }
}
