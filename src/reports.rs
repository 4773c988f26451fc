//! Report values produced from a [`LineRegistry`](crate::registry::LineRegistry).
//!
//! Each report renders its text form through `Display` and serializes to
//! JSON through `serde`.

use serde::Serialize;
use std::fmt;

use crate::record::LineId;

/// Number of stops recorded for one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineCount {
    pub bus_id: LineId,
    pub stops: usize,
}

/// Per-line stop counts, in line discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineSummary {
    pub lines: Vec<LineCount>,
}

impl fmt::Display for LineSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line names and number of stops:")?;
        for line in &self.lines {
            write!(f, "\nbus_id: {}, stops: {}", line.bus_id, line.stops)?;
        }
        Ok(())
    }
}

/// Start, transfer and finish stops across all lines.
///
/// When any line lacks a start or finish stop the sets are not computed and
/// only the offending lines are listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Topology {
    MissingTerminus {
        lines: Vec<LineId>,
    },
    Complete {
        start: Vec<String>,
        transfer: Vec<String>,
        finish: Vec<String>,
    },
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topology::MissingTerminus { lines } => {
                let rendered: Vec<String> = lines
                    .iter()
                    .map(|id| format!("There is no start or end stop for the line: {id}."))
                    .collect();
                write!(f, "{}", rendered.join("\n"))
            }
            Topology::Complete {
                start,
                transfer,
                finish,
            } => {
                writeln!(f, "Start stops: {} {}", start.len(), name_list(start))?;
                writeln!(f, "Transfer stops: {} {}", transfer.len(), name_list(transfer))?;
                write!(f, "Finish stops: {} {}", finish.len(), name_list(finish))
            }
        }
    }
}

/// First arrival-time inversion found on a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeViolation {
    pub bus_id: LineId,
    /// Stop whose arrival time is earlier than the stop before it.
    pub station: String,
}

/// Arrival-time monotonicity results, ordered by line id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArrivalReport {
    pub violations: Vec<TimeViolation>,
}

impl ArrivalReport {
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }
}

impl fmt::Display for ArrivalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Arrival time test:")?;
        if self.is_ok() {
            return write!(f, "\nOK");
        }
        for v in &self.violations {
            write!(f, "\nbus_id line {}: wrong time on station {}", v.bus_id, v.station)?;
        }
        Ok(())
    }
}

/// On-demand stops that are also transfer points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OnDemandReport {
    pub wrong_stop_type: Vec<String>,
}

impl OnDemandReport {
    pub fn is_ok(&self) -> bool {
        self.wrong_stop_type.is_empty()
    }
}

impl fmt::Display for OnDemandReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "On demand stops test:")?;
        if self.is_ok() {
            write!(f, "\nOK")
        } else {
            write!(f, "\nWrong stop type: {}", name_list(&self.wrong_stop_type))
        }
    }
}

/// Field-level format error counts over the raw records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormatReport {
    pub bus_id: usize,
    pub stop_id: usize,
    pub stop_name: usize,
    pub stop_type: usize,
    pub a_time: usize,
}

impl FormatReport {
    /// Counts per field, in report order.
    pub fn fields(&self) -> [(&'static str, usize); 5] {
        [
            ("bus_id", self.bus_id),
            ("stop_id", self.stop_id),
            ("stop_name", self.stop_name),
            ("stop_type", self.stop_type),
            ("a_time", self.a_time),
        ]
    }

    pub fn total(&self) -> usize {
        self.fields().iter().map(|(_, count)| count).sum()
    }
}

impl fmt::Display for FormatReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Format validation: {} errors", self.total())?;
        for (field, count) in self.fields() {
            write!(f, "\n{field}: {count}")?;
        }
        Ok(())
    }
}

/// Renders names as a bracketed, quoted list: `['A', 'B']`.
///
/// Names containing a single quote (and no double quote) are wrapped in
/// double quotes instead.
pub fn name_list<S: AsRef<str>>(names: &[S]) -> String {
    let quoted: Vec<String> = names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            if name.contains('\'') && !name.contains('"') {
                format!("\"{name}\"")
            } else {
                format!("'{}'", name.replace('\\', "\\\\").replace('\'', "\\'"))
            }
        })
        .collect();
    format!("[{}]", quoted.join(", "))
}
