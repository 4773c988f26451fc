//! Property tests for line aggregation and the derived reports.

use bus_line_checker::record::{LineId, StopRecord, StopRole};
use bus_line_checker::reports::Topology;
use bus_line_checker::{CheckError, LineRegistry};
use chrono::NaiveTime;
use proptest::prelude::*;
use std::collections::HashMap;

const NAMES: &[&str] = &[
    "Bourbon Street",
    "Elm Street",
    "Fifth Avenue",
    "Pilotow Street",
    "Sesame Street",
    "Sunset Boulevard",
];

fn record_strategy(role: impl Strategy<Value = StopRole>) -> impl Strategy<Value = StopRecord> {
    (1i64..5, 0usize..NAMES.len(), role, 0u32..24, 0u32..60).prop_map(
        |(line_id, name, role, hour, minute)| StopRecord {
            line_id,
            stop_id: name as i64,
            stop_name: NAMES[name].to_string(),
            role,
            arrival_time: NaiveTime::from_hms_opt(hour, minute, 0).unwrap(),
        },
    )
}

fn non_terminal_role() -> impl Strategy<Value = StopRole> {
    prop_oneof![Just(StopRole::Regular), Just(StopRole::OnDemand)]
}

fn any_role() -> impl Strategy<Value = StopRole> {
    prop_oneof![
        Just(StopRole::Start),
        Just(StopRole::Finish),
        Just(StopRole::Regular),
        Just(StopRole::OnDemand),
    ]
}

/// Adds one start and one finish per line so the topology sets are computed.
fn with_termini(mut records: Vec<StopRecord>) -> Vec<StopRecord> {
    let mut line_ids: Vec<LineId> = records.iter().map(|r| r.line_id).collect();
    line_ids.sort();
    line_ids.dedup();
    for (i, line_id) in line_ids.into_iter().enumerate() {
        for role in [StopRole::Start, StopRole::Finish] {
            records.push(StopRecord {
                line_id,
                stop_id: 100,
                stop_name: NAMES[i % NAMES.len()].to_string(),
                role,
                arrival_time: NaiveTime::from_hms_opt(23, 59, 0).unwrap(),
            });
        }
    }
    records
}

fn is_sorted_distinct(names: &[String]) -> bool {
    names.windows(2).all(|w| w[0] < w[1])
}

proptest! {
    #[test]
    fn stop_count_matches_input(records in prop::collection::vec(record_strategy(non_terminal_role()), 0..40)) {
        let mut registry = LineRegistry::new();
        for r in records.clone() {
            registry.upsert(r).unwrap();
        }

        let mut expected: HashMap<LineId, Vec<String>> = HashMap::new();
        for r in &records {
            expected.entry(r.line_id).or_default().push(r.stop_name.clone());
        }

        prop_assert_eq!(registry.len(), expected.len());
        for line in registry.lines() {
            let names: Vec<String> = line.stops().iter().map(|s| s.stop_name().to_string()).collect();
            prop_assert_eq!(line.stop_count(), names.len());
            prop_assert_eq!(&names, &expected[&line.line_id()]);
        }
    }

    #[test]
    fn termini_stay_unique(records in prop::collection::vec(record_strategy(any_role()), 0..40)) {
        let mut registry = LineRegistry::new();
        for r in records {
            let line_id = r.line_id;
            let role = r.role;
            let before = registry.get(line_id).cloned();
            match registry.upsert(r) {
                Ok(()) => {}
                Err(CheckError::DuplicateTerminus { line_id: faulted }) => {
                    prop_assert_eq!(faulted, line_id);
                    let before = before.expect("fault requires an existing line");
                    prop_assert!(
                        (role == StopRole::Start && before.has_start())
                            || (role == StopRole::Finish && before.has_end())
                    );
                    prop_assert_eq!(registry.get(line_id), Some(&before));
                }
                Err(other) => prop_assert!(false, "unexpected error {}", other),
            }
        }
        for line in registry.lines() {
            let starts = line.stops().iter().filter(|s| s.role() == StopRole::Start).count();
            let ends = line.stops().iter().filter(|s| s.role() == StopRole::Finish).count();
            prop_assert!(starts <= 1 && ends <= 1);
        }
    }

    #[test]
    fn topology_sets_sorted_and_distinct(records in prop::collection::vec(record_strategy(non_terminal_role()), 1..40)) {
        let mut registry = LineRegistry::new();
        for r in with_termini(records) {
            registry.upsert(r).unwrap();
        }

        match registry.topology() {
            Topology::Complete { start, transfer, finish } => {
                prop_assert!(is_sorted_distinct(&start));
                prop_assert!(is_sorted_distinct(&transfer));
                prop_assert!(is_sorted_distinct(&finish));
            }
            other => prop_assert!(false, "unexpected {:?}", other),
        }
        prop_assert_eq!(registry.topology(), registry.topology());
    }

    #[test]
    fn arrival_violations_at_most_one_per_line(records in prop::collection::vec(record_strategy(non_terminal_role()), 0..40)) {
        let mut registry = LineRegistry::new();
        for r in records {
            registry.upsert(r).unwrap();
        }

        let report = registry.arrival_order();
        let ids: Vec<LineId> = report.violations.iter().map(|v| v.bus_id).collect();
        prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));

        for v in &report.violations {
            let line = registry.get(v.bus_id).unwrap();
            let first = line
                .stops()
                .windows(2)
                .find(|p| p[0].arrival_time() > p[1].arrival_time())
                .unwrap();
            prop_assert_eq!(first[1].stop_name(), v.station.as_str());
        }
    }
}
