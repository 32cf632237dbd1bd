//! Past seating events and the lookback window the optimizer consults.
//!
//! Events are kept in chronological order. Committing a new arrangement
//! appends it and re-sorts, so events recorded out of order still land in
//! the right place; the pairing window is derived on demand.

use std::io;
use std::path::Path;

use chrono::NaiveDateTime;
use thiserror::Error;
use tracing::debug;

use crate::memory::PairingMemory;
use crate::model::seating::{Arrangement, SeatingEvent};

pub const DEFAULT_MEMORY_EVENTS: usize = 3;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to access history file: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse history JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatingHistory {
    events: Vec<SeatingEvent>,
    memory_events: usize,
}

impl Default for SeatingHistory {
    fn default() -> Self {
        SeatingHistory::new(DEFAULT_MEMORY_EVENTS)
    }
}

impl SeatingHistory {
    pub fn new(memory_events: usize) -> SeatingHistory {
        SeatingHistory { events: Vec::new(), memory_events }
    }

    pub fn from_events(mut events: Vec<SeatingEvent>, memory_events: usize) -> SeatingHistory {
        events.sort_by_key(|event| event.date);
        SeatingHistory { events, memory_events }
    }

    pub fn events(&self) -> &[SeatingEvent] {
        &self.events
    }

    pub fn memory_events(&self) -> usize {
        self.memory_events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Records `arrangement` as the seating held at `date`. Events with the
    /// same timestamp keep the order they were committed in.
    pub fn commit(&mut self, arrangement: &Arrangement, date: NaiveDateTime) {
        self.record(SeatingEvent::from_arrangement(arrangement, date));
    }

    pub fn record(&mut self, event: SeatingEvent) {
        self.events.push(event);
        self.events.sort_by_key(|event| event.date);
    }

    /// The most recent `memory_events` events, oldest first.
    pub fn window(&self) -> &[SeatingEvent] {
        let start = self.events.len().saturating_sub(self.memory_events);
        &self.events[start..]
    }

    pub fn pairing_memory(&self) -> PairingMemory {
        PairingMemory::build(self.window())
    }

    /// A missing file is an empty history.
    pub fn load(path: &Path, memory_events: usize) -> Result<SeatingHistory, HistoryError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No history file, starting empty");
                return Ok(SeatingHistory::new(memory_events));
            }
            Err(err) => return Err(err.into()),
        };
        let events: Vec<SeatingEvent> = serde_json::from_str(&contents)?;
        debug!(path = %path.display(), events = events.len(), "Loaded seating history");
        Ok(SeatingHistory::from_events(events, memory_events))
    }

    pub fn save(&self, path: &Path) -> Result<(), HistoryError> {
        let contents = serde_json::to_string_pretty(&self.events)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entity::Attendee;
    use crate::model::seating::{Seat, Table};
    use chrono::NaiveDate;

    fn date(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, day)
            .and_then(|d| d.and_hms_opt(18, 0, 0))
            .unwrap()
    }

    fn event(day: u32, names: &[&str]) -> SeatingEvent {
        let seats = names.iter().map(|n| Seat { name: n.to_string(), fixed: false }).collect();
        SeatingEvent { date: date(day), tables: vec![seats] }
    }

    #[test]
    fn window_keeps_latest_events_in_order() {
        let history = SeatingHistory::from_events(
            vec![event(4, &["d"]), event(1, &["a"]), event(3, &["c"]), event(2, &["b"])],
            3,
        );
        let days: Vec<NaiveDateTime> = history.window().iter().map(|e| e.date).collect();
        assert_eq!(days, vec![date(2), date(3), date(4)]);
    }

    #[test]
    fn window_shorter_than_limit() {
        let history = SeatingHistory::from_events(vec![event(1, &["a"])], 3);
        assert_eq!(history.window().len(), 1);
        assert!(SeatingHistory::new(0).window().is_empty());
    }

    #[test]
    fn commit_resorts_out_of_order_events() {
        let mut history = SeatingHistory::new(3);
        history.record(event(10, &["x", "y"]));
        let arrangement = Arrangement {
            tables: vec![Table::from(vec![
                Attendee::new("a", "F", "senior", "Sales").at_head_table(),
                Attendee::new("b", "M", "junior", "Sales"),
            ])],
        };
        history.commit(&arrangement, date(5));
        assert_eq!(history.events()[0].date, date(5));
        assert_eq!(history.events()[1].date, date(10));
        assert!(history.events()[0].tables[0][0].fixed);

        let memory = history.pairing_memory();
        assert_eq!(memory.get_pair("a", "b"), Some(&[1, 0][..]));
        assert_eq!(memory.get_pair("x", "y"), Some(&[0, 1][..]));
    }

    #[test]
    fn save_then_load_restores_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let history =
            SeatingHistory::from_events(vec![event(2, &["a", "b"]), event(1, &["c", "d"])], 2);
        history.save(&path).unwrap();
        assert_eq!(SeatingHistory::load(&path, 2).unwrap(), history);
    }

    const PLANNER_FILE: &str = r#"[
    {"date": "2024-09-08T09:00:00.123456", "arrangement": [
        [{"name": "A", "gender": "F", "seniority": "senior", "field": "Sales",
          "assign_head_table": false},
         {"name": "C", "gender": "F", "seniority": "junior", "field": "Legal",
          "assign_head_table": false}]
    ]},
    {"date": "2024-09-01T10:30:00", "arrangement": [
        [{"name": "A", "gender": "F", "seniority": "senior", "field": "Sales",
          "assign_head_table": true},
         {"name": "B", "gender": "M", "seniority": "junior", "field": "Engineering",
          "assign_head_table": false}],
        [{"name": "C", "gender": "F", "seniority": "junior", "field": "Legal",
          "assign_head_table": false},
         {"name": "D", "gender": "M", "seniority": "senior", "field": "Sales",
          "assign_head_table": false}]
    ]},
    {"date": "2024-09-01T08:00:00", "arrangement": [
        [{"name": "B", "gender": "M", "seniority": "junior", "field": "Engineering",
          "assign_head_table": false}]
    ]}
]"#;

    #[test]
    fn loads_planner_history_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seating_history.json");
        std::fs::write(&path, PLANNER_FILE).unwrap();

        let history = SeatingHistory::load(&path, 3).unwrap();
        assert_eq!(history.len(), 3);
        let first_day = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
        assert_eq!(history.events()[0].date, first_day.and_hms_opt(8, 0, 0).unwrap());
        assert_eq!(history.events()[1].date, first_day.and_hms_opt(10, 30, 0).unwrap());
        assert!(history.events()[1].tables[0][0].fixed);
        assert!(!history.events()[1].tables[0][1].fixed);

        let memory = history.pairing_memory();
        assert_eq!(memory.get_pair("A", "B"), Some(&[0, 1, 0][..]));
        assert_eq!(memory.get_pair("A", "C"), Some(&[0, 0, 1][..]));
        assert_eq!(memory.get_pair("A", "D"), None);
    }

    #[test]
    fn saved_files_use_the_planner_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        SeatingHistory::from_events(vec![event(1, &["a", "b"])], 3).save(&path).unwrap();
        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved[0]["date"], "2024-05-01T18:00:00");
        assert_eq!(saved[0]["arrangement"][0][1]["name"], "b");
        assert_eq!(saved[0]["arrangement"][0][1]["assign_head_table"], false);
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let history = SeatingHistory::load(&dir.path().join("absent.json"), 3).unwrap();
        assert!(history.is_empty());
        assert_eq!(history.memory_events(), 3);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(SeatingHistory::load(&path, 3), Err(HistoryError::Json(_))));
    }
}
