//! In-memory event log owned by a jump session

use chrono::Utc;
use uuid::Uuid;

use super::types::JumpEvent;

/// One logged event, stamped with the session tick it happened on
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LoggedEvent {
    pub tick: u64,
    #[serde(flatten)]
    pub event: JumpEvent,
}

/// Tick-stamped event buffer (no file I/O)
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<LoggedEvent>,
    session_id: String,
    tick: u64,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new session with a fresh UUID
    pub fn start_session(&mut self) {
        self.clear();
        self.session_id = Uuid::new_v4().to_string();
        self.log(JumpEvent::SessionStart {
            session_id: self.session_id.clone(),
            timestamp: Utc::now().to_rfc3339(),
        });
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.session_id.clear();
        self.tick = 0;
    }

    pub fn advance_tick(&mut self) {
        self.tick += 1;
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn log(&mut self, event: JumpEvent) {
        self.events.push(LoggedEvent {
            tick: self.tick,
            event,
        });
    }

    pub fn events(&self) -> &[LoggedEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<LoggedEvent> {
        std::mem::take(&mut self.events)
    }

    /// Serialize all events as JSON lines
    pub fn to_json_lines(&self) -> String {
        self.events
            .iter()
            .filter_map(|e| serde_json::to_string(e).ok())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Compact one-line-per-event form: `T:NNNNN|CODE`
    pub fn summary(&self) -> String {
        self.events
            .iter()
            .map(|e| format!("T:{:05}|{}", e.tick % 100000, e.event.type_code()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Parse a JSON-lines log back into events, skipping blank lines
pub fn parse_json_lines(contents: &str) -> Result<Vec<LoggedEvent>, String> {
    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|e| format!("Line {}: {}", i + 1, e))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning::Step;

    #[test]
    fn test_session_start_has_uuid() {
        let mut log = EventLog::new();
        log.start_session();
        assert_eq!(log.session_id().len(), 36);
        assert_eq!(log.events().len(), 1);
        assert!(matches!(log.events()[0].event, JumpEvent::SessionStart { .. }));
    }

    #[test]
    fn test_events_are_tick_stamped() {
        let mut log = EventLog::new();
        log.start_session();
        log.advance_tick();
        log.advance_tick();
        log.log(JumpEvent::StepStarted {
            index: 0,
            step: Step::Leap,
        });
        assert_eq!(log.events()[1].tick, 2);
        assert_eq!(log.summary().lines().last(), Some("T:00002|ST"));
    }

    #[test]
    fn test_json_lines_parse_back() {
        let mut log = EventLog::new();
        log.start_session();
        log.log(JumpEvent::SequencePlanned {
            steps: vec![Step::MomentumRun, Step::Leap],
        });
        log.log(JumpEvent::SequenceCancelled { at_step: 1 });

        let text = log.to_json_lines();
        assert!(text.lines().nth(1).unwrap().contains("\"event\":\"sequence_planned\""));
        let parsed = parse_json_lines(&text).unwrap();
        assert_eq!(parsed, log.events());
        assert!(parsed[2].event.ends_sequence());
    }

    #[test]
    fn test_bad_line_reports_number() {
        let err = parse_json_lines("{\"tick\":0,\"event\":\"plan_failed\",\"reason\":\"x\"}\nnope").unwrap_err();
        assert!(err.starts_with("Line 2"));
    }
}
