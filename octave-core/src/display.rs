//! Presentation-side boundary: what the monitor hands to whoever shows reports.

use std::collections::VecDeque;
use std::sync::mpsc::Sender;

use octave_types::Violation;

/// One update for the presentation side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayUpdate {
    /// A newly detected violation; shown as its `Display` string.
    Violation(Violation),
    /// Note state was reset; the visible log should be cleared.
    Cleared,
}

/// Receiver of display updates. Publishing must never block the monitor.
pub trait DisplaySink {
    fn publish(&mut self, update: DisplayUpdate);
}

/// Hand off to another thread. A disconnected receiver only loses the update.
impl DisplaySink for Sender<DisplayUpdate> {
    fn publish(&mut self, update: DisplayUpdate) {
        if let Err(e) = self.send(update) {
            log::debug!(target: "display", "display update dropped: {}", e);
        }
    }
}

impl DisplaySink for Vec<DisplayUpdate> {
    fn publish(&mut self, update: DisplayUpdate) {
        self.push(update);
    }
}

/// Running report log, most recent line first, bounded in length.
#[derive(Debug, Clone)]
pub struct DisplayLog {
    lines: VecDeque<String>,
    capacity: usize,
}

impl DisplayLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn apply(&mut self, update: DisplayUpdate) {
        match update {
            DisplayUpdate::Violation(violation) => self.push(violation.to_string()),
            DisplayUpdate::Cleared => self.lines.clear(),
        }
    }

    fn push(&mut self, line: String) {
        self.lines.push_front(line);
        self.lines.truncate(self.capacity);
    }

    /// Lines newest first.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl DisplaySink for DisplayLog {
    fn publish(&mut self, update: DisplayUpdate) {
        self.apply(update);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use octave_types::PitchIndex;

    fn violation(lower: u8, upper: u8) -> DisplayUpdate {
        DisplayUpdate::Violation(Violation {
            interval_name: "Outside octave".into(),
            lower: PitchIndex::new(lower).unwrap(),
            upper: PitchIndex::new(upper).unwrap(),
        })
    }

    #[test]
    fn newest_line_first() {
        let mut log = DisplayLog::new(10);
        log.apply(violation(0, 13));
        log.apply(violation(39, 52));
        let lines: Vec<&str> = log.lines().collect();
        assert_eq!(lines, vec!["Outside octave: C4 Db5", "Outside octave: A0 Bb1"]);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn oldest_lines_dropped_at_capacity() {
        let mut log = DisplayLog::new(2);
        log.apply(violation(0, 13));
        log.apply(violation(1, 14));
        log.apply(violation(2, 15));
        assert_eq!(log.len(), 2);
        assert_eq!(log.lines().last(), Some("Outside octave: Bb0 B1"));
    }

    #[test]
    fn cleared_empties_log() {
        let mut log = DisplayLog::new(5);
        log.apply(violation(0, 13));
        log.apply(DisplayUpdate::Cleared);
        assert!(log.is_empty());
        assert_eq!(log.lines().next(), None);
    }

    #[test]
    fn sender_sink_survives_dropped_receiver() {
        let (mut tx, rx) = std::sync::mpsc::channel::<DisplayUpdate>();
        drop(rx);
        tx.publish(DisplayUpdate::Cleared);
    }
}
