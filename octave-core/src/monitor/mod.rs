//! Note monitoring: the event consumer interface and the state it drives.
//!
//! [`Monitor`] is the single owner of note state and takes `&mut self` for
//! every event. Run it on one thread (see [`MonitorHandle`]) and feed it
//! through a channel so every update and scan is serialized.

mod handle;
mod monitor_thread;

pub use handle::{MonitorHandle, MonitorSender};

use octave_types::{scan, ConfigError, MonitorConfig, NoteTracker, PitchIndex, Violations};

use crate::display::{DisplaySink, DisplayUpdate};
use crate::midi::NoteEvent;

/// Receiver of note events from an input source.
pub trait EventConsumer {
    fn note_on(&mut self, event: NoteEvent);
    fn note_off(&mut self, event: NoteEvent);
}

/// Note tracker plus scan policy, publishing violations to a sink.
pub struct Monitor<S: DisplaySink> {
    tracker: NoteTracker,
    config: MonitorConfig,
    sink: S,
}

impl<S: DisplaySink> Monitor<S> {
    /// Validates `config`; a bad config never reaches the event path.
    pub fn new(config: MonitorConfig, sink: S) -> Result<Self, ConfigError> {
        let config = config.validate()?;
        Ok(Self {
            tracker: NoteTracker::new(),
            config,
            sink,
        })
    }

    /// Apply a note-on, then scan if enabled. Returns violations published.
    pub fn handle_note_on(&mut self, event: NoteEvent) -> usize {
        let Some(pitch) = in_range(&event) else {
            return 0;
        };
        self.tracker.note_on(pitch);
        if self.config.scan_on_note_on {
            self.publish_violations()
        } else {
            0
        }
    }

    /// Apply a note-off, then scan if enabled. Returns violations published.
    pub fn handle_note_off(&mut self, event: NoteEvent) -> usize {
        let Some(pitch) = in_range(&event) else {
            return 0;
        };
        self.tracker.note_off(pitch);
        if self.config.scan_on_note_off {
            self.publish_violations()
        } else {
            0
        }
    }

    /// Forget every held note and tell the display to clear.
    pub fn reset(&mut self) {
        self.tracker.reset();
        self.sink.publish(DisplayUpdate::Cleared);
        log::info!(target: "monitor", "note state reset");
    }

    /// Scan the current state without publishing anything.
    pub fn violations(&self) -> Violations<'_> {
        scan(&self.tracker.snapshot(), &self.config)
    }

    pub fn held_pitches(&self) -> Vec<PitchIndex> {
        self.tracker.snapshot().active_pitches().collect()
    }

    pub fn tracker(&self) -> &NoteTracker {
        &self.tracker
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    fn publish_violations(&mut self) -> usize {
        let mut count = 0;
        for violation in scan(&self.tracker.snapshot(), &self.config) {
            log::debug!(target: "monitor", "{}", violation);
            self.sink.publish(DisplayUpdate::Violation(violation));
            count += 1;
        }
        count
    }
}

impl<S: DisplaySink> EventConsumer for Monitor<S> {
    fn note_on(&mut self, event: NoteEvent) {
        self.handle_note_on(event);
    }

    fn note_off(&mut self, event: NoteEvent) {
        self.handle_note_off(event);
    }
}

fn in_range(event: &NoteEvent) -> Option<PitchIndex> {
    let pitch = PitchIndex::from_midi(event.note);
    if pitch.is_none() {
        log::trace!(target: "monitor", "ignoring note {} outside monitored range", event.note);
    }
    pitch
}
