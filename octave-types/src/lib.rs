//! # octave-types
//!
//! Note-state tracking and interval detection for the outside-octave monitor.
//! Everything here is pure data and logic: no I/O, no threads, no MIDI driver.
//!
//! ## Module Overview
//!
//! - [`pitch`] — `PitchIndex` over the 88-key range, display names, MIDI mapping
//! - [`config`] — `MonitorConfig` (interval widths, exception rule, scan triggers)
//!   and its construction-time validation
//! - [`tracker`] — `NoteTracker`: per-pitch voice counts and their pitch-class fold
//! - [`scanner`] — `scan()`: lazy iteration over monitored-interval violations

pub mod config;
pub mod pitch;
pub mod scanner;
pub mod tracker;

pub use config::{check_width, ConfigError, IntervalKind, MonitorConfig};
pub use pitch::{PitchIndex, HIGHEST_MIDI_NOTE, LOWEST_MIDI_NOTE, PITCH_CLASS_COUNT, PITCH_COUNT};
pub use scanner::{scan, Violation, Violations};
pub use tracker::{NoteSnapshot, NoteTracker};
