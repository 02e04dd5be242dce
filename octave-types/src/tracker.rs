//! Held-note state: how many voices sound each pitch, folded by pitch class.
//!
//! Both tables are private and only change through [`NoteTracker`] methods,
//! each of which updates the pair together. Readers borrow a [`NoteSnapshot`],
//! so a scan can never observe a half-applied event.

use crate::pitch::{PitchIndex, PITCH_CLASS_COUNT, PITCH_COUNT};

/// Per-pitch voice counts plus the pitch-class fold of the same counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteTracker {
    voices: [u32; PITCH_COUNT],
    pitch_classes: [u32; PITCH_CLASS_COUNT],
}

impl Default for NoteTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteTracker {
    pub fn new() -> Self {
        Self {
            voices: [0; PITCH_COUNT],
            pitch_classes: [0; PITCH_CLASS_COUNT],
        }
    }

    /// One more voice sounds `pitch`.
    pub fn note_on(&mut self, pitch: PitchIndex) {
        self.voices[pitch.as_usize()] += 1;
        self.pitch_classes[pitch.pitch_class()] += 1;
    }

    /// One voice on `pitch` released. A release with no matching note-on
    /// leaves both tables untouched.
    pub fn note_off(&mut self, pitch: PitchIndex) {
        let count = &mut self.voices[pitch.as_usize()];
        if *count == 0 {
            log::trace!(target: "tracker", "stray note-off for {}", pitch);
            return;
        }
        *count -= 1;
        let class = &mut self.pitch_classes[pitch.pitch_class()];
        *class = class.saturating_sub(1);
    }

    pub fn reset(&mut self) {
        self.voices = [0; PITCH_COUNT];
        self.pitch_classes = [0; PITCH_CLASS_COUNT];
    }

    pub fn snapshot(&self) -> NoteSnapshot<'_> {
        NoteSnapshot {
            voices: &self.voices,
            pitch_classes: &self.pitch_classes,
        }
    }

    /// Total voices currently held across all pitches.
    pub fn held_count(&self) -> u32 {
        self.voices.iter().sum()
    }
}

/// Read-only view of a [`NoteTracker`] at one point between events.
#[derive(Debug, Clone, Copy)]
pub struct NoteSnapshot<'a> {
    voices: &'a [u32; PITCH_COUNT],
    pitch_classes: &'a [u32; PITCH_CLASS_COUNT],
}

impl<'a> NoteSnapshot<'a> {
    pub fn voices(&self, pitch: PitchIndex) -> u32 {
        self.voices[pitch.as_usize()]
    }

    /// Voices sounding `pitch_class` in any octave. Classes outside 0..12 wrap.
    pub fn pitch_class_voices(&self, pitch_class: usize) -> u32 {
        self.pitch_classes[pitch_class % PITCH_CLASS_COUNT]
    }

    pub fn is_active(&self, pitch: PitchIndex) -> bool {
        self.voices(pitch) > 0
    }

    pub fn is_empty(&self) -> bool {
        self.voices.iter().all(|&v| v == 0)
    }

    /// Pitches with at least one voice, lowest first.
    pub fn active_pitches(&self) -> impl Iterator<Item = PitchIndex> + 'a {
        let voices = self.voices;
        PitchIndex::all().filter(move |p| voices[p.as_usize()] > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pitch(i: u8) -> PitchIndex {
        PitchIndex::new(i).unwrap()
    }

    #[test]
    fn new_tracker_is_empty() {
        let tracker = NoteTracker::new();
        let snap = tracker.snapshot();
        assert!(snap.is_empty());
        assert_eq!(tracker.held_count(), 0);
        assert_eq!(snap.active_pitches().count(), 0);
    }

    #[test]
    fn note_on_counts_voice_and_class() {
        let mut tracker = NoteTracker::new();
        tracker.note_on(pitch(3));
        tracker.note_on(pitch(15));
        let snap = tracker.snapshot();
        assert_eq!(snap.voices(pitch(3)), 1);
        assert_eq!(snap.voices(pitch(15)), 1);
        assert_eq!(snap.pitch_class_voices(3), 2);
        assert_eq!(snap.pitch_class_voices(15), 2);
    }

    #[test]
    fn unison_voices_stack() {
        let mut tracker = NoteTracker::new();
        tracker.note_on(pitch(40));
        tracker.note_on(pitch(40));
        tracker.note_off(pitch(40));
        assert!(tracker.snapshot().is_active(pitch(40)));
        tracker.note_off(pitch(40));
        assert!(!tracker.snapshot().is_active(pitch(40)));
        assert_eq!(tracker.snapshot().pitch_class_voices(pitch(40).pitch_class()), 0);
    }

    #[test]
    fn stray_note_off_is_ignored() {
        let mut tracker = NoteTracker::new();
        tracker.note_on(pitch(12));
        tracker.note_off(pitch(0));
        let snap = tracker.snapshot();
        assert_eq!(snap.voices(pitch(0)), 0);
        // Pitch 12 shares a class with 0 and must still count.
        assert_eq!(snap.pitch_class_voices(0), 1);
    }

    #[test]
    fn reset_clears_everything() {
        let mut tracker = NoteTracker::new();
        for i in [0, 13, 22, 87] {
            tracker.note_on(pitch(i));
        }
        tracker.reset();
        assert_eq!(tracker, NoteTracker::new());
        tracker.reset();
        assert_eq!(tracker, NoteTracker::new());
    }

    #[test]
    fn active_pitches_ascending() {
        let mut tracker = NoteTracker::new();
        for i in [50, 2, 30] {
            tracker.note_on(pitch(i));
        }
        let active: Vec<u8> = tracker.snapshot().active_pitches().map(PitchIndex::get).collect();
        assert_eq!(active, vec![2, 30, 50]);
    }
}
