//! Monitored-interval detection over a [`NoteSnapshot`].

use crate::config::MonitorConfig;
use crate::pitch::PitchIndex;
use crate::tracker::NoteSnapshot;

/// A held pair `monitored_interval` apart with no exception pitch excusing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub interval_name: String,
    pub lower: PitchIndex,
    pub upper: PitchIndex,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} {}", self.interval_name, self.lower, self.upper)
    }
}

/// Scan `snapshot` for every violation of `config`, lowest pair first.
///
/// The iterator is lazy and holds no state between calls: scanning the same
/// snapshot twice yields the same violations, and a pair that stays held is
/// reported again on every scan.
pub fn scan<'a>(snapshot: &NoteSnapshot<'a>, config: &'a MonitorConfig) -> Violations<'a> {
    Violations {
        snapshot: *snapshot,
        config,
        next_lower: 0,
    }
}

/// Iterator returned by [`scan`].
#[derive(Debug, Clone)]
pub struct Violations<'a> {
    snapshot: NoteSnapshot<'a>,
    config: &'a MonitorConfig,
    next_lower: usize,
}

impl Violations<'_> {
    /// A pair is excused when the exact exception pitch is held, or, with
    /// `allow_any_octave_exception`, when its pitch class is held in any octave.
    fn is_excused(&self, lower: PitchIndex) -> bool {
        let exception = lower.checked_add(self.config.exception_interval);
        let exact = exception.is_some_and(|p| self.snapshot.is_active(p));
        if exact {
            return true;
        }
        if !self.config.allow_any_octave_exception {
            return false;
        }
        let class = lower.as_usize() + self.config.exception_interval as usize;
        self.snapshot.pitch_class_voices(class) > 0
    }
}

impl Iterator for Violations<'_> {
    type Item = Violation;

    fn next(&mut self) -> Option<Violation> {
        let last = self.config.last_lower_index();
        while self.next_lower <= last {
            let i = self.next_lower;
            self.next_lower += 1;

            let Some(lower) = PitchIndex::new(i as u8) else {
                break;
            };
            let Some(upper) = lower.checked_add(self.config.monitored_interval) else {
                break;
            };
            if !self.snapshot.is_active(lower) || !self.snapshot.is_active(upper) {
                continue;
            }
            if self.is_excused(lower) {
                continue;
            }
            return Some(Violation {
                interval_name: self.config.interval_name.clone(),
                lower,
                upper,
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::NoteTracker;

    fn pitch(i: u8) -> PitchIndex {
        PitchIndex::new(i).unwrap()
    }

    fn held(pitches: &[u8]) -> NoteTracker {
        let mut tracker = NoteTracker::new();
        for &p in pitches {
            tracker.note_on(pitch(p));
        }
        tracker
    }

    fn violations(tracker: &NoteTracker, config: &MonitorConfig) -> Vec<(u8, u8)> {
        scan(&tracker.snapshot(), config)
            .map(|v| (v.lower.get(), v.upper.get()))
            .collect()
    }

    #[test]
    fn empty_state_has_no_violations() {
        let config = MonitorConfig::default();
        assert!(violations(&NoteTracker::new(), &config).is_empty());
    }

    #[test]
    fn single_note_never_violates() {
        for width in [1u8, 12, 13, 87] {
            let config = MonitorConfig { monitored_interval: width, ..Default::default() };
            for p in [0u8, 40, 87] {
                assert!(violations(&held(&[p]), &config).is_empty());
            }
        }
    }

    #[test]
    fn basic_outside_octave() {
        let config = MonitorConfig::default();
        let tracker = held(&[0, 13]);
        let found: Vec<Violation> = scan(&tracker.snapshot(), &config).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].lower, pitch(0));
        assert_eq!(found[0].upper, pitch(13));
        assert_eq!(found[0].to_string(), "Outside octave: A0 Bb1");
    }

    #[test]
    fn exact_exception_excuses() {
        let config = MonitorConfig::default();
        assert!(violations(&held(&[0, 10, 13]), &config).is_empty());
    }

    #[test]
    fn exception_in_other_octave() {
        let config = MonitorConfig::default();
        assert!(violations(&held(&[0, 13, 22]), &config).is_empty());

        let strict = MonitorConfig { allow_any_octave_exception: false, ..Default::default() };
        assert_eq!(violations(&held(&[0, 13, 22]), &strict), vec![(0, 13)]);
        // The exact pitch still excuses when transpositions are off.
        assert!(violations(&held(&[0, 10, 13]), &strict).is_empty());
    }

    #[test]
    fn exception_below_lower_note_counts_at_any_octave() {
        let config = MonitorConfig::default();
        // Index 46 shares a pitch class with 60 + 10 = 70.
        assert!(violations(&held(&[46, 60, 73]), &config).is_empty());
    }

    #[test]
    fn octave_is_not_monitored() {
        let config = MonitorConfig::default();
        assert!(violations(&held(&[0, 12, 24]), &config).is_empty());
    }

    #[test]
    fn top_of_range_pair_is_scanned() {
        let config = MonitorConfig::default();
        assert_eq!(violations(&held(&[74, 87]), &config), vec![(74, 87)]);
    }

    #[test]
    fn exception_past_top_is_treated_as_absent() {
        // 80 + 10 is past C8; only the pitch-class fold can excuse it.
        let config = MonitorConfig {
            monitored_interval: 5,
            allow_any_octave_exception: false,
            ..Default::default()
        };
        assert_eq!(violations(&held(&[80, 85]), &config), vec![(80, 85)]);

        let any_octave = MonitorConfig { monitored_interval: 5, ..Default::default() };
        // 80 + 10 = 90, pitch class 6, shared with index 78.
        assert!(violations(&held(&[78, 80, 85]), &any_octave).is_empty());
    }

    #[test]
    fn several_pairs_reported_low_to_high() {
        let config = MonitorConfig::default();
        assert_eq!(
            violations(&held(&[3, 16, 40, 53]), &config),
            vec![(3, 16), (40, 53)]
        );
    }

    #[test]
    fn adjacent_pairs_judged_independently() {
        let config = MonitorConfig { monitored_interval: 1, exception_interval: 2, ..Default::default() };
        assert_eq!(violations(&held(&[20, 21, 22]), &config), vec![(21, 22)]);
    }

    #[test]
    fn scan_is_restartable() {
        let config = MonitorConfig::default();
        let tracker = held(&[0, 13, 30, 43]);
        let first = violations(&tracker, &config);
        let second = violations(&tracker, &config);
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn scan_is_lazy() {
        let config = MonitorConfig::default();
        let tracker = held(&[0, 13, 30, 43]);
        let snapshot = tracker.snapshot();
        let mut iter = scan(&snapshot, &config);
        assert_eq!(iter.next().map(|v| v.lower.get()), Some(0));
        assert_eq!(iter.next().map(|v| v.lower.get()), Some(30));
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }
}
