//! Pitch indices over the standard 88-key piano range.

/// Number of monitored pitches (A0..=C8).
pub const PITCH_COUNT: usize = 88;
/// Number of pitch classes.
pub const PITCH_CLASS_COUNT: usize = 12;
/// MIDI note number of index 0 (A0).
pub const LOWEST_MIDI_NOTE: u8 = 21;
/// MIDI note number of index 87 (C8).
pub const HIGHEST_MIDI_NOTE: u8 = LOWEST_MIDI_NOTE + (PITCH_COUNT as u8 - 1);

// Pitch class 0 is A, since index 0 is A0.
const PITCH_CLASS_NAMES: [&str; PITCH_CLASS_COUNT] = [
    "A", "Bb", "B", "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab",
];

/// A pitch inside the monitored range, 0 = A0 through 87 = C8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PitchIndex(u8);

impl PitchIndex {
    pub const LOWEST: PitchIndex = PitchIndex(0);
    pub const HIGHEST: PitchIndex = PitchIndex(PITCH_COUNT as u8 - 1);

    /// Returns `None` when `index` is outside 0..=87.
    pub fn new(index: u8) -> Option<Self> {
        if (index as usize) < PITCH_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Map a MIDI note number onto the monitored range.
    /// Notes outside 21..=108 have no index.
    pub fn from_midi(note: u8) -> Option<Self> {
        if (LOWEST_MIDI_NOTE..=HIGHEST_MIDI_NOTE).contains(&note) {
            Some(Self(note - LOWEST_MIDI_NOTE))
        } else {
            None
        }
    }

    pub fn to_midi(self) -> u8 {
        self.0 + LOWEST_MIDI_NOTE
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Pitch class in 0..12, where 0 is A.
    pub fn pitch_class(self) -> usize {
        self.as_usize() % PITCH_CLASS_COUNT
    }

    /// Octave number in scientific pitch notation (increments at C).
    pub fn octave(self) -> u8 {
        (self.0 + 9) / 12
    }

    /// Display name, e.g. "A0", "Bb3", "C4".
    pub fn name(self) -> String {
        self.to_string()
    }

    /// The pitch `semitones` above this one, if it is still in range.
    pub fn checked_add(self, semitones: u8) -> Option<Self> {
        self.0.checked_add(semitones).and_then(Self::new)
    }

    /// Iterate every pitch from A0 to C8.
    pub fn all() -> impl Iterator<Item = PitchIndex> {
        (0..PITCH_COUNT as u8).map(PitchIndex)
    }
}

impl TryFrom<u8> for PitchIndex {
    type Error = String;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::new(index).ok_or_else(|| format!("pitch index {} out of range 0..{}", index, PITCH_COUNT))
    }
}

impl From<PitchIndex> for u8 {
    fn from(pitch: PitchIndex) -> u8 {
        pitch.0
    }
}

impl std::fmt::Display for PitchIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", PITCH_CLASS_NAMES[self.pitch_class()], self.octave())
    }
}
