//! Monitor configuration: which interval is watched and what excuses it.

use crate::pitch::PITCH_COUNT;

/// Fixed configuration for a monitor session.
///
/// Build one from [`MonitorConfig::default`] (an outside octave excused by a
/// minor seventh at any octave) with field updates, then call
/// [`MonitorConfig::validate`] before handing it to a monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Semitones between the lower and upper pitch of a monitored pair.
    pub monitored_interval: u8,
    /// Semitones above the lower pitch whose presence excuses the pair.
    pub exception_interval: u8,
    /// Also accept the exception pitch class in any octave.
    pub allow_any_octave_exception: bool,
    pub scan_on_note_on: bool,
    pub scan_on_note_off: bool,
    /// Label printed in front of every violation.
    pub interval_name: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            monitored_interval: 13,
            exception_interval: 10,
            allow_any_octave_exception: true,
            scan_on_note_on: true,
            scan_on_note_off: true,
            interval_name: "Outside octave".to_string(),
        }
    }
}

impl MonitorConfig {
    /// Reject widths that can never match inside the 88-key range.
    pub fn validate(self) -> Result<Self, ConfigError> {
        check_width(IntervalKind::Monitored, self.monitored_interval.into())?;
        check_width(IntervalKind::Exception, self.exception_interval.into())?;
        if self.interval_name.trim().is_empty() {
            return Err(ConfigError::EmptyIntervalName);
        }
        Ok(self)
    }

    /// Highest lower-pitch index the scan visits (inclusive).
    /// Only meaningful on a validated config.
    pub fn last_lower_index(&self) -> usize {
        (PITCH_COUNT - 1).saturating_sub(self.monitored_interval as usize)
    }
}

/// Narrow a width read from an untyped source (e.g. a config file) to the
/// 1..=87 semitones that fit inside the pitch range.
pub fn check_width(which: IntervalKind, width: i64) -> Result<u8, ConfigError> {
    if width <= 0 {
        return Err(ConfigError::NonPositiveInterval { which, width });
    }
    if width >= PITCH_COUNT as i64 {
        return Err(ConfigError::IntervalTooWide { which, width });
    }
    u8::try_from(width).map_err(|_| ConfigError::IntervalTooWide { which, width })
}

/// Which of the two configured widths an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalKind {
    Monitored,
    Exception,
}

impl IntervalKind {
    pub fn name(&self) -> &'static str {
        match self {
            IntervalKind::Monitored => "monitored interval",
            IntervalKind::Exception => "exception interval",
        }
    }
}

/// Invalid monitor configuration, reported at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    NonPositiveInterval { which: IntervalKind, width: i64 },
    IntervalTooWide { which: IntervalKind, width: i64 },
    EmptyIntervalName,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveInterval { which, width } => {
                write!(f, "{} must be at least 1 semitone, got {}", which.name(), width)
            }
            Self::IntervalTooWide { which, width } => write!(
                f,
                "{} of {} semitones does not fit in {} pitches",
                which.name(),
                width,
                PITCH_COUNT
            ),
            Self::EmptyIntervalName => write!(f, "interval name must not be empty"),
        }
    }
}

impl std::error::Error for ConfigError {}
