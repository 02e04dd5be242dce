use std::path::{Path, PathBuf};

use serde::Deserialize;

use octave_types::{check_width, ConfigError, IntervalKind, MonitorConfig};

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

const DEFAULT_LOG_CAPACITY: usize = 200;
const MAX_LOG_CAPACITY: usize = 10_000;

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    monitor: MonitorSection,
    #[serde(default)]
    runtime: RuntimeSection,
}

#[derive(Deserialize, Default)]
struct MonitorSection {
    // Signed so a negative width reaches validation instead of failing the parse.
    monitored_interval: Option<i64>,
    exception_interval: Option<i64>,
    allow_any_octave_exception: Option<bool>,
    scan_on_note_on: Option<bool>,
    scan_on_note_off: Option<bool>,
    interval_name: Option<String>,
}

#[derive(Deserialize, Default)]
struct RuntimeSection {
    log_capacity: Option<usize>,
    input_port: Option<String>,
}

pub struct Config {
    monitor: MonitorSection,
    runtime: RuntimeSection,
}

impl Config {
    /// Embedded defaults overlaid with the user's config file, if any.
    pub fn load() -> Self {
        Self::load_with_override(user_config_path().as_deref())
    }

    pub fn load_with_override(user_path: Option<&Path>) -> Self {
        let mut base = embedded();

        if let Some(path) = user_path {
            if path.exists() {
                match std::fs::read_to_string(path) {
                    Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
                        Ok(user) => {
                            merge_monitor(&mut base.monitor, user.monitor);
                            merge_runtime(&mut base.runtime, user.runtime);
                        }
                        Err(e) => {
                            log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e)
                        }
                    },
                    Err(e) => {
                        log::warn!(target: "config", "could not read config {}: {}", path.display(), e)
                    }
                }
            }
        }

        Config {
            monitor: base.monitor,
            runtime: base.runtime,
        }
    }

    /// Monitor settings, validated. Invalid widths are a startup error.
    pub fn monitor_config(&self) -> Result<MonitorConfig, ConfigError> {
        let fallback = MonitorConfig::default();
        let monitored_interval = match self.monitor.monitored_interval {
            Some(width) => check_width(IntervalKind::Monitored, width)?,
            None => fallback.monitored_interval,
        };
        let exception_interval = match self.monitor.exception_interval {
            Some(width) => check_width(IntervalKind::Exception, width)?,
            None => fallback.exception_interval,
        };
        MonitorConfig {
            monitored_interval,
            exception_interval,
            allow_any_octave_exception: self
                .monitor
                .allow_any_octave_exception
                .unwrap_or(fallback.allow_any_octave_exception),
            scan_on_note_on: self.monitor.scan_on_note_on.unwrap_or(fallback.scan_on_note_on),
            scan_on_note_off: self.monitor.scan_on_note_off.unwrap_or(fallback.scan_on_note_off),
            interval_name: self
                .monitor
                .interval_name
                .clone()
                .unwrap_or(fallback.interval_name),
        }
        .validate()
    }

    /// Lines kept in the running report log (clamped to 1..=10000).
    pub fn log_capacity(&self) -> usize {
        self.runtime
            .log_capacity
            .unwrap_or(DEFAULT_LOG_CAPACITY)
            .clamp(1, MAX_LOG_CAPACITY)
    }

    /// Preferred MIDI input port name.
    pub fn input_port(&self) -> Option<&str> {
        self.runtime.input_port.as_deref()
    }
}

fn embedded() -> ConfigFile {
    match toml::from_str(DEFAULT_CONFIG) {
        Ok(file) => file,
        Err(e) => {
            log::error!(target: "config", "embedded config.toml is malformed: {}", e);
            ConfigFile::default()
        }
    }
}

pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("outside-octave"))
}

fn user_config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

fn merge_monitor(base: &mut MonitorSection, user: MonitorSection) {
    if user.monitored_interval.is_some() {
        base.monitored_interval = user.monitored_interval;
    }
    if user.exception_interval.is_some() {
        base.exception_interval = user.exception_interval;
    }
    if user.allow_any_octave_exception.is_some() {
        base.allow_any_octave_exception = user.allow_any_octave_exception;
    }
    if user.scan_on_note_on.is_some() {
        base.scan_on_note_on = user.scan_on_note_on;
    }
    if user.scan_on_note_off.is_some() {
        base.scan_on_note_off = user.scan_on_note_off;
    }
    if user.interval_name.is_some() {
        base.interval_name = user.interval_name;
    }
}

fn merge_runtime(base: &mut RuntimeSection, user: RuntimeSection) {
    if user.log_capacity.is_some() {
        base.log_capacity = user.log_capacity;
    }
    if user.input_port.is_some() {
        base.input_port = user.input_port;
    }
}
