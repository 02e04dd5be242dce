//! # octave-core
//!
//! Runtime for the outside-octave monitor: configuration, MIDI input, and the
//! serialized monitor thread that owns note state, independent of any UI.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use octave_core::config::Config;
//! use octave_core::display::DisplayLog;
//! use octave_core::midi::MidiInputManager;
//! use octave_core::monitor::MonitorHandle;
//!
//! // 1. Load and validate configuration (fails fast on bad interval widths)
//! let config = Config::load();
//! let mut monitor = MonitorHandle::new(config.monitor_config()?)?;
//!
//! // 2. Inject the monitor into the MIDI adapter as its event consumer
//! let mut midi = MidiInputManager::new();
//! midi.refresh_ports();
//! midi.connect(0, monitor.sender())?;
//!
//! // 3. Drain display updates on the presentation side
//! let mut log = DisplayLog::new(config.log_capacity());
//! for update in monitor.drain_updates() {
//!     log.apply(update);
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] — TOML configuration loading (embedded defaults + user override)
//! - [`midi`] — `MidiInputManager` (midir port listing/connection) and message parsing
//! - [`monitor`] — `EventConsumer`, `Monitor`, and `MonitorHandle` (dedicated
//!   monitor thread fed over a command channel)
//! - [`display`] — `DisplayUpdate`, `DisplaySink`, and the running `DisplayLog`

pub mod config;
pub mod display;
pub mod midi;
pub mod monitor;
