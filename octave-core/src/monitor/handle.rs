//! MonitorHandle: main-thread interface to the monitor thread.
//!
//! The monitor thread owns all note state. Input callbacks and the UI talk to
//! it through a command channel; violations come back on a separate update
//! channel that the presentation side drains at its own pace.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::Sender as CrossbeamSender;

use octave_types::{ConfigError, MonitorConfig, PitchIndex};

use super::monitor_thread::{MonitorCmd, MonitorThread};
use super::{EventConsumer, Monitor};
use crate::display::DisplayUpdate;
use crate::midi::NoteEvent;

const QUERY_TIMEOUT: Duration = Duration::from_secs(1);

/// Cloneable command endpoint; inject it into an input adapter.
#[derive(Debug, Clone)]
pub struct MonitorSender {
    tx: CrossbeamSender<MonitorCmd>,
}

impl MonitorSender {
    fn send_cmd(&self, cmd: MonitorCmd) -> Result<(), String> {
        self.tx
            .send(cmd)
            .map_err(|_| "Monitor thread disconnected".to_string())
    }

    /// Fire-and-forget: send a command and log if the monitor thread is gone.
    fn send(&self, cmd: MonitorCmd) {
        if let Err(e) = self.send_cmd(cmd) {
            log::warn!(target: "monitor", "command dropped: {}", e);
        }
    }

    pub fn reset(&self) {
        self.send(MonitorCmd::Reset);
    }
}

impl EventConsumer for MonitorSender {
    fn note_on(&mut self, event: NoteEvent) {
        self.send(MonitorCmd::NoteOn(event));
    }

    fn note_off(&mut self, event: NoteEvent) {
        self.send(MonitorCmd::NoteOff(event));
    }
}

/// Owner of the monitor thread.
pub struct MonitorHandle {
    sender: MonitorSender,
    update_rx: Receiver<DisplayUpdate>,
    join_handle: Option<JoinHandle<()>>,
}

impl MonitorHandle {
    /// Validate `config` and start the monitor thread.
    pub fn new(config: MonitorConfig) -> Result<Self, ConfigError> {
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded();
        let (update_tx, update_rx) = mpsc::channel();
        let monitor = Monitor::new(config, update_tx)?;

        let join_handle = thread::spawn(move || {
            MonitorThread::new(monitor, cmd_rx).run();
        });

        Ok(Self {
            sender: MonitorSender { tx: cmd_tx },
            update_rx,
            join_handle: Some(join_handle),
        })
    }

    pub fn sender(&self) -> MonitorSender {
        self.sender.clone()
    }

    /// Queue a reset behind any events already sent.
    pub fn reset(&self) {
        self.sender.reset();
    }

    /// Pitches held once every previously sent command has been applied.
    pub fn held_notes(&self) -> Result<Vec<PitchIndex>, String> {
        let (reply, rx) = mpsc::channel();
        self.sender.send_cmd(MonitorCmd::HeldNotes { reply })?;
        rx.recv_timeout(QUERY_TIMEOUT).map_err(|e| match e {
            RecvTimeoutError::Timeout => "Monitor thread did not answer".to_string(),
            RecvTimeoutError::Disconnected => "Monitor thread disconnected".to_string(),
        })
    }

    /// Pending display updates, oldest first (non-blocking).
    pub fn drain_updates(&self) -> Vec<DisplayUpdate> {
        self.update_rx.try_iter().collect()
    }

    pub fn recv_update_timeout(&self, timeout: Duration) -> Option<DisplayUpdate> {
        self.update_rx.recv_timeout(timeout).ok()
    }

    /// Stop the monitor thread and wait for it to finish.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.join_handle.take() {
            let _ = self.sender.send_cmd(MonitorCmd::Shutdown);
            if handle.join().is_err() {
                log::error!(target: "monitor", "monitor thread panicked");
            }
        }
    }
}

impl EventConsumer for MonitorHandle {
    fn note_on(&mut self, event: NoteEvent) {
        self.sender.note_on(event);
    }

    fn note_off(&mut self, event: NoteEvent) {
        self.sender.note_off(event);
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
