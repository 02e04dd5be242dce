use std::sync::mpsc::Sender;

use crossbeam_channel::Receiver;

use octave_types::PitchIndex;

use super::Monitor;
use crate::display::DisplayUpdate;
use crate::midi::NoteEvent;

/// Commands accepted by the monitor thread, applied strictly in send order.
#[derive(Debug)]
pub(crate) enum MonitorCmd {
    NoteOn(NoteEvent),
    NoteOff(NoteEvent),
    Reset,
    HeldNotes { reply: Sender<Vec<PitchIndex>> },
    Shutdown,
}

pub(crate) struct MonitorThread {
    monitor: Monitor<Sender<DisplayUpdate>>,
    cmd_rx: Receiver<MonitorCmd>,
}

impl MonitorThread {
    pub(crate) fn new(monitor: Monitor<Sender<DisplayUpdate>>, cmd_rx: Receiver<MonitorCmd>) -> Self {
        Self { monitor, cmd_rx }
    }

    pub(crate) fn run(mut self) {
        log::debug!(target: "monitor", "monitor thread started");
        loop {
            match self.cmd_rx.recv() {
                Ok(cmd) => {
                    if self.handle_cmd(cmd) {
                        break;
                    }
                }
                Err(_) => break, // Disconnected
            }
        }
        log::debug!(target: "monitor", "monitor thread stopped");
    }

    /// Returns true when the thread should exit.
    fn handle_cmd(&mut self, cmd: MonitorCmd) -> bool {
        match cmd {
            MonitorCmd::NoteOn(event) => {
                self.monitor.handle_note_on(event);
            }
            MonitorCmd::NoteOff(event) => {
                self.monitor.handle_note_off(event);
            }
            MonitorCmd::Reset => self.monitor.reset(),
            MonitorCmd::HeldNotes { reply } => {
                let _ = reply.send(self.monitor.held_pitches());
            }
            MonitorCmd::Shutdown => return true,
        }
        false
    }
}
