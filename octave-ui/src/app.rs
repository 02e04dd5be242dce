//! Terminal front-end: input selection, reset, and the running report log.

use std::io::{self, Write};
use std::time::Duration;

use crossterm::cursor::MoveTo;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::queue;
use crossterm::terminal::{self, Clear, ClearType};

use octave_core::display::DisplayLog;
use octave_core::midi::MidiInputManager;
use octave_core::monitor::MonitorHandle;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// How the user asked for an input port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortChoice {
    Index(usize),
    Name(String),
}

impl PortChoice {
    pub fn parse(s: &str) -> PortChoice {
        match s.trim().parse::<usize>() {
            Ok(index) => PortChoice::Index(index),
            Err(_) => PortChoice::Name(s.trim().to_string()),
        }
    }
}

/// What a key press asks the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAction {
    Reset,
    ListPorts,
    SelectPort(usize),
    Quit,
}

fn key_action(key: &KeyEvent) -> Option<KeyAction> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(KeyAction::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(KeyAction::Quit),
        KeyCode::Char('r') => Some(KeyAction::Reset),
        KeyCode::Char('p') => Some(KeyAction::ListPorts),
        KeyCode::Char(c) => c.to_digit(10).map(|d| KeyAction::SelectPort(d as usize)),
        _ => None,
    }
}

/// Restores cooked mode even if the event loop bails out early.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(RawModeGuard)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            log::warn!("could not restore terminal: {}", e);
        }
    }
}

const HELP_LINE: &str = "r reset | p inputs | 0-9 switch input | q quit";

pub struct App {
    monitor: MonitorHandle,
    midi: MidiInputManager,
    log: DisplayLog,
    notice: Vec<String>,
}

impl App {
    pub fn new(monitor: MonitorHandle, midi: MidiInputManager, log_capacity: usize) -> Self {
        Self {
            monitor,
            midi,
            log: DisplayLog::new(log_capacity),
            notice: Vec::new(),
        }
    }

    pub fn select_port(&mut self, choice: &PortChoice) {
        if self.midi.list_ports().is_empty() {
            self.set_notice(vec!["No MIDI inputs found; press p to rescan.".to_string()]);
            return;
        }
        let result = match choice {
            PortChoice::Index(index) => self.midi.connect(*index, self.monitor.sender()),
            PortChoice::Name(name) => self.midi.connect_by_name(name, self.monitor.sender()),
        };
        match result {
            Ok(()) => {
                let name = self.midi.connected_port_name().unwrap_or("Unknown");
                let line = format!("Listening on {}", name);
                self.set_notice(vec![line]);
            }
            Err(e) => {
                log::warn!(target: "midi", "{}", e);
                self.set_notice(vec![e]);
            }
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        let _raw = RawModeGuard::enable()?;
        self.redraw()?;

        loop {
            if self.apply_updates() {
                self.redraw()?;
            }

            if !event::poll(POLL_INTERVAL)? {
                continue;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };
            match key_action(&key) {
                Some(KeyAction::Quit) => break,
                Some(KeyAction::Reset) => self.monitor.reset(),
                Some(KeyAction::ListPorts) => {
                    self.list_ports();
                    self.redraw()?;
                }
                Some(KeyAction::SelectPort(index)) => {
                    self.select_port(&PortChoice::Index(index));
                    self.redraw()?;
                }
                None => {}
            }
        }

        self.midi.disconnect();
        self.monitor.shutdown();
        Ok(())
    }

    /// Fold pending monitor updates into the log. Returns whether any arrived.
    fn apply_updates(&mut self) -> bool {
        let updates = self.monitor.drain_updates();
        let changed = !updates.is_empty();
        for update in updates {
            self.log.apply(update);
        }
        changed
    }

    fn list_ports(&mut self) {
        self.midi.refresh_ports();
        if self.midi.list_ports().is_empty() {
            self.set_notice(vec!["No MIDI inputs found.".to_string()]);
            return;
        }
        let connected = self.midi.connected_port_name();
        let lines: Vec<String> = self
            .midi
            .list_ports()
            .iter()
            .map(|p| {
                let marker = if connected == Some(p.name.as_str()) { "*" } else { " " };
                format!("{} {}: {}", marker, p.index, p.name)
            })
            .collect();
        self.set_notice(lines);
    }

    fn set_notice(&mut self, lines: Vec<String>) {
        self.notice = lines;
    }

    fn redraw(&self) -> io::Result<()> {
        let mut out = io::stdout().lock();
        queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
        // Raw mode needs an explicit carriage return.
        for line in frame_lines(&self.notice, &self.log) {
            write!(out, "{}\r\n", line)?;
        }
        out.flush()
    }
}

/// Whole screen contents: help, notices, then the report log newest first.
fn frame_lines(notice: &[String], log: &DisplayLog) -> Vec<String> {
    let mut lines = vec![HELP_LINE.to_string()];
    lines.extend(notice.iter().cloned());
    lines.push(String::new());
    lines.extend(log.lines().map(str::to_string));
    lines
}
