//! MIDI input: port listing, connection, and note message parsing.

use midir::{MidiInput, MidiInputConnection};

use crate::monitor::EventConsumer;

const CLIENT_NAME: &str = "outside-octave";

/// A note event as delivered by the input driver.
/// Only `note` matters to the monitor; the rest is carried for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteEvent {
    /// Event timestamp in microseconds (driver-specific epoch)
    pub timestamp_us: u64,
    pub channel: u8,
    pub note: u8,
    pub velocity: u8,
}

impl NoteEvent {
    pub fn new(note: u8) -> Self {
        Self {
            timestamp_us: 0,
            channel: 0,
            note,
            velocity: 0,
        }
    }
}

/// Note messages recognised on the wire. Everything else is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiMessage {
    NoteOn(NoteEvent),
    NoteOff(NoteEvent),
}

/// Information about an available MIDI port
#[derive(Debug, Clone)]
pub struct MidiPortInfo {
    pub index: usize,
    pub name: String,
}

/// MIDI input manager
pub struct MidiInputManager {
    midi_in: Option<MidiInput>,
    connection: Option<MidiInputConnection<()>>,
    connected_port_name: Option<String>,
    available_ports: Vec<MidiPortInfo>,
}

impl MidiInputManager {
    pub fn new() -> Self {
        let midi_in = match MidiInput::new(CLIENT_NAME) {
            Ok(midi_in) => Some(midi_in),
            Err(e) => {
                log::warn!(target: "midi", "MIDI input unavailable: {}", e);
                None
            }
        };
        Self {
            midi_in,
            connection: None,
            connected_port_name: None,
            available_ports: Vec::new(),
        }
    }

    /// Refresh the list of available MIDI input ports
    pub fn refresh_ports(&mut self) {
        self.available_ports.clear();

        if let Some(ref midi_in) = self.midi_in {
            let ports = midi_in.ports();
            for (index, port) in ports.iter().enumerate() {
                if let Ok(name) = midi_in.port_name(port) {
                    self.available_ports.push(MidiPortInfo { index, name });
                }
            }
        }
        log::debug!(target: "midi", "{} input port(s) available", self.available_ports.len());
    }

    pub fn list_ports(&self) -> &[MidiPortInfo] {
        &self.available_ports
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn connected_port_name(&self) -> Option<&str> {
        self.connected_port_name.as_deref()
    }

    /// Connect to a port by index and feed its note events to `consumer`.
    /// Any previous connection is closed first.
    pub fn connect<C>(&mut self, port_index: usize, mut consumer: C) -> Result<(), String>
    where
        C: EventConsumer + Send + 'static,
    {
        self.disconnect();

        // connect() consumes the MidiInput, so open a fresh one for it
        let midi_in = MidiInput::new(CLIENT_NAME).map_err(|e| e.to_string())?;
        let ports = midi_in.ports();

        let port = ports
            .get(port_index)
            .ok_or_else(|| format!("Invalid port index: {}", port_index))?;
        let port_name = midi_in
            .port_name(port)
            .unwrap_or_else(|_| "Unknown".to_string());

        let connection = midi_in
            .connect(
                port,
                "outside-octave-input",
                move |timestamp, message, _| {
                    dispatch_message(&mut consumer, timestamp, message);
                },
                (),
            )
            .map_err(|e| e.to_string())?;

        log::info!(target: "midi", "connected to input '{}'", port_name);
        self.connection = Some(connection);
        self.connected_port_name = Some(port_name);

        // Recreate MidiInput for future port listing
        self.midi_in = MidiInput::new(CLIENT_NAME).ok();

        Ok(())
    }

    /// Connect to the first port whose name contains `name` (case-insensitive).
    pub fn connect_by_name<C>(&mut self, name: &str, consumer: C) -> Result<(), String>
    where
        C: EventConsumer + Send + 'static,
    {
        self.refresh_ports();
        let index = find_port(&self.available_ports, name)
            .ok_or_else(|| format!("No MIDI input matching '{}'", name))?;
        self.connect(index, consumer)
    }

    pub fn disconnect(&mut self) {
        if let Some(conn) = self.connection.take() {
            conn.close();
            if let Some(name) = self.connected_port_name.as_deref() {
                log::info!(target: "midi", "disconnected from input '{}'", name);
            }
        }
        self.connected_port_name = None;
    }
}

impl Default for MidiInputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MidiInputManager {
    fn drop(&mut self) {
        self.disconnect();
    }
}

fn find_port(ports: &[MidiPortInfo], name: &str) -> Option<usize> {
    let wanted = name.to_lowercase();
    ports
        .iter()
        .find(|p| p.name.to_lowercase().contains(&wanted))
        .map(|p| p.index)
}

/// Parse raw bytes and forward note messages to `consumer`.
pub fn dispatch_message<C: EventConsumer + ?Sized>(consumer: &mut C, timestamp_us: u64, data: &[u8]) {
    match parse_midi_message(timestamp_us, data) {
        Some(MidiMessage::NoteOn(event)) => consumer.note_on(event),
        Some(MidiMessage::NoteOff(event)) => consumer.note_off(event),
        None => {}
    }
}

/// Parse a raw MIDI message into a note message.
pub fn parse_midi_message(timestamp_us: u64, data: &[u8]) -> Option<MidiMessage> {
    if data.len() < 3 {
        return None;
    }

    let status = data[0];
    let event = NoteEvent {
        timestamp_us,
        channel: status & 0x0F,
        note: data[1],
        velocity: data[2],
    };

    match status & 0xF0 {
        0x80 => Some(MidiMessage::NoteOff(event)),
        // Note On with velocity 0 = Note Off
        0x90 if event.velocity == 0 => Some(MidiMessage::NoteOff(event)),
        0x90 => Some(MidiMessage::NoteOn(event)),
        _ => None,
    }
}
