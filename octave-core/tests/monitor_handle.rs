//! End-to-end tests through the monitor thread: raw MIDI bytes in, display updates out.

use std::thread;

use octave_core::display::{DisplayLog, DisplayUpdate};
use octave_core::midi::{dispatch_message, NoteEvent};
use octave_core::monitor::{EventConsumer, MonitorHandle};
use octave_types::{MonitorConfig, PitchIndex};

fn note_on(note: u8) -> [u8; 3] {
    [0x90, note, 100]
}

fn note_off(note: u8) -> [u8; 3] {
    [0x80, note, 0]
}

fn violation_lines(updates: &[DisplayUpdate]) -> Vec<String> {
    updates
        .iter()
        .filter_map(|u| match u {
            DisplayUpdate::Violation(v) => Some(v.to_string()),
            DisplayUpdate::Cleared => None,
        })
        .collect()
}

#[test]
fn midi_bytes_produce_violation_lines() {
    let handle = MonitorHandle::new(MonitorConfig::default()).unwrap();
    let mut sender = handle.sender();

    dispatch_message(&mut sender, 0, &note_on(21));
    dispatch_message(&mut sender, 0, &note_on(34));

    // held_notes() is answered after everything queued before it.
    let held = handle.held_notes().unwrap();
    assert_eq!(held, vec![PitchIndex::new(0).unwrap(), PitchIndex::new(13).unwrap()]);
    let updates = handle.drain_updates();
    assert_eq!(violation_lines(&updates), vec!["Outside octave: A0 Bb1"]);
}

#[test]
fn exception_and_release_sequence() {
    let handle = MonitorHandle::new(MonitorConfig::default()).unwrap();
    let mut sender = handle.sender();

    dispatch_message(&mut sender, 0, &note_on(21)); // A0
    dispatch_message(&mut sender, 0, &note_on(43)); // G2, exception an octave up
    dispatch_message(&mut sender, 0, &note_on(34)); // Bb1
    handle.held_notes().unwrap();
    assert!(handle.drain_updates().is_empty());

    dispatch_message(&mut sender, 0, &[0x90, 43, 0]); // G2 released via velocity 0
    handle.held_notes().unwrap();
    assert_eq!(violation_lines(&handle.drain_updates()), vec!["Outside octave: A0 Bb1"]);

    dispatch_message(&mut sender, 0, &note_off(34));
    handle.held_notes().unwrap();
    assert!(handle.drain_updates().is_empty());
}

#[test]
fn reset_is_serialized_with_events() {
    let handle = MonitorHandle::new(MonitorConfig::default()).unwrap();
    let mut sender = handle.sender();

    sender.note_on(NoteEvent::new(21));
    handle.reset();
    sender.note_on(NoteEvent::new(34));

    assert_eq!(handle.held_notes().unwrap(), vec![PitchIndex::new(13).unwrap()]);
    assert_eq!(handle.drain_updates(), vec![DisplayUpdate::Cleared]);
}

#[test]
fn concurrent_sources_keep_counts_consistent() {
    let handle = MonitorHandle::new(MonitorConfig::default()).unwrap();

    let workers: Vec<_> = (0..4u8)
        .map(|w| {
            let mut sender = handle.sender();
            thread::spawn(move || {
                let note = 40 + w;
                for _ in 0..250 {
                    sender.note_on(NoteEvent::new(note));
                    sender.note_off(NoteEvent::new(note));
                }
                sender.note_on(NoteEvent::new(note));
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let held: Vec<u8> = handle.held_notes().unwrap().iter().map(|p| p.to_midi()).collect();
    assert_eq!(held, vec![40, 41, 42, 43]);
}

#[test]
fn updates_feed_display_log() {
    let mut handle = MonitorHandle::new(MonitorConfig::default()).unwrap();
    handle.note_on(NoteEvent::new(21));
    handle.note_on(NoteEvent::new(34));
    handle.note_on(NoteEvent::new(60));
    handle.held_notes().unwrap();

    let mut log = DisplayLog::new(10);
    for update in handle.drain_updates() {
        log.apply(update);
    }
    assert_eq!(log.len(), 2);

    handle.reset();
    handle.held_notes().unwrap();
    for update in handle.drain_updates() {
        log.apply(update);
    }
    assert!(log.is_empty());
}

#[test]
fn invalid_config_never_starts_thread() {
    let config = MonitorConfig { exception_interval: 88, ..Default::default() };
    assert!(MonitorHandle::new(config).is_err());
}

#[test]
fn shutdown_is_idempotent() {
    let mut handle = MonitorHandle::new(MonitorConfig::default()).unwrap();
    handle.shutdown();
    handle.shutdown();
    assert!(handle.held_notes().is_err());
}
