mod app;

use std::fs::File;
use std::io::{Error, ErrorKind};

use octave_core::config::{self, Config};
use octave_core::midi::MidiInputManager;
use octave_core::monitor::MonitorHandle;

use app::{App, PortChoice};

fn init_logging(verbose: bool) {
    use simplelog::{LevelFilter, WriteLogger};

    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    let log_path = config::config_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("outside-octave.log");

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = match File::create(&log_path) {
        Ok(file) => file,
        Err(_) => match File::create(std::env::temp_dir().join("outside-octave.log")) {
            Ok(file) => file,
            Err(e) => {
                eprintln!("Cannot create log file: {}", e);
                return;
            }
        },
    };

    if let Err(e) = WriteLogger::init(log_level, simplelog::Config::default(), log_file) {
        eprintln!("Failed to initialize logger: {}", e);
        return;
    }

    log::info!("outside-octave starting (log level: {:?})", log_level);
}

fn print_usage() {
    println!("Usage: octave-ui [--list-ports] [--port <index|name>] [-v|--verbose]");
    println!();
    println!("Keys: r reset, p list inputs, 0-9 switch input, q quit");
}

fn main() -> std::io::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }
    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    let list_ports = args.iter().any(|a| a == "--list-ports");
    let port_arg = args
        .iter()
        .position(|a| a == "--port")
        .and_then(|i| args.get(i + 1).cloned());

    init_logging(verbose);

    let config = Config::load();
    let monitor_config = config.monitor_config().map_err(|e| {
        log::error!(target: "config", "invalid configuration: {}", e);
        Error::new(ErrorKind::InvalidInput, format!("invalid configuration: {}", e))
    })?;

    let mut midi = MidiInputManager::new();
    midi.refresh_ports();

    if list_ports {
        if midi.list_ports().is_empty() {
            println!("No MIDI inputs found.");
        }
        for port in midi.list_ports() {
            println!("{}: {}", port.index, port.name);
        }
        return Ok(());
    }

    let choice = port_arg
        .as_deref()
        .or(config.input_port())
        .map(PortChoice::parse)
        .unwrap_or(PortChoice::Index(0));

    let monitor = MonitorHandle::new(monitor_config)
        .map_err(|e| Error::new(ErrorKind::InvalidInput, e))?;

    let mut app = App::new(monitor, midi, config.log_capacity());
    app.select_port(&choice);
    app.run()
}
