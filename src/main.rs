// src/main.rs
//
// p10link command line: list ports, encode text patterns, send frames.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use p10link_lib::error::P10Error;
use p10link_lib::frame::{FrameBuffer, FrameCodec, PixelGrid, RamFrameCodec};
use p10link_lib::io::{list_ports, PortIdentifier, SerialLinkHandle};
use p10link_lib::logging::{init_file_logging, stop_file_logging};
use p10link_lib::settings::{load_settings, save_settings, AppSettings};
use p10link_lib::tlog;

/// Frame encoder and serial transmitter for P10 16x32 LED panels.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Also write log output to a timestamped file in the reports directory
    #[arg(long, global = true, default_value_t = false)]
    log_file: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List available serial ports
    Ports {
        /// Print as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Encode a text pattern and print the frame as hex
    Encode {
        /// Pattern file (16 lines of 32 cells, '#' on, '.' off), or '-' for stdin
        pattern: PathBuf,
        /// Print the 16 assembled lines separately
        #[arg(long, default_value_t = false)]
        lines: bool,
    },
    /// Encode a text pattern and send it to the controller
    Send {
        /// Pattern file, or '-' for stdin
        pattern: PathBuf,
        /// Serial port (defaults to the configured default_port)
        #[arg(short, long)]
        port: Option<String>,
    },
    /// Send a prepared 128-character hex frame
    SendHex {
        hex: String,
        #[arg(short, long)]
        port: Option<String>,
    },
    /// Decode a hex frame and print it as a text pattern
    Preview { hex: String },
    /// Remember the port used when --port is not given
    SetPort { port: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match load_settings() {
        Ok(s) => s,
        Err(e) => {
            tlog!("[cli] {}; using defaults", e);
            AppSettings::default()
        }
    };

    if cli.log_file || settings.file_logging {
        if let Err(e) = init_file_logging(Path::new(&settings.reports_dir)) {
            tlog!("[cli] {}", e);
        }
    }

    let result = run(cli.command, &settings);
    stop_file_logging();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tlog!("[cli] {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, settings: &AppSettings) -> Result<(), String> {
    match command {
        Command::Ports { json } => {
            let ports = list_ports()?;
            if json {
                let text = serde_json::to_string_pretty(&ports)
                    .map_err(|e| format!("Failed to serialize ports: {}", e))?;
                println!("{}", text);
            } else if ports.is_empty() {
                println!("No serial ports found");
            } else {
                for p in ports {
                    match (p.vid, p.pid) {
                        (Some(vid), Some(pid)) => {
                            println!("{}\t{}\t{:04X}:{:04X}", p.port_name, p.port_type, vid, pid)
                        }
                        _ => println!("{}\t{}", p.port_name, p.port_type),
                    }
                }
            }
            Ok(())
        }
        Command::Encode { pattern, lines } => {
            let frame = RamFrameCodec::encode(&read_pattern(&pattern)?)?;
            if lines {
                for line in frame.lines() {
                    println!("{}", line);
                }
            } else {
                println!("{}", frame);
            }
            Ok(())
        }
        Command::Send { pattern, port } => {
            let frame = RamFrameCodec::encode(&read_pattern(&pattern)?)?;
            transmit(&frame, resolve_port(port, settings)?)
        }
        Command::SendHex { hex, port } => {
            let frame = FrameBuffer::from_hex(&hex)?;
            transmit(&frame, resolve_port(port, settings)?)
        }
        Command::Preview { hex } => {
            let frame = FrameBuffer::from_hex(&hex)?;
            print!("{}", RamFrameCodec::decode(&frame)?);
            Ok(())
        }
        Command::SetPort { port } => {
            tlog!("[cli] Default port set to {}", port);
            save_settings(&AppSettings {
                default_port: Some(port),
                ..settings.clone()
            })?;
            Ok(())
        }
    }
}

fn read_pattern(path: &Path) -> Result<PixelGrid, String> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("Failed to read stdin: {}", e))?;
        buf
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?
    };
    text.parse::<PixelGrid>().map_err(String::from)
}

fn resolve_port(port: Option<String>, settings: &AppSettings) -> Result<PortIdentifier, String> {
    port.or_else(|| settings.default_port.clone())
        .map(PortIdentifier::from)
        .ok_or_else(|| "No port given and no default_port configured".to_string())
}

fn transmit(frame: &FrameBuffer, port: PortIdentifier) -> Result<(), String> {
    tlog!("[cli] Frame {}", frame);
    let mut link = SerialLinkHandle::open(&port).map_err(transport_hint)?;
    let sent = link.send(frame);
    link.close();
    let written = sent.map_err(transport_hint)?;
    tlog!("[cli] Sent {} bytes to {}", written, port);
    Ok(())
}

/// Nothing is retried automatically; transport failures tell the user to rerun.
fn transport_hint(e: P10Error) -> String {
    if e.is_transport() {
        format!("{}; check the connection and run the command again", e)
    } else {
        e.to_string()
    }
}
