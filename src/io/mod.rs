// src/io/mod.rs
//
// Device I/O for P10 panels.

pub mod serial;

pub use serial::{list_ports, PortIdentifier, SerialLinkHandle, SerialPortInfo};
