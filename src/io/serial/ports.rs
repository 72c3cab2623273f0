// src/io/serial/ports.rs
//
// Serial device enumeration. Recomputed on every call, never cached.

use std::fmt;

use serde::Serialize;

use crate::error::P10Error;

/// Opaque OS name of a serial device (e.g. "COM3", "/dev/ttyUSB0")
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PortIdentifier(String);

impl PortIdentifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PortIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PortIdentifier {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for PortIdentifier {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Information about an available serial port
#[derive(Clone, Debug, Serialize)]
pub struct SerialPortInfo {
    pub port_name: PortIdentifier,
    pub port_type: String,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
    pub serial_number: Option<String>,
    pub vid: Option<u16>,
    pub pid: Option<u16>,
}

/// List available serial ports. An empty list is a valid result.
///
/// On macOS, filters out /dev/tty.* devices and only shows /dev/cu.* devices.
/// The tty (terminal) devices block on open waiting for carrier detect.
pub fn list_ports() -> Result<Vec<SerialPortInfo>, P10Error> {
    let ports = serialport::available_ports().map_err(|e| P10Error::Enumeration {
        reason: e.to_string(),
    })?;
    Ok(describe_ports(ports))
}

/// Convert serialport's enumeration into our port records
pub fn describe_ports(ports: Vec<serialport::SerialPortInfo>) -> Vec<SerialPortInfo> {
    ports
        .into_iter()
        .filter(|_p| {
            #[cfg(target_os = "macos")]
            {
                !_p.port_name.starts_with("/dev/tty.")
            }
            #[cfg(not(target_os = "macos"))]
            {
                true
            }
        })
        .map(|p| {
            let (port_type, manufacturer, product, serial_number, vid, pid) = match p.port_type {
                serialport::SerialPortType::UsbPort(info) => (
                    "USB".to_string(),
                    info.manufacturer,
                    info.product,
                    info.serial_number,
                    Some(info.vid),
                    Some(info.pid),
                ),
                serialport::SerialPortType::BluetoothPort => {
                    ("Bluetooth".to_string(), None, None, None, None, None)
                }
                serialport::SerialPortType::PciPort => {
                    ("PCI".to_string(), None, None, None, None, None)
                }
                serialport::SerialPortType::Unknown => {
                    ("Unknown".to_string(), None, None, None, None, None)
                }
            };
            SerialPortInfo {
                port_name: PortIdentifier::new(p.port_name),
                port_type,
                manufacturer,
                product,
                serial_number,
                vid,
                pid,
            }
        })
        .collect()
}
