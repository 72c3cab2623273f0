// src/io/serial/mod.rs
//
// Serial transport for P10-Link frames.
// Lists host serial devices, opens one at fixed 115200 8-N-1 settings and
// writes raw frame bytes.

pub mod link;
pub mod ports;
pub(crate) mod utils;

pub use link::SerialLinkHandle;
pub use ports::{list_ports, PortIdentifier, SerialPortInfo};
pub use utils::{BAUD_RATE, LINE_FORMAT};
