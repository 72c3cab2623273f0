// src/io/serial/utils.rs
//
// Line settings for the P10-Link controller. The controller only speaks
// 115200 8-N-1, so nothing here is configurable.

use std::time::Duration;

use serialport::{DataBits, FlowControl, Parity, SerialPortBuilder, StopBits};

/// Controller baud rate
pub const BAUD_RATE: u32 = 115_200;

/// Frame format shown in logs
pub const LINE_FORMAT: &str = "8N1";

/// serialport needs a finite timeout; this is long enough to act as a blocking write
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);

/// Builder for `port` at 115200 8-N-1, no flow control, blocking writes
pub fn port_builder(port: &str) -> SerialPortBuilder {
    serialport::new(port, BAUD_RATE)
        .data_bits(DataBits::Eight)
        .stop_bits(StopBits::One)
        .parity(Parity::None)
        .flow_control(FlowControl::None)
        .timeout(WRITE_TIMEOUT)
}
