// src/io/serial/link.rs
//
// One exclusively owned serial connection to a P10-Link controller.
//
// Lifecycle is open -> zero or more sends -> close. Sends block until the
// driver accepts every byte or fails; nothing is retried here.

use std::io::{ErrorKind, Write};

use crate::error::P10Error;
use crate::frame::FrameBuffer;

use super::ports::PortIdentifier;
use super::utils::{port_builder, BAUD_RATE, LINE_FORMAT};

/// Handle to an opened (or not yet opened) serial device.
pub struct SerialLinkHandle {
    port: Option<PortIdentifier>,
    writer: Option<Box<dyn Write + Send>>,
}

impl Default for SerialLinkHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl SerialLinkHandle {
    /// A handle that was never opened. `send` on it fails with `NotOpen`.
    pub fn new() -> Self {
        Self {
            port: None,
            writer: None,
        }
    }

    /// Open `port` at 115200 8-N-1 with blocking writes.
    pub fn open(port: &PortIdentifier) -> Result<Self, P10Error> {
        let serial_port = port_builder(port.as_str())
            .open()
            .map_err(|e| P10Error::port_unavailable(port.as_str(), e.to_string()))?;

        tlog!("[serial] Opened {} (baud: {}, {})", port, BAUD_RATE, LINE_FORMAT);

        Ok(Self::from_writer(port.clone(), serial_port))
    }

    /// Wrap any byte sink (virtual device, pipe, in-memory buffer) as an open link.
    pub fn from_writer<W>(port: PortIdentifier, writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            port: Some(port),
            writer: Some(Box::new(writer)),
        }
    }

    pub fn is_open(&self) -> bool {
        self.writer.is_some()
    }

    /// Port this handle was opened on, kept after close for diagnostics
    pub fn port(&self) -> Option<&PortIdentifier> {
        self.port.as_ref()
    }

    /// Write the frame's raw bytes. Returns the byte count on success.
    ///
    /// Fails with `NotOpen` without writing anything if the handle is not open,
    /// with `ShortWrite` if the driver accepted fewer bytes than the frame holds,
    /// and with `FlushFailed` if every byte was accepted but could not be drained.
    pub fn send(&mut self, frame: &FrameBuffer) -> Result<usize, P10Error> {
        let Self { port, writer } = self;
        let writer = match writer.as_mut() {
            Some(w) => w,
            None => {
                return Err(P10Error::NotOpen {
                    port: port.as_ref().map(|p| p.to_string()),
                })
            }
        };
        let port_name = port
            .as_ref()
            .map(|p| p.to_string())
            .unwrap_or_else(|| "<unnamed>".to_string());

        let data = frame.to_bytes();
        let (written, failure) = write_counted(&mut **writer, &data);

        if written != data.len() || failure.is_some() {
            tlog!(
                "[serial] Short write on {}: {} of {} bytes",
                port_name,
                written,
                data.len()
            );
            return Err(P10Error::ShortWrite {
                port: port_name,
                expected: data.len(),
                written,
                reason: failure.map(|e| e.to_string()),
            });
        }

        // Every byte was accepted; a failure here is the driver failing to drain
        if let Err(e) = writer.flush() {
            tlog!("[serial] Flush failed on {}: {}", port_name, e);
            return Err(P10Error::FlushFailed {
                port: port_name,
                written,
                reason: e.to_string(),
            });
        }

        Ok(written)
    }

    /// Release the port. Safe on a closed or never-opened handle.
    pub fn close(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
            if let Some(port) = &self.port {
                tlog!("[serial] Closed {}", port);
            }
        }
    }
}

impl Drop for SerialLinkHandle {
    fn drop(&mut self) {
        self.close();
    }
}

/// Write as much of `data` as the sink accepts, retrying only on `Interrupted`.
/// Returns the accepted byte count and the error that stopped the write, if any.
fn write_counted(writer: &mut dyn Write, data: &[u8]) -> (usize, Option<std::io::Error>) {
    let mut written = 0;
    while written < data.len() {
        match writer.write(&data[written..]) {
            Ok(0) => break,
            Ok(n) => written += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return (written, Some(e)),
        }
    }
    (written, None)
}
