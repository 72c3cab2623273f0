// src/lib.rs
//
// P10Link: converts 16x32 monochrome pixel patterns into the P10-Link
// controller's RAM frame and streams it over a serial link.

#[macro_use]
pub mod logging;

pub mod error;
pub mod frame;
pub mod io;
pub mod settings;

pub use error::P10Error;
pub use frame::{decode, encode, encode_rows, FrameBuffer, PixelGrid};
pub use io::{list_ports, PortIdentifier, SerialLinkHandle, SerialPortInfo};

/// Encode `grid` and write it to an already opened link.
pub fn send_grid(link: &mut SerialLinkHandle, grid: &PixelGrid) -> Result<FrameBuffer, P10Error> {
    let frame = encode(grid);
    link.send(&frame)?;
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct SharedSink(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for SharedSink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_send_grid_end_to_end() {
        let sink = Arc::new(Mutex::new(Vec::new()));
        let mut link = SerialLinkHandle::from_writer("virtual".into(), SharedSink(sink.clone()));

        let mut grid = PixelGrid::new();
        grid.set(15, 0, true);

        let frame = send_grid(&mut link, &grid).unwrap();
        assert_eq!(&frame.as_hex()[126..128], "80");

        let wire = sink.lock().unwrap().clone();
        assert_eq!(wire.len(), 64);
        assert_eq!(wire[63], 0x80);
        assert!(wire[..63].iter().all(|&b| b == 0));

        link.close();
        assert!(matches!(
            send_grid(&mut link, &grid),
            Err(P10Error::NotOpen { .. })
        ));
    }
}
