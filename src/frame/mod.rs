// src/frame/mod.rs
//
// Pixel grid to P10 controller frame conversion. Pure computation, no I/O.

pub mod buffer;
pub mod codec;
pub mod encoder;
pub mod grid;

pub use buffer::{FrameBuffer, FRAME_BYTES, FRAME_HEX_LEN};
pub use codec::{FrameCodec, RamFrameCodec};
pub use encoder::{decode, encode, encode_rows, pack_byte, unpack_byte, HexByteMatrix};
pub use grid::{PixelGrid, COLS, ROWS};
