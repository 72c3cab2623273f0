// src/frame/codec.rs
//
// Frame codec trait and the P10 RAM layout implementation.
//
// The trait lets a caller hold a controller layout without knowing its byte
// order. `RamFrameCodec` is the only layout the P10-Link controller accepts.

use crate::error::P10Error;

use super::buffer::FrameBuffer;
use super::encoder;
use super::grid::PixelGrid;

/// Trait for panel frame codecs.
///
/// Each controller layout implements this trait to turn a pixel pattern into
/// its wire frame and back.
pub trait FrameCodec {
    /// Pattern type the codec consumes
    type Pattern;

    /// Encoded frame ready for transmission
    type EncodedFrame;

    /// Encode a pattern for the controller.
    fn encode(pattern: &Self::Pattern) -> Result<Self::EncodedFrame, P10Error>;

    /// Recover the pattern from an encoded frame.
    fn decode(frame: &Self::EncodedFrame) -> Result<Self::Pattern, P10Error>;
}

/// P10-Link RAM frame codec (16x32 grid, 64-byte plane/row-group layout).
pub struct RamFrameCodec;

impl FrameCodec for RamFrameCodec {
    type Pattern = PixelGrid;
    type EncodedFrame = FrameBuffer;

    fn encode(grid: &PixelGrid) -> Result<FrameBuffer, P10Error> {
        Ok(encoder::encode(grid))
    }

    fn decode(frame: &FrameBuffer) -> Result<PixelGrid, P10Error> {
        Ok(encoder::decode(frame))
    }
}
