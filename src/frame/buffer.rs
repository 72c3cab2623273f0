// src/frame/buffer.rs
//
// Finished RAM frame, held as uppercase hex text and convertible to the raw
// bytes written on the wire.

use std::fmt;

use crate::error::P10Error;

/// Bytes in one frame (16x32 pixels, 8 pixels per byte)
pub const FRAME_BYTES: usize = 64;
/// Hex characters in one frame
pub const FRAME_HEX_LEN: usize = FRAME_BYTES * 2;
/// Assembled lines per frame (4 row groups x 4 planes)
pub const FRAME_LINES: usize = 16;
/// Hex characters per assembled line (4 bytes)
pub const LINE_HEX_LEN: usize = FRAME_HEX_LEN / FRAME_LINES;

/// Immutable controller frame. Always exactly 128 uppercase hex characters,
/// kept alongside the 64 bytes they spell.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FrameBuffer {
    hex: String,
    bytes: [u8; FRAME_BYTES],
}

impl FrameBuffer {
    /// Wrap raw frame bytes
    pub fn from_bytes(bytes: &[u8; FRAME_BYTES]) -> Self {
        Self {
            hex: hex::encode_upper(bytes),
            bytes: *bytes,
        }
    }

    /// Validate and normalise externally supplied hex text.
    /// Surrounding whitespace is ignored and lowercase digits are accepted.
    pub fn from_hex(text: &str) -> Result<Self, P10Error> {
        let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        if cleaned.len() != FRAME_HEX_LEN {
            return Err(P10Error::invalid_frame(format!(
                "expected {} hex characters, got {}",
                FRAME_HEX_LEN,
                cleaned.len()
            )));
        }
        if let Some(c) = cleaned.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(P10Error::invalid_frame(format!("non-hex character '{}'", c)));
        }
        let mut bytes = [0u8; FRAME_BYTES];
        hex::decode_to_slice(&cleaned, &mut bytes)
            .map_err(|e| P10Error::invalid_frame(e.to_string()))?;
        Ok(Self {
            hex: cleaned.to_ascii_uppercase(),
            bytes,
        })
    }

    pub fn as_hex(&self) -> &str {
        &self.hex
    }

    /// Raw payload, two hex characters per byte, high nibble first
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    /// Raw payload as a fixed-size array
    pub fn to_array(&self) -> [u8; FRAME_BYTES] {
        self.bytes
    }

    /// The 16 assembled 8-character lines, in transmission order
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        (0..FRAME_LINES).map(move |i| &self.hex[i * LINE_HEX_LEN..(i + 1) * LINE_HEX_LEN])
    }

    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }
}

impl fmt::Display for FrameBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex)
    }
}

impl AsRef<str> for FrameBuffer {
    fn as_ref(&self) -> &str {
        &self.hex
    }
}
