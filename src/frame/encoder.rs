// src/frame/encoder.rs
//
// P10 RAM frame encoder.
//
// Conversion runs in three steps:
//   A. pack each row into 4 bytes, 8 columns per byte, first column at bit 7
//   B. store source row r at intermediate row 15 - r (controller scans bottom-up)
//   C. assemble 16 lines of 4 bytes; row group g is the outer loop, plane
//      (block column) 3..=0 the inner loop, and each line takes intermediate
//      rows 15-g, 11-g, 7-g, 3-g from that plane
//
// The byte order of step C is the binary contract with the controller firmware.

use crate::error::P10Error;

use super::buffer::{FrameBuffer, FRAME_BYTES};
use super::grid::{check_shape, PixelGrid, COLS, ROWS};

/// Pixels packed into one byte
pub const BLOCK_WIDTH: usize = 8;
/// Byte columns per row
pub const BLOCKS: usize = COLS / BLOCK_WIDTH;
/// Row groups in the RAM layout
pub const ROW_GROUPS: usize = 4;
/// Rows combined into one assembled line
pub const ROWS_PER_LINE: usize = ROWS / ROW_GROUPS;

/// Pack 8 pixels into a byte, first pixel in the most significant bit.
pub fn pack_byte(bits: &[bool; BLOCK_WIDTH]) -> u8 {
    bits.iter().fold(0u8, |acc, &bit| (acc << 1) | bit as u8)
}

/// Inverse of [`pack_byte`].
pub fn unpack_byte(byte: u8) -> [bool; BLOCK_WIDTH] {
    let mut bits = [false; BLOCK_WIDTH];
    for (i, bit) in bits.iter_mut().enumerate() {
        *bit = byte & (0x80 >> i) != 0;
    }
    bits
}

/// Packed bytes in controller scan order: row 0 is the bottom display row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HexByteMatrix {
    bytes: [[u8; BLOCKS]; ROWS],
}

impl HexByteMatrix {
    /// Steps A and B
    pub fn from_grid(grid: &PixelGrid) -> Self {
        let mut bytes = [[0u8; BLOCKS]; ROWS];

        for (row, cells) in grid.rows().iter().enumerate() {
            for (block, chunk) in cells.chunks_exact(BLOCK_WIDTH).enumerate() {
                let mut bits = [false; BLOCK_WIDTH];
                bits.copy_from_slice(chunk);
                bytes[ROWS - 1 - row][block] = pack_byte(&bits);
            }
        }

        Self { bytes }
    }

    /// Build from dynamically sized rows, failing unless exactly 16x4.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, P10Error> {
        let actual_cols = rows
            .iter()
            .map(|r| r.as_ref().len())
            .find(|&len| len != BLOCKS)
            .unwrap_or(BLOCKS);
        if rows.len() != ROWS || actual_cols != BLOCKS {
            return Err(P10Error::malformed_intermediate(
                (ROWS, BLOCKS),
                (rows.len(), actual_cols),
            ));
        }

        let mut bytes = [[0u8; BLOCKS]; ROWS];
        for (dst, src) in bytes.iter_mut().zip(rows) {
            dst.copy_from_slice(src.as_ref());
        }
        Ok(Self { bytes })
    }

    pub fn byte_at(&self, row: usize, block: usize) -> Option<u8> {
        self.bytes.get(row).and_then(|r| r.get(block)).copied()
    }

    /// Two uppercase hex characters for one cell
    pub fn hex_at(&self, row: usize, block: usize) -> Option<String> {
        self.byte_at(row, block).map(|b| format!("{:02X}", b))
    }

    pub fn rows(&self) -> &[[u8; BLOCKS]; ROWS] {
        &self.bytes
    }

    /// Step C
    pub fn assemble(&self) -> FrameBuffer {
        let mut out = [0u8; FRAME_BYTES];

        for (pos, (line, plane, k)) in line_layout().enumerate() {
            out[pos] = self.bytes[intermediate_row(line, k)][plane];
        }

        FrameBuffer::from_bytes(&out)
    }

    /// Inverse of [`HexByteMatrix::assemble`]
    pub fn disassemble(frame: &FrameBuffer) -> Self {
        let raw = frame.to_array();
        let mut bytes = [[0u8; BLOCKS]; ROWS];

        for (pos, (line, plane, k)) in line_layout().enumerate() {
            bytes[intermediate_row(line, k)][plane] = raw[pos];
        }

        Self { bytes }
    }

    /// Inverse of steps A and B
    pub fn to_grid(&self) -> PixelGrid {
        let mut grid = PixelGrid::new();
        for (irow, blocks) in self.bytes.iter().enumerate() {
            let row = ROWS - 1 - irow;
            for (block, &byte) in blocks.iter().enumerate() {
                for (i, on) in unpack_byte(byte).into_iter().enumerate() {
                    grid.set(row, block * BLOCK_WIDTH + i, on);
                }
            }
        }
        grid
    }
}

/// Plane (block column) feeding a given assembled line
pub fn line_plane(line: usize) -> usize {
    BLOCKS - 1 - line % BLOCKS
}

/// Row group of a given assembled line
pub fn line_row_group(line: usize) -> usize {
    line / BLOCKS
}

/// Intermediate row supplying byte `k` (0..4) of an assembled line
fn intermediate_row(line: usize, k: usize) -> usize {
    ROWS - 1 - line_row_group(line) - ROW_GROUPS * k
}

/// (line, plane, position-in-line) for every output byte, in wire order
fn line_layout() -> impl Iterator<Item = (usize, usize, usize)> {
    (0..ROW_GROUPS * BLOCKS)
        .flat_map(|line| (0..ROWS_PER_LINE).map(move |k| (line, line_plane(line), k)))
}

/// Encode a grid into the controller's RAM frame.
pub fn encode(grid: &PixelGrid) -> FrameBuffer {
    HexByteMatrix::from_grid(grid).assemble()
}

/// Validate dynamically shaped rows, then encode.
/// Fails with `ShapeMismatch` for anything other than 16x32.
pub fn encode_rows<R: AsRef<[bool]>>(rows: &[R]) -> Result<FrameBuffer, P10Error> {
    check_shape(rows, "encode")?;
    let grid = PixelGrid::from_rows(rows)?;
    Ok(encode(&grid))
}

/// Recover the pixel grid from a frame.
pub fn decode(frame: &FrameBuffer) -> PixelGrid {
    HexByteMatrix::disassemble(frame).to_grid()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::buffer::FRAME_HEX_LEN;
    use proptest::prelude::*;

    fn single_pixel(row: usize, col: usize) -> PixelGrid {
        let mut grid = PixelGrid::new();
        grid.set(row, col, true);
        grid
    }

    /// Hex character offsets of every byte that differs from "00"
    fn nonzero_bytes(frame: &FrameBuffer) -> Vec<(usize, String)> {
        frame
            .as_hex()
            .as_bytes()
            .chunks(2)
            .enumerate()
            .filter(|(_, pair)| *pair != b"00")
            .map(|(i, pair)| (i, String::from_utf8_lossy(pair).into_owned()))
            .collect()
    }

    #[test]
    fn test_pack_byte_msb_first() {
        let mut bits = [false; 8];
        bits[0] = true;
        assert_eq!(pack_byte(&bits), 0x80);

        let bits = [false, false, false, false, true, true, true, true];
        assert_eq!(pack_byte(&bits), 0x0F);

        let bits = [true, false, true, false, false, false, true, true];
        assert_eq!(pack_byte(&bits), 0xA3);
    }

    #[test]
    fn test_all_off_frame() {
        let frame = encode(&PixelGrid::new());
        assert_eq!(frame.as_hex().len(), FRAME_HEX_LEN);
        assert!(frame.as_hex().chars().all(|c| c == '0'));
    }

    #[test]
    fn test_all_on_frame() {
        let frame = encode(&PixelGrid::filled());
        assert_eq!(frame.as_hex(), "F".repeat(FRAME_HEX_LEN));
    }

    #[test]
    fn test_row_reversal_in_intermediate() {
        let matrix = HexByteMatrix::from_grid(&single_pixel(0, 0));
        assert_eq!(matrix.hex_at(15, 0).as_deref(), Some("80"));
        assert_eq!(matrix.hex_at(0, 0).as_deref(), Some("00"));

        let matrix = HexByteMatrix::from_grid(&single_pixel(15, 0));
        assert_eq!(matrix.hex_at(0, 0).as_deref(), Some("80"));
        assert_eq!(matrix.hex_at(16, 0), None);
    }

    #[test]
    fn test_top_left_pixel_position() {
        // Intermediate row 15 leads row group 0; plane 0 is the fourth line of that group
        let frame = encode(&single_pixel(0, 0));
        assert_eq!(nonzero_bytes(&frame), vec![(12, "80".to_string())]);
        let lines: Vec<&str> = frame.lines().collect();
        assert_eq!(lines[3], "80000000");
    }

    #[test]
    fn test_bottom_left_pixel_position() {
        // Intermediate row 0 closes row group 3 (rows 12, 8, 4, 0), plane 0 line
        let frame = encode(&single_pixel(15, 0));
        assert_eq!(nonzero_bytes(&frame), vec![(63, "80".to_string())]);
        assert_eq!(&frame.as_hex()[126..128], "80");
        let lines: Vec<&str> = frame.lines().collect();
        assert_eq!(lines[15], "00000080");
    }

    #[test]
    fn test_rightmost_block_leads_each_group() {
        // Column 31 is bit 0 of block 3; plane 3 is the first line of each group
        let frame = encode(&single_pixel(0, 31));
        assert_eq!(nonzero_bytes(&frame), vec![(0, "01".to_string())]);

        // Source row 4 -> intermediate row 11 -> row group 0, second byte
        let frame = encode(&single_pixel(4, 24));
        assert_eq!(nonzero_bytes(&frame), vec![(1, "80".to_string())]);

        // Source row 1 -> intermediate row 14 -> row group 1, first byte of plane 3
        let frame = encode(&single_pixel(1, 24));
        assert_eq!(nonzero_bytes(&frame), vec![(16, "80".to_string())]);
    }

    #[test]
    fn test_line_layout_matches_controller_order() {
        let mut rows = vec![[0u8; BLOCKS]; ROWS];
        for (r, row) in rows.iter_mut().enumerate() {
            for (b, cell) in row.iter_mut().enumerate() {
                *cell = ((r << 2) | b) as u8;
            }
        }
        let matrix = HexByteMatrix::from_rows(&rows).unwrap();
        let frame = matrix.assemble();
        let lines: Vec<&str> = frame.lines().collect();

        let cell = |r: usize, b: usize| format!("{:02X}", (r << 2) | b);
        assert_eq!(lines[0], format!("{}{}{}{}", cell(15, 3), cell(11, 3), cell(7, 3), cell(3, 3)));
        assert_eq!(lines[3], format!("{}{}{}{}", cell(15, 0), cell(11, 0), cell(7, 0), cell(3, 0)));
        assert_eq!(lines[4], format!("{}{}{}{}", cell(14, 3), cell(10, 3), cell(6, 3), cell(2, 3)));
        assert_eq!(lines[15], format!("{}{}{}{}", cell(12, 0), cell(8, 0), cell(4, 0), cell(0, 0)));
    }

    #[test]
    fn test_encode_rows_shape_mismatch() {
        let rows = vec![vec![false; COLS]; 15];
        assert!(matches!(
            encode_rows(&rows),
            Err(P10Error::ShapeMismatch { stage: "encode", actual_rows: 15, actual_cols: 32, .. })
        ));

        let rows = vec![vec![false; 31]; ROWS];
        assert!(matches!(
            encode_rows(&rows),
            Err(P10Error::ShapeMismatch { stage: "encode", actual_rows: 16, actual_cols: 31, .. })
        ));

        let rows = vec![vec![true; COLS]; ROWS];
        assert_eq!(encode_rows(&rows).unwrap(), encode(&PixelGrid::filled()));
    }

    #[test]
    fn test_malformed_intermediate() {
        let rows = vec![vec![0u8; BLOCKS]; ROWS - 1];
        assert!(matches!(
            HexByteMatrix::from_rows(&rows),
            Err(P10Error::MalformedIntermediate { actual_rows: 15, actual_cols: 4, .. })
        ));

        let rows = vec![vec![0u8; BLOCKS + 1]; ROWS];
        assert!(matches!(
            HexByteMatrix::from_rows(&rows),
            Err(P10Error::MalformedIntermediate { actual_rows: 16, actual_cols: 5, .. })
        ));
    }

    #[test]
    fn test_line_plane_and_group() {
        assert_eq!(line_plane(0), 3);
        assert_eq!(line_plane(3), 0);
        assert_eq!(line_plane(4), 3);
        assert_eq!(line_row_group(3), 0);
        assert_eq!(line_row_group(15), 3);
    }

    proptest! {
        #[test]
        fn prop_pack_unpack_roundtrip(bits in proptest::array::uniform8(any::<bool>())) {
            prop_assert_eq!(unpack_byte(pack_byte(&bits)), bits);
        }

        #[test]
        fn prop_unpack_pack_roundtrip(byte in any::<u8>()) {
            prop_assert_eq!(pack_byte(&unpack_byte(byte)), byte);
        }

        #[test]
        fn prop_decode_inverts_encode(cells in proptest::collection::vec(any::<bool>(), ROWS * COLS)) {
            let rows: Vec<&[bool]> = cells.chunks(COLS).collect();
            let grid = PixelGrid::from_rows(&rows).unwrap();
            let frame = encode(&grid);
            prop_assert_eq!(frame.as_hex().len(), FRAME_HEX_LEN);
            prop_assert_eq!(decode(&frame), grid);
        }

        #[test]
        fn prop_single_pixel_touches_one_byte(row in 0..ROWS, col in 0..COLS) {
            let frame = encode(&single_pixel(row, col));
            let changed = nonzero_bytes(&frame);
            prop_assert_eq!(changed.len(), 1);
            prop_assert_eq!(frame.to_bytes()[changed[0].0].count_ones(), 1);
        }
    }
}
