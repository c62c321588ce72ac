//! Packing of a single 8-pixel tile row into its 16-bit word.
//!
//! Each row is stored as a little-endian `u16`. The leftmost pixel lives in the two most
//! significant bits, so the first byte on disk holds pixels 4-7 and the second pixels 0-3:
//!
//! ```text
//! word:   [p0][p1][p2][p3][p4][p5][p6][p7]   (2 bits each, p0 = bits 15..14)
//! bytes:  [p4 p5 p6 p7] [p0 p1 p2 p3]
//! ```

use rom_gfx_common::{CodecError, InvalidInputError, TileGeometry};

/// Pixels in one packed tile row.
pub const PIXELS_PER_ROW: usize = 8;

/// Bits per pixel of the format.
pub(crate) const BITS_PER_PIXEL: u32 = 2;

/// Mask selecting one pixel's palette index.
pub(crate) const INDEX_MASK: u16 = 0b11;

/// Rejects geometries whose tile rows are not one 16-bit word of 2bpp pixels.
pub(crate) fn ensure_word_rows(geometry: &TileGeometry) -> Result<(), CodecError> {
    if geometry.tile_width as usize != PIXELS_PER_ROW
        || geometry.bits_per_pixel != BITS_PER_PIXEL
        || geometry.tile_height == 0
    {
        return Err(InvalidInputError::UnsupportedGeometry {
            tile_width: geometry.tile_width,
            bits_per_pixel: geometry.bits_per_pixel,
        }
        .into());
    }

    Ok(())
}

/// Reads the row word stored in the first two bytes of `bytes`, low byte first.
#[inline(always)]
pub fn read_row_word(bytes: &[u8]) -> u16 {
    u16::from_le_bytes([bytes[0], bytes[1]])
}

/// Splits a row word into its 8 palette indices, left to right.
#[inline(always)]
pub fn unpack_row_word(mut word: u16) -> [u8; PIXELS_PER_ROW] {
    let mut indices = [0u8; PIXELS_PER_ROW];
    for index in indices.iter_mut() {
        *index = ((word >> 14) & INDEX_MASK) as u8;
        word <<= 2;
    }
    indices
}

/// Packs 8 palette indices (left to right) into a row word.
///
/// Only the low 2 bits of each index are kept.
#[inline(always)]
pub fn pack_row_word(indices: &[u8; PIXELS_PER_ROW]) -> u16 {
    indices
        .iter()
        .fold(0u16, |word, &index| (word << 2) | (u16::from(index) & INDEX_MASK))
}
