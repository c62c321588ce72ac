//! Pixel buffer to NGP 2BPP tile data.
//!
//! Tiles are packed in the same order the decoder reads them. Tiles whose 64 pixels are all
//! transparent can be dropped from the output; later tiles then move up, so the returned
//! buffer is always exactly as long as the data it holds.

use crate::row::{ensure_word_rows, pack_row_word, INDEX_MASK, PIXELS_PER_ROW};
use crate::settings::Ngp2bppEncodeSettings;
use alloc::vec::Vec;
use rom_gfx_common::allocate::allocate_with_capacity;
use rom_gfx_common::{CodecError, PixelBuffer, PixelRow, TileGeometry};

/// Output of [`encode_ngp_2bpp`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// Packed tile data, non-empty tiles only when elision is enabled.
    pub packed: Vec<u8>,
    /// Number of tiles whose pixels were all transparent.
    ///
    /// Counted whether or not those tiles were elided.
    pub empty_tiles: usize,
}

/// Encodes a pixel buffer into NGP 2BPP tile data.
///
/// Palette indices above 3 cannot be represented and are masked to their low 2 bits.
///
/// # Parameters
///
/// - `pixels`: The image to encode; both sides must be multiples of the tile size
/// - `geometry`: The tile geometry, normally [`TileGeometry::NGP_2BPP`]
/// - `settings`: Encode settings
///
/// # Returns
///
/// The packed data and the number of fully transparent tiles. With
/// [`Ngp2bppEncodeSettings::elide_transparent_tiles`] set, `packed.len()` is
/// `(tile count - empty_tiles) * 16`.
///
/// # Errors
///
/// - [`CodecError::InvalidDimensions`] if the image is not tile-aligned
/// - [`rom_gfx_common::InvalidInputError::UnsupportedGeometry`] if a tile row is not 8 pixels at 2bpp
/// - [`CodecError::AllocationFailure`] if the output cannot be allocated
///
/// # Examples
///
/// ```
/// use rom_gfx_ngp2bpp::{encode_ngp_2bpp, Ngp2bppEncodeSettings, PixelBuffer, PixelLayout, TileGeometry};
///
/// let pixels = PixelBuffer::from_raw(8, 8, PixelLayout::Indexed, vec![1u8; 64]).unwrap();
/// let encoded = encode_ngp_2bpp(&pixels, &TileGeometry::NGP_2BPP, Ngp2bppEncodeSettings::default()).unwrap();
///
/// assert_eq!(encoded.packed, vec![0x55u8; 16]);
/// assert_eq!(encoded.empty_tiles, 0);
/// ```
pub fn encode_ngp_2bpp(
    pixels: &PixelBuffer,
    geometry: &TileGeometry,
    settings: Ngp2bppEncodeSettings,
) -> Result<EncodedImage, CodecError> {
    ensure_word_rows(geometry)?;
    let grid = geometry.tile_grid(pixels.width(), pixels.height())?;

    let mut packed = allocate_with_capacity(grid.packed_size())?;
    let mut empty_tiles = 0;
    let mut masked_pixels = 0;

    for (tile_x, tile_y) in grid.tiles() {
        let tile_start = packed.len();
        let mut transparency = TileTransparency::new();

        for row in 0..geometry.tile_height {
            let cursor = pixels.tile_row(&grid, tile_x, tile_y, row);
            let (word, masked) = pack_row(&cursor, &mut transparency);
            masked_pixels += masked;
            packed.extend_from_slice(&word.to_le_bytes());
        }

        if transparency.all_transparent() {
            empty_tiles += 1;
            if settings.elide_transparent_tiles {
                packed.truncate(tile_start);
            }
        }
    }

    if masked_pixels > 0 {
        log::warn!(
            "{masked_pixels} pixels had palette indices above {} and were masked to 2 bits",
            geometry.max_palette_index()
        );
    }
    log::debug!(
        "Encoded {}x{} pixels into {} bytes ({} of {} tiles empty)",
        pixels.width(),
        pixels.height(),
        packed.len(),
        empty_tiles,
        grid.tile_count()
    );

    Ok(EncodedImage {
        packed,
        empty_tiles,
    })
}

/// Tracks whether every pixel of the current tile is transparent. Reset per tile.
#[derive(Debug, Clone, Copy)]
struct TileTransparency {
    all_transparent: bool,
}

impl TileTransparency {
    #[inline(always)]
    fn new() -> Self {
        Self {
            all_transparent: true,
        }
    }

    #[inline(always)]
    fn record(&mut self, transparent: bool) {
        self.all_transparent &= transparent;
    }

    #[inline(always)]
    fn all_transparent(self) -> bool {
        self.all_transparent
    }
}

/// Packs one tile row, returning the row word and the number of masked indices.
#[inline(always)]
fn pack_row(cursor: &PixelRow<'_>, transparency: &mut TileTransparency) -> (u16, usize) {
    let layout = cursor.layout();
    let mut indices = [0u8; PIXELS_PER_ROW];
    let mut masked = 0;

    for (index, pixel) in indices.iter_mut().zip(cursor.pixels()) {
        *index = layout.index(pixel);
        masked += usize::from(u16::from(*index) > INDEX_MASK);
        transparency.record(layout.is_transparent(pixel));
    }

    (pack_row_word(&indices), masked)
}
