//! NGP 2BPP tile data to pixel buffer.
//!
//! Tiles are read top-to-bottom, left-to-right; each tile row is one 16-bit word.
//! Packed data that runs out before the image is full is not an error: from that point on
//! every pixel is written as transparent, and no further bytes are read.

use crate::row::{ensure_word_rows, read_row_word, unpack_row_word};
use crate::settings::Ngp2bppDecodeSettings;
use likely_stable::unlikely;
use rom_gfx_common::{
    CodecError, ImageDimensions, InvalidInputError, PixelBuffer, PixelRowMut, SurplusTail,
    TileGeometry, TileGrid,
};

/// Output of [`decode_ngp_2bpp`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// The unpacked image, exactly as large as requested.
    pub pixels: PixelBuffer,
    /// Bytes past the last tile that was decoded, kept verbatim for re-encoding.
    pub surplus: SurplusTail,
    /// Number of tiles filled with transparent pixels because the packed data ran out.
    pub truncated_tiles: usize,
}

/// Whether packed data is still available while walking the tile grid.
///
/// Once [`TruncationState::Truncated`] is reached it is kept until the end of the decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TruncationState {
    /// Rows are read from the packed buffer.
    Active,
    /// The packed buffer is exhausted; rows are filled with transparent pixels.
    Truncated,
}

impl TruncationState {
    /// State for the next row, given `remaining` unread bytes and `row_size` bytes per row.
    #[inline(always)]
    pub fn advance(self, remaining: usize, row_size: usize) -> Self {
        match self {
            Self::Active if unlikely(remaining < row_size) => Self::Truncated,
            state => state,
        }
    }
}

/// Decodes NGP 2BPP tile data into a pixel buffer of the requested size.
///
/// # Parameters
///
/// - `packed`: The packed tile data
/// - `dimensions`: Size of the image to produce; both sides must be multiples of the tile size
/// - `geometry`: The tile geometry, normally [`TileGeometry::NGP_2BPP`]
/// - `settings`: Decode settings
///
/// # Returns
///
/// The decoded pixels, plus any bytes of `packed` past the last tile the image holds.
/// If `packed` holds fewer tiles than the image, the remaining tiles are transparent.
///
/// # Errors
///
/// - [`InvalidInputError::EmptyPackedBuffer`] if `packed` is empty
/// - [`InvalidInputError::ZeroDimensions`] if the width or height is 0
/// - [`InvalidInputError::UnsupportedGeometry`] if a tile row is not 8 pixels at 2bpp
/// - [`CodecError::InvalidDimensions`] if the dimensions are not tile-aligned
/// - [`CodecError::AllocationFailure`] if the output cannot be allocated
///
/// # Examples
///
/// ```
/// use rom_gfx_ngp2bpp::{decode_ngp_2bpp, ImageDimensions, Ngp2bppDecodeSettings, TileGeometry};
///
/// // One tile whose first row is `[3, 3, 3, 0, 0, 0, 0, 0]`, plus 2 trailing bytes.
/// let mut packed = vec![0u8; 18];
/// packed[1] = 0xFC;
///
/// let decoded = decode_ngp_2bpp(
///     &packed,
///     ImageDimensions::new(8, 8),
///     &TileGeometry::NGP_2BPP,
///     Ngp2bppDecodeSettings::default(),
/// )
/// .unwrap();
///
/// assert_eq!(decoded.pixels.index_at(2, 0), Some(3));
/// assert_eq!(decoded.pixels.index_at(3, 0), Some(0));
/// assert_eq!(decoded.surplus.len(), 2);
/// ```
pub fn decode_ngp_2bpp(
    packed: &[u8],
    dimensions: ImageDimensions,
    geometry: &TileGeometry,
    settings: Ngp2bppDecodeSettings,
) -> Result<DecodedImage, CodecError> {
    let DecodeJob {
        grid,
        payload,
        surplus,
        mut pixels,
    } = DecodeJob::prepare(packed, dimensions, geometry, settings)?;

    let row_size = geometry.row_size_bytes();
    let mut state = TruncationState::Active;
    let mut offset = 0;

    for mut band in pixels.tile_bands_mut(&grid) {
        let tile_y = band.tile_y();
        for tile_x in 0..grid.tiles_x() {
            for row in 0..geometry.tile_height {
                let next = state.advance(payload.len() - offset, row_size);
                if next != state {
                    log::trace!(
                        "Packed data ends at tile ({tile_x}, {tile_y}), byte {offset}; filling the rest with transparent pixels"
                    );
                }
                state = next;

                let mut cursor = band.row_mut(tile_x, row);
                match state {
                    TruncationState::Active => {
                        decode_row(&mut cursor, Some(&payload[offset..offset + row_size]));
                        offset += row_size;
                    }
                    TruncationState::Truncated => decode_row(&mut cursor, None),
                }
            }
        }
    }

    Ok(finish(pixels, surplus, &grid, payload.len()))
}

/// Decodes NGP 2BPP tile data, unpacking bands of tiles on the rayon thread pool.
///
/// Produces exactly the same output as [`decode_ngp_2bpp`]. The point where the packed data
/// runs out is computed from its length before any band is dispatched.
///
/// # Errors
///
/// Same as [`decode_ngp_2bpp`].
#[cfg(feature = "multithreaded")]
pub fn decode_ngp_2bpp_parallel(
    packed: &[u8],
    dimensions: ImageDimensions,
    geometry: &TileGeometry,
    settings: Ngp2bppDecodeSettings,
) -> Result<DecodedImage, CodecError> {
    use rayon::prelude::*;
    use rom_gfx_common::TileBandMut;

    let DecodeJob {
        grid,
        payload,
        surplus,
        mut pixels,
    } = DecodeJob::prepare(packed, dimensions, geometry, settings)?;

    let tile_size = geometry.tile_size_bytes();
    let row_size = geometry.row_size_bytes();
    let available_tiles = payload.len() / tile_size;
    let band_len = PixelBuffer::band_len(&grid, settings.layout);

    pixels
        .as_mut_bytes()
        .par_chunks_mut(band_len)
        .enumerate()
        .for_each(|(tile_y, bytes)| {
            let tile_y = tile_y as u32;
            let mut band = TileBandMut::from_band_bytes(bytes, &grid, tile_y, settings.layout);
            for tile_x in 0..grid.tiles_x() {
                let tile = (grid.tile_index(tile_x, tile_y) < available_tiles).then(|| {
                    let start = grid.tile_offset(tile_x, tile_y);
                    &payload[start..start + tile_size]
                });

                for row in 0..geometry.tile_height {
                    let row_bytes = tile.map(|tile| {
                        let start = row as usize * row_size;
                        &tile[start..start + row_size]
                    });
                    decode_row(&mut band.row_mut(tile_x, row), row_bytes);
                }
            }
        });

    Ok(finish(pixels, surplus, &grid, payload.len()))
}

/// Validated inputs and freshly allocated output of a decode call.
struct DecodeJob<'a> {
    grid: TileGrid,
    payload: &'a [u8],
    surplus: SurplusTail,
    pixels: PixelBuffer,
}

impl<'a> DecodeJob<'a> {
    fn prepare(
        packed: &'a [u8],
        dimensions: ImageDimensions,
        geometry: &TileGeometry,
        settings: Ngp2bppDecodeSettings,
    ) -> Result<Self, CodecError> {
        if packed.is_empty() {
            return Err(InvalidInputError::EmptyPackedBuffer.into());
        }
        if dimensions.width == 0 || dimensions.height == 0 {
            return Err(CodecError::zero_dimensions(
                dimensions.width,
                dimensions.height,
            ));
        }
        ensure_word_rows(geometry)?;

        let grid = geometry.tile_grid(dimensions.width, dimensions.height)?;
        let (payload, surplus) = SurplusTail::split(&grid, packed)?;
        let pixels = PixelBuffer::new(dimensions.width, dimensions.height, settings.layout)?;
        Ok(Self {
            grid,
            payload,
            surplus,
            pixels,
        })
    }
}

/// Writes one tile row: unpacked from `row_bytes`, or transparent if there is no data.
#[inline(always)]
fn decode_row(cursor: &mut PixelRowMut<'_>, row_bytes: Option<&[u8]>) {
    match row_bytes {
        Some(bytes) => {
            let layout = cursor.layout();
            let indices = unpack_row_word(read_row_word(bytes));
            for (pixel, index) in cursor.pixels_mut().zip(indices) {
                layout.write_opaque(pixel, index);
            }
        }
        None => cursor.fill_transparent(),
    }
}

fn finish(
    pixels: PixelBuffer,
    surplus: SurplusTail,
    grid: &TileGrid,
    payload_len: usize,
) -> DecodedImage {
    let decoded_tiles = payload_len / grid.geometry().tile_size_bytes();
    let truncated_tiles = grid.tile_count() - decoded_tiles;
    log::debug!(
        "Decoded {decoded_tiles} of {} tiles into {}x{} pixels ({truncated_tiles} transparent filler tiles, {} surplus bytes)",
        grid.tile_count(),
        pixels.width(),
        pixels.height(),
        surplus.len()
    );

    DecodedImage {
        pixels,
        surplus,
        truncated_tiles,
    }
}
