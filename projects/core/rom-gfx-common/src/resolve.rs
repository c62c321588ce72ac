//! Guessing image dimensions from a packed buffer's size.
//!
//! Raw ROM graphics carry no header, so the image size has to be derived from the number
//! of bytes alone. [`DefaultWidthResolver`] lays the tiles out in rows of
//! [`TileGeometry::default_image_width`] pixels; a last row that is only partially covered
//! by data decodes with transparent filler tiles.

use crate::error::CodecError;
use crate::geometry::TileGeometry;

/// Image size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageDimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageDimensions {
    /// Creates a new [`ImageDimensions`].
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Maps the length of a packed buffer to the tile-aligned size of the image it holds.
pub trait DimensionResolver {
    /// Returns the dimensions a packed buffer of `packed_len` bytes decodes to.
    ///
    /// # Errors
    ///
    /// - [`CodecError::InvalidDimensions`] if the buffer does not hold a single whole tile,
    ///   or the geometry's tiles are empty.
    fn resolve(
        &self,
        geometry: &TileGeometry,
        packed_len: usize,
    ) -> Result<ImageDimensions, CodecError>;
}

/// Lays tiles out in rows of [`TileGeometry::default_image_width`] pixels.
///
/// - Fewer tiles than fit in one row: a single row exactly as wide as the tiles present.
/// - Otherwise: full-width rows, rounding the row count up.
///
/// # Examples
///
/// ```
/// use rom_gfx_common::{DefaultWidthResolver, DimensionResolver, ImageDimensions, TileGeometry};
///
/// // 20 tiles at 16 tiles per row: 2 rows, the second one partially filled.
/// let dimensions = DefaultWidthResolver.resolve(&TileGeometry::NGP_2BPP, 20 * 16).unwrap();
/// assert_eq!(dimensions, ImageDimensions::new(128, 16));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultWidthResolver;

impl DimensionResolver for DefaultWidthResolver {
    fn resolve(
        &self,
        geometry: &TileGeometry,
        packed_len: usize,
    ) -> Result<ImageDimensions, CodecError> {
        let invalid = || CodecError::InvalidDimensions {
            width: 0,
            height: 0,
            tile_width: geometry.tile_width,
            tile_height: geometry.tile_height,
        };
        if !geometry.has_tile_area() {
            return Err(invalid());
        }

        let tiles = packed_len / geometry.tile_size_bytes();
        let tiles_per_row = geometry.default_tiles_per_row().max(1) as usize;
        if tiles == 0 {
            return Err(invalid());
        }

        // Images too large to describe in u32 pixels are rejected like empty ones.
        let (tiles_x, tiles_y) = if tiles < tiles_per_row {
            (tiles, 1)
        } else {
            (tiles_per_row, tiles.div_ceil(tiles_per_row))
        };
        let pixels = |count: usize, tile_side: u32| {
            u32::try_from(count)
                .ok()
                .and_then(|count| count.checked_mul(tile_side))
        };
        let dimensions = match (
            pixels(tiles_x, geometry.tile_width),
            pixels(tiles_y, geometry.tile_height),
        ) {
            (Some(width), Some(height)) => ImageDimensions::new(width, height),
            _ => return Err(invalid()),
        };

        log::debug!(
            "Resolved {packed_len} packed bytes ({tiles} tiles) to {}x{}",
            dimensions.width,
            dimensions.height
        );
        Ok(dimensions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[rstest]
    #[case(16, 8, 8)] // one tile
    #[case(16 * 3 + 5, 24, 8)] // three tiles and a partial one
    #[case(16 * 15, 120, 8)] // just under a full row
    #[case(16 * 16, 128, 8)] // exactly one row
    #[case(16 * 17, 128, 16)] // spills into a second row
    #[case(16 * 64, 128, 32)]
    #[case(16 * 64 + 15, 128, 32)]
    fn resolves_to_default_width_rows(
        #[case] packed_len: usize,
        #[case] width: u32,
        #[case] height: u32,
    ) {
        let dimensions = DefaultWidthResolver
            .resolve(&TileGeometry::NGP_2BPP, packed_len)
            .unwrap();
        assert_eq!(dimensions, ImageDimensions::new(width, height));
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(15)]
    fn less_than_a_tile_is_rejected(#[case] packed_len: usize) {
        let result = DefaultWidthResolver.resolve(&TileGeometry::NGP_2BPP, packed_len);
        assert!(matches!(result, Err(CodecError::InvalidDimensions { .. })));
    }

    #[rstest]
    #[case(TileGeometry { tile_width: 0, ..TileGeometry::NGP_2BPP })]
    #[case(TileGeometry { tile_height: 0, ..TileGeometry::NGP_2BPP })]
    #[case(TileGeometry { bits_per_pixel: 0, ..TileGeometry::NGP_2BPP })]
    fn empty_tile_geometry_is_rejected(#[case] geometry: TileGeometry) {
        let result = DefaultWidthResolver.resolve(&geometry, 16 * 64);
        assert!(matches!(result, Err(CodecError::InvalidDimensions { .. })));
    }

    #[test]
    fn oversized_image_is_rejected() {
        // Tiles 2^31 pixels tall: one row of them fits in u32, two rows do not.
        let geometry = TileGeometry {
            tile_height: u32::MAX / 2 + 1,
            bits_per_pixel: 1,
            tile_width: 1,
            default_image_width: 1,
            ..TileGeometry::NGP_2BPP
        };
        let tile_size = geometry.tile_size_bytes();
        assert!(DefaultWidthResolver.resolve(&geometry, tile_size).is_ok());

        let result = DefaultWidthResolver.resolve(&geometry, tile_size * 2);
        assert!(matches!(result, Err(CodecError::InvalidDimensions { .. })));
    }

    #[test]
    fn resolved_dimensions_are_tile_aligned() {
        let geometry = TileGeometry::NGP_2BPP;
        for packed_len in (0..2048).step_by(7).filter(|len| *len >= 16) {
            let dimensions = DefaultWidthResolver.resolve(&geometry, packed_len).unwrap();
            let grid = geometry
                .tile_grid(dimensions.width, dimensions.height)
                .unwrap();
            assert!(grid.tile_count() >= packed_len / 16);
        }
    }
}
