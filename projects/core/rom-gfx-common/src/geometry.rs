//! # Tile Geometry
//!
//! Fixed description of a tiled, bit-packed raster format, and the address mapping between
//! an image and its packed representation.
//!
//! ## Overview
//!
//! Console tile formats store images as a sequence of fixed-size tiles, laid out
//! top-to-bottom, left-to-right. [`TileGeometry`] captures the constants of one such format
//! (tile size, bit depth, palette shape). [`TileGrid`] is the geometry applied to a concrete
//! image size and answers "where does this tile/pixel live in the packed buffer".
//!
//! ## Packed Layout
//!
//! For an image of `tiles_x * tiles_y` tiles, tile `(x, y)` starts at byte
//! `(y * tiles_x + x) * tile_size_bytes`. Inside a tile, each pixel row occupies
//! `row_size_bytes` consecutive bytes:
//!
//! ```text
//! tile 0: [row 0][row 1] ... [row 7]
//! tile 1: [row 0][row 1] ... [row 7]
//! ...
//! ```

use crate::error::CodecError;
use crate::palette::PaletteLayout;
use core::iter::FusedIterator;

/// Immutable description of a tiled raster format.
///
/// Constructed once (usually from one of the associated constants) and passed explicitly
/// to every codec operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileGeometry {
    /// Tile width in pixels.
    pub tile_width: u32,
    /// Tile height in pixels.
    pub tile_height: u32,
    /// Bits used to store a single pixel.
    pub bits_per_pixel: u32,
    /// Number of entries in the palette.
    pub palette_colors: usize,
    /// Bytes per palette entry (3 for RGB).
    pub palette_entry_bytes: usize,
    /// Width in pixels used when the image size has to be guessed from the packed size.
    pub default_image_width: u32,
}

impl TileGeometry {
    /// Neo Geo Pocket Color 2BPP: 8x8 tiles, 2 bits per pixel, 4 RGB colours, 16 bytes per tile.
    pub const NGP_2BPP: Self = Self {
        tile_width: 8,
        tile_height: 8,
        bits_per_pixel: 2,
        palette_colors: 4,
        palette_entry_bytes: 3,
        default_image_width: 128,
    };

    /// Number of bytes occupied by one packed tile.
    ///
    /// ```
    /// use rom_gfx_common::TileGeometry;
    /// assert_eq!(TileGeometry::NGP_2BPP.tile_size_bytes(), 16);
    /// ```
    #[inline]
    pub const fn tile_size_bytes(&self) -> usize {
        self.tile_width as usize * self.tile_height as usize * self.bits_per_pixel as usize / 8
    }

    /// Number of bytes occupied by one packed row of a tile.
    #[inline]
    pub const fn row_size_bytes(&self) -> usize {
        self.tile_width as usize * self.bits_per_pixel as usize / 8
    }

    /// Number of pixels stored in one packed byte, 0 for a zero bit depth.
    #[inline]
    pub const fn pixels_per_byte(&self) -> u32 {
        match 8u32.checked_div(self.bits_per_pixel) {
            Some(pixels) => pixels,
            None => 0,
        }
    }

    /// Largest palette index representable at this bit depth.
    #[inline]
    pub const fn max_palette_index(&self) -> u8 {
        match 1u32.checked_shl(self.bits_per_pixel) {
            Some(colors) if colors <= 256 => (colors - 1) as u8,
            _ => u8::MAX,
        }
    }

    /// Number of whole tiles per row when using [`TileGeometry::default_image_width`].
    ///
    /// 0 if the tile width is 0.
    #[inline]
    pub const fn default_tiles_per_row(&self) -> u32 {
        match self.default_image_width.checked_div(self.tile_width) {
            Some(tiles) => tiles,
            None => 0,
        }
    }

    /// Whether tiles have a non-zero size in pixels and in packed bytes.
    #[inline]
    pub const fn has_tile_area(&self) -> bool {
        self.tile_width != 0 && self.tile_height != 0 && self.tile_size_bytes() != 0
    }

    /// Size and stride of the palette buffer a decoder hands to its palette provider.
    #[inline]
    pub const fn palette_layout(&self) -> PaletteLayout {
        PaletteLayout {
            colors: self.palette_colors,
            bytes_per_color: self.palette_entry_bytes,
        }
    }

    /// Maps an image size onto this geometry's tile grid.
    ///
    /// # Errors
    ///
    /// - [`CodecError::InvalidDimensions`] if either dimension is zero or not a multiple of
    ///   the tile size, or if the geometry's tiles are empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use rom_gfx_common::TileGeometry;
    ///
    /// let grid = TileGeometry::NGP_2BPP.tile_grid(128, 16).unwrap();
    /// assert_eq!(grid.tiles_x(), 16);
    /// assert_eq!(grid.tiles_y(), 2);
    /// assert_eq!(grid.packed_size(), 16 * 2 * 16);
    /// ```
    pub fn tile_grid(&self, width: u32, height: u32) -> Result<TileGrid, CodecError> {
        let invalid = || CodecError::InvalidDimensions {
            width,
            height,
            tile_width: self.tile_width,
            tile_height: self.tile_height,
        };

        if width == 0 || height == 0 || !self.has_tile_area() {
            return Err(invalid());
        }
        if width % self.tile_width != 0 || height % self.tile_height != 0 {
            return Err(invalid());
        }

        Ok(TileGrid {
            geometry: *self,
            tiles_x: width / self.tile_width,
            tiles_y: height / self.tile_height,
        })
    }
}

/// A [`TileGeometry`] applied to a specific, tile-aligned image size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileGrid {
    geometry: TileGeometry,
    tiles_x: u32,
    tiles_y: u32,
}

impl TileGrid {
    /// The geometry this grid was built from.
    #[inline]
    pub const fn geometry(&self) -> &TileGeometry {
        &self.geometry
    }

    /// Number of tiles horizontally.
    #[inline]
    pub const fn tiles_x(&self) -> u32 {
        self.tiles_x
    }

    /// Number of tiles vertically.
    #[inline]
    pub const fn tiles_y(&self) -> u32 {
        self.tiles_y
    }

    /// Total number of tiles in the image.
    #[inline]
    pub const fn tile_count(&self) -> usize {
        self.tiles_x as usize * self.tiles_y as usize
    }

    /// Image width in pixels.
    #[inline]
    pub const fn width(&self) -> u32 {
        self.tiles_x * self.geometry.tile_width
    }

    /// Image height in pixels.
    #[inline]
    pub const fn height(&self) -> u32 {
        self.tiles_y * self.geometry.tile_height
    }

    /// Size in bytes of the whole image when packed, with no tiles elided.
    #[inline]
    pub const fn packed_size(&self) -> usize {
        self.tile_count() * self.geometry.tile_size_bytes()
    }

    /// Row-major index of tile `(tile_x, tile_y)`.
    #[inline]
    pub const fn tile_index(&self, tile_x: u32, tile_y: u32) -> usize {
        tile_y as usize * self.tiles_x as usize + tile_x as usize
    }

    /// Byte offset of tile `(tile_x, tile_y)` in the packed buffer.
    #[inline]
    pub const fn tile_offset(&self, tile_x: u32, tile_y: u32) -> usize {
        self.tile_index(tile_x, tile_y) * self.geometry.tile_size_bytes()
    }

    /// Byte offset in the packed buffer of the row that holds pixel `(x, y)`.
    ///
    /// Rows are the smallest addressable unit; where a pixel sits inside its row is up to
    /// the format's bit order. Returns [`None`] if the pixel lies outside the image.
    pub fn packed_row_offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width() || y >= self.height() {
            return None;
        }

        let geometry = &self.geometry;
        let tile_offset = self.tile_offset(x / geometry.tile_width, y / geometry.tile_height);
        let row_offset = (y % geometry.tile_height) as usize * geometry.row_size_bytes();
        Some(tile_offset + row_offset)
    }

    /// Iterates tile coordinates in packed order: `y` outer, `x` inner.
    pub fn tiles(&self) -> TileCoords {
        TileCoords {
            tiles_x: self.tiles_x,
            tiles_y: self.tiles_y,
            next: 0,
        }
    }
}

/// Row-major iterator over the `(tile_x, tile_y)` coordinates of a [`TileGrid`].
#[derive(Debug, Clone)]
pub struct TileCoords {
    tiles_x: u32,
    tiles_y: u32,
    next: usize,
}

impl Iterator for TileCoords {
    type Item = (u32, u32);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let total = self.tiles_x as usize * self.tiles_y as usize;
        if self.next >= total {
            return None;
        }

        let tiles_x = self.tiles_x as usize;
        let coords = ((self.next % tiles_x) as u32, (self.next / tiles_x) as u32);
        self.next += 1;
        Some(coords)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.tiles_x as usize * self.tiles_y as usize).saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TileCoords {}
impl FusedIterator for TileCoords {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[test]
    fn ngp_2bpp_constants() {
        let geometry = TileGeometry::NGP_2BPP;
        assert_eq!(geometry.tile_size_bytes(), 16);
        assert_eq!(geometry.row_size_bytes(), 2);
        assert_eq!(geometry.pixels_per_byte(), 4);
        assert_eq!(geometry.max_palette_index(), 3);
        assert_eq!(geometry.default_tiles_per_row(), 16);
        assert_eq!(geometry.palette_layout().size_bytes(), 12);
    }

    #[rstest]
    #[case(8, 8)]
    #[case(16, 8)]
    #[case(8, 24)]
    #[case(128, 64)]
    #[case(256, 256)]
    #[case(1024, 8)]
    fn packed_size_matches_tile_count(#[case] width: u32, #[case] height: u32) {
        let grid = TileGeometry::NGP_2BPP.tile_grid(width, height).unwrap();
        assert_eq!(grid.tiles_x(), width / 8);
        assert_eq!(grid.tiles_y(), height / 8);
        assert_eq!(
            grid.packed_size(),
            (width / 8) as usize * (height / 8) as usize * 16
        );
        assert_eq!(grid.width(), width);
        assert_eq!(grid.height(), height);
    }

    #[rstest]
    #[case(0, 8)]
    #[case(8, 0)]
    #[case(0, 0)]
    #[case(12, 8)]
    #[case(8, 7)]
    fn tile_grid_rejects_invalid_dimensions(#[case] width: u32, #[case] height: u32) {
        let result = TileGeometry::NGP_2BPP.tile_grid(width, height);
        assert_eq!(
            result,
            Err(CodecError::InvalidDimensions {
                width,
                height,
                tile_width: 8,
                tile_height: 8,
            })
        );
    }

    #[rstest]
    #[case(TileGeometry { tile_width: 0, ..TileGeometry::NGP_2BPP })]
    #[case(TileGeometry { tile_height: 0, ..TileGeometry::NGP_2BPP })]
    #[case(TileGeometry { bits_per_pixel: 0, ..TileGeometry::NGP_2BPP })]
    fn empty_tiles_never_form_a_grid(#[case] geometry: TileGeometry) {
        assert!(!geometry.has_tile_area());
        assert!(matches!(
            geometry.tile_grid(64, 64),
            Err(CodecError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn degenerate_geometry_helpers_do_not_divide_by_zero() {
        let geometry = TileGeometry {
            tile_width: 0,
            bits_per_pixel: 0,
            ..TileGeometry::NGP_2BPP
        };
        assert_eq!(geometry.default_tiles_per_row(), 0);
        assert_eq!(geometry.pixels_per_byte(), 0);
        assert_eq!(geometry.max_palette_index(), 0);
        assert_eq!(geometry.tile_size_bytes(), 0);

        let wide = TileGeometry {
            bits_per_pixel: 32,
            ..TileGeometry::NGP_2BPP
        };
        assert_eq!(wide.max_palette_index(), u8::MAX);
    }

    #[test]
    fn tiles_iterate_row_major() {
        let grid = TileGeometry::NGP_2BPP.tile_grid(24, 16).unwrap();
        let coords: Vec<(u32, u32)> = grid.tiles().collect();
        assert_eq!(
            coords,
            vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]
        );
        assert_eq!(grid.tiles().len(), 6);
    }

    #[rstest]
    #[case(0, 0, Some(0))] // first row of first tile
    #[case(4, 0, Some(0))] // same row, other half of the word
    #[case(7, 1, Some(2))] // row 1
    #[case(8, 0, Some(16))] // first row of tile (1, 0)
    #[case(0, 8, Some(32))] // first row of tile (0, 1)
    #[case(15, 15, Some(62))] // last row of last tile
    #[case(16, 0, None)]
    #[case(0, 16, None)]
    fn packed_row_offset_maps_pixels_to_rows(
        #[case] x: u32,
        #[case] y: u32,
        #[case] expected: Option<usize>,
    ) {
        let grid = TileGeometry::NGP_2BPP.tile_grid(16, 16).unwrap();
        assert_eq!(grid.packed_row_offset(x, y), expected);
    }

    #[test]
    fn tile_offset_is_index_times_tile_size() {
        let grid = TileGeometry::NGP_2BPP.tile_grid(32, 16).unwrap();
        assert_eq!(grid.tile_index(3, 1), 7);
        assert_eq!(grid.tile_offset(3, 1), 7 * 16);
    }
}
