//! # Pixel Buffers
//!
//! The unpacked, editor-side representation of an image: a rectangular grid storing one
//! palette index per pixel, optionally followed by an alpha byte.
//!
//! ## Memory Layout
//!
//! Pixels are stored in row-major order with a fixed per-pixel stride given by the
//! [`PixelLayout`]. For [`PixelLayout::IndexedAlpha`] a row looks like:
//!
//! ```text
//! [idx a][idx a][idx a] ...
//! ```
//!
//! ## Tile Access
//!
//! Codecs never address single pixels. They work one tile row at a time (8 consecutive
//! pixels) through [`PixelRow`] and [`PixelRowMut`], which are plain bounds-checked slices
//! walked with the layout's stride. [`TileBandMut`] splits the buffer into horizontal bands
//! one tile tall, so separate bands can be filled independently.

use crate::allocate::{allocate_zeroed, AllocateError};
use crate::error::{CodecError, InvalidInputError};
use crate::geometry::TileGrid;
use alloc::vec::Vec;
use core::slice::{ChunksExact, ChunksExactMut};
use derive_enum_all_values::AllValues;

/// Alpha value written for opaque pixels.
pub const OPAQUE_ALPHA: u8 = 0xFF;

/// Alpha value marking a pixel as transparent.
pub const TRANSPARENT_ALPHA: u8 = 0x00;

/// Per-pixel storage format of a [`PixelBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AllValues)]
pub enum PixelLayout {
    /// One byte per pixel: the palette index. Pixels are never transparent.
    Indexed,
    /// Two bytes per pixel: the palette index, then alpha.
    /// A pixel is transparent when its alpha is [`TRANSPARENT_ALPHA`].
    IndexedAlpha,
}

impl PixelLayout {
    /// Distance in bytes between consecutive pixels.
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Indexed => 1,
            Self::IndexedAlpha => 2,
        }
    }

    /// Whether this layout carries an alpha channel.
    #[inline]
    pub const fn has_alpha(self) -> bool {
        matches!(self, Self::IndexedAlpha)
    }

    /// Palette index stored in `pixel`.
    #[inline]
    pub fn index(self, pixel: &[u8]) -> u8 {
        pixel[0]
    }

    /// Whether `pixel` is marked transparent.
    #[inline]
    pub fn is_transparent(self, pixel: &[u8]) -> bool {
        match self {
            Self::Indexed => false,
            Self::IndexedAlpha => pixel[1] == TRANSPARENT_ALPHA,
        }
    }

    /// Writes an opaque pixel with palette index `index`.
    #[inline]
    pub fn write_opaque(self, pixel: &mut [u8], index: u8) {
        pixel[0] = index;
        if let Self::IndexedAlpha = self {
            pixel[1] = OPAQUE_ALPHA;
        }
    }

    /// Writes a transparent pixel.
    ///
    /// The palette index is irrelevant for transparent pixels and is set to 0. Layouts
    /// without alpha cannot express transparency and end up with index 0.
    #[inline]
    pub fn write_transparent(self, pixel: &mut [u8]) {
        pixel[0] = 0;
        if let Self::IndexedAlpha = self {
            pixel[1] = TRANSPARENT_ALPHA;
        }
    }
}

/// A rectangular, row-major grid of indexed pixels.
///
/// The buffer always holds exactly `width * height * layout.bytes_per_pixel()` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    layout: PixelLayout,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Allocates a zeroed buffer.
    ///
    /// Zeroed pixels have palette index 0 and, for [`PixelLayout::IndexedAlpha`], are transparent.
    ///
    /// # Errors
    ///
    /// - [`InvalidInputError::ZeroDimensions`] if `width` or `height` is 0.
    /// - [`CodecError::AllocationFailure`] if the buffer cannot be allocated or its size overflows.
    pub fn new(width: u32, height: u32, layout: PixelLayout) -> Result<Self, CodecError> {
        let len = Self::required_len(width, height, layout)?;
        Ok(Self {
            width,
            height,
            layout,
            data: allocate_zeroed(len)?,
        })
    }

    /// Wraps existing pixel data.
    ///
    /// Bytes past the required length are discarded.
    ///
    /// # Errors
    ///
    /// - [`InvalidInputError::ZeroDimensions`] if `width` or `height` is 0.
    /// - [`InvalidInputError::PixelBufferTooSmall`] if `data` is shorter than the dimensions require.
    /// - [`CodecError::AllocationFailure`] if the required length overflows `usize`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rom_gfx_common::{PixelBuffer, PixelLayout};
    ///
    /// let pixels = PixelBuffer::from_raw(8, 8, PixelLayout::Indexed, vec![3u8; 64]).unwrap();
    /// assert_eq!(pixels.index_at(7, 7), Some(3));
    /// ```
    pub fn from_raw(
        width: u32,
        height: u32,
        layout: PixelLayout,
        mut data: Vec<u8>,
    ) -> Result<Self, CodecError> {
        let len = Self::required_len(width, height, layout)?;
        if data.len() < len {
            return Err(InvalidInputError::PixelBufferTooSmall {
                needed: len,
                actual: data.len(),
            }
            .into());
        }

        data.truncate(len);
        Ok(Self {
            width,
            height,
            layout,
            data,
        })
    }

    fn required_len(width: u32, height: u32, layout: PixelLayout) -> Result<usize, CodecError> {
        if width == 0 || height == 0 {
            return Err(CodecError::zero_dimensions(width, height));
        }

        (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(layout.bytes_per_pixel()))
            .ok_or(CodecError::AllocationFailure(AllocateError::SizeOverflow))
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Per-pixel storage format.
    #[inline]
    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    /// Bytes per image row.
    #[inline]
    pub fn row_stride(&self) -> usize {
        self.width as usize * self.layout.bytes_per_pixel()
    }

    /// Raw pixel bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw pixel bytes.
    #[inline]
    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consumes the buffer, returning the raw pixel bytes.
    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Bytes of pixel `(x, y)`, or [`None`] if out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let bpp = self.layout.bytes_per_pixel();
        let start = y as usize * self.row_stride() + x as usize * bpp;
        self.data.get(start..start + bpp)
    }

    /// Palette index of pixel `(x, y)`, or [`None`] if out of bounds.
    #[inline]
    pub fn index_at(&self, x: u32, y: u32) -> Option<u8> {
        self.pixel(x, y).map(|pixel| self.layout.index(pixel))
    }

    /// Whether pixel `(x, y)` is transparent, or [`None`] if out of bounds.
    #[inline]
    pub fn is_transparent_at(&self, x: u32, y: u32) -> Option<bool> {
        self.pixel(x, y).map(|pixel| self.layout.is_transparent(pixel))
    }

    /// Number of transparent pixels in the whole image.
    pub fn transparent_pixel_count(&self) -> usize {
        self.data
            .chunks_exact(self.layout.bytes_per_pixel())
            .filter(|pixel| self.layout.is_transparent(pixel))
            .count()
    }

    /// Read cursor over row `row` of tile `(tile_x, tile_y)`.
    ///
    /// # Panics
    ///
    /// If `grid` does not describe this buffer's dimensions, or the tile/row is outside it.
    pub fn tile_row(&self, grid: &TileGrid, tile_x: u32, tile_y: u32, row: u32) -> PixelRow<'_> {
        let geometry = grid.geometry();
        assert_grid_matches(grid, self.width, self.height);

        let bpp = self.layout.bytes_per_pixel();
        let y = (tile_y * geometry.tile_height + row) as usize;
        let x = (tile_x * geometry.tile_width) as usize;
        let start = y * self.row_stride() + x * bpp;
        PixelRow {
            bytes: &self.data[start..start + geometry.tile_width as usize * bpp],
            layout: self.layout,
        }
    }

    /// Splits the buffer into bands one tile tall, top to bottom.
    ///
    /// # Panics
    ///
    /// If `grid` does not describe this buffer's dimensions.
    pub fn tile_bands_mut(&mut self, grid: &TileGrid) -> impl Iterator<Item = TileBandMut<'_>> {
        assert_grid_matches(grid, self.width, self.height);

        let layout = self.layout;
        let row_stride = self.row_stride();
        let band_len = Self::band_len(grid, layout);
        let tile_width = grid.geometry().tile_width;
        self.data
            .chunks_exact_mut(band_len)
            .enumerate()
            .map(move |(tile_y, bytes)| TileBandMut {
                bytes,
                tile_y: tile_y as u32,
                row_stride,
                tile_width,
                layout,
            })
    }

    /// Size in bytes of one band of [`PixelBuffer::tile_bands_mut`].
    #[inline]
    pub fn band_len(grid: &TileGrid, layout: PixelLayout) -> usize {
        grid.width() as usize * grid.geometry().tile_height as usize * layout.bytes_per_pixel()
    }
}

#[inline]
fn assert_grid_matches(grid: &TileGrid, width: u32, height: u32) {
    assert!(
        grid.width() == width && grid.height() == height,
        "tile grid {}x{} does not match pixel buffer {}x{}",
        grid.width(),
        grid.height(),
        width,
        height
    );
}

/// Read-only view of the pixels of one tile row.
#[derive(Debug, Clone, Copy)]
pub struct PixelRow<'a> {
    bytes: &'a [u8],
    layout: PixelLayout,
}

impl<'a> PixelRow<'a> {
    /// Number of pixels in the row.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len() / self.layout.bytes_per_pixel()
    }

    /// Whether the row holds no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Layout of the pixels in this row.
    #[inline]
    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    /// Iterates the row's pixels left to right, one stride-sized slice per pixel.
    #[inline]
    pub fn pixels(&self) -> ChunksExact<'a, u8> {
        self.bytes.chunks_exact(self.layout.bytes_per_pixel())
    }
}

/// Writable view of the pixels of one tile row.
#[derive(Debug)]
pub struct PixelRowMut<'a> {
    bytes: &'a mut [u8],
    layout: PixelLayout,
}

impl PixelRowMut<'_> {
    /// Number of pixels in the row.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len() / self.layout.bytes_per_pixel()
    }

    /// Whether the row holds no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Layout of the pixels in this row.
    #[inline]
    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    /// Iterates the row's pixels left to right, one stride-sized slice per pixel.
    #[inline]
    pub fn pixels_mut(&mut self) -> ChunksExactMut<'_, u8> {
        self.bytes.chunks_exact_mut(self.layout.bytes_per_pixel())
    }

    /// Marks every pixel of the row transparent.
    pub fn fill_transparent(&mut self) {
        let layout = self.layout;
        for pixel in self.pixels_mut() {
            layout.write_transparent(pixel);
        }
    }
}

/// A horizontal band of a [`PixelBuffer`], exactly one tile tall.
#[derive(Debug)]
pub struct TileBandMut<'a> {
    bytes: &'a mut [u8],
    tile_y: u32,
    row_stride: usize,
    tile_width: u32,
    layout: PixelLayout,
}

impl TileBandMut<'_> {
    /// Tile row this band covers.
    #[inline]
    pub fn tile_y(&self) -> u32 {
        self.tile_y
    }

    /// Write cursor over row `row` of tile `tile_x` within this band.
    ///
    /// # Panics
    ///
    /// If the tile or row lies outside the band.
    pub fn row_mut(&mut self, tile_x: u32, row: u32) -> PixelRowMut<'_> {
        let bpp = self.layout.bytes_per_pixel();
        let row_len = self.tile_width as usize * bpp;
        let start = row as usize * self.row_stride + tile_x as usize * row_len;
        PixelRowMut {
            bytes: &mut self.bytes[start..start + row_len],
            layout: self.layout,
        }
    }
}

impl<'a> TileBandMut<'a> {
    /// Wraps one band's worth of bytes taken from a [`PixelBuffer`] of `grid`'s size.
    ///
    /// Useful when bands are distributed with something other than
    /// [`PixelBuffer::tile_bands_mut`], e.g. parallel chunk iterators.
    ///
    /// # Panics
    ///
    /// If `bytes` is not exactly [`PixelBuffer::band_len`] long.
    pub fn from_band_bytes(
        bytes: &'a mut [u8],
        grid: &TileGrid,
        tile_y: u32,
        layout: PixelLayout,
    ) -> Self {
        assert_eq!(bytes.len(), PixelBuffer::band_len(grid, layout));
        Self {
            bytes,
            tile_y,
            row_stride: grid.width() as usize * layout.bytes_per_pixel(),
            tile_width: grid.geometry().tile_width,
            layout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[rstest]
    #[case(0, 8)]
    #[case(8, 0)]
    fn new_rejects_zero_dimensions(#[case] width: u32, #[case] height: u32) {
        for layout in PixelLayout::all_values().iter() {
            assert_eq!(
                PixelBuffer::new(width, height, *layout),
                Err(CodecError::zero_dimensions(width, height))
            );
        }
    }

    #[test]
    fn oversized_buffer_is_an_allocation_failure() {
        let overflow = Err(CodecError::AllocationFailure(AllocateError::SizeOverflow));
        for layout in PixelLayout::all_values().iter() {
            assert_eq!(PixelBuffer::new(0xFFFF_FFF8, 0xFFFF_FFF8, *layout), overflow);
            assert_eq!(
                PixelBuffer::from_raw(0xFFFF_FFF8, 0xFFFF_FFF8, *layout, Vec::new()),
                overflow
            );
        }
    }

    #[test]
    fn from_raw_rejects_short_data() {
        let result = PixelBuffer::from_raw(8, 8, PixelLayout::IndexedAlpha, vec![0u8; 127]);
        assert_eq!(
            result,
            Err(CodecError::InvalidInput(
                InvalidInputError::PixelBufferTooSmall {
                    needed: 128,
                    actual: 127,
                }
            ))
        );
    }

    #[test]
    fn from_raw_discards_excess_bytes() {
        let pixels = PixelBuffer::from_raw(8, 8, PixelLayout::Indexed, vec![1u8; 70]).unwrap();
        assert_eq!(pixels.as_bytes().len(), 64);
    }

    #[test]
    fn new_buffer_is_transparent_with_alpha() {
        let pixels = PixelBuffer::new(16, 8, PixelLayout::IndexedAlpha).unwrap();
        assert_eq!(pixels.transparent_pixel_count(), 16 * 8);

        let pixels = PixelBuffer::new(16, 8, PixelLayout::Indexed).unwrap();
        assert_eq!(pixels.transparent_pixel_count(), 0);
    }

    #[test]
    fn tile_row_reads_eight_consecutive_pixels() {
        let pixels = patterned_pixels(16, 16);
        let grid = TileGeometry::NGP_2BPP.tile_grid(16, 16).unwrap();

        let row = pixels.tile_row(&grid, 1, 1, 3);
        assert_eq!(row.len(), 8);
        for (i, pixel) in row.pixels().enumerate() {
            let x = 8 + i as u32;
            assert_eq!(Some(row.layout().index(pixel)), pixels.index_at(x, 11));
        }
    }

    #[test]
    fn band_rows_address_the_right_pixels() {
        let mut pixels = PixelBuffer::new(16, 16, PixelLayout::IndexedAlpha).unwrap();
        let grid = TileGeometry::NGP_2BPP.tile_grid(16, 16).unwrap();

        for mut band in pixels.tile_bands_mut(&grid) {
            let tile_y = band.tile_y();
            for tile_x in 0..2 {
                for row in 0..8 {
                    let mut cursor = band.row_mut(tile_x, row);
                    let layout = cursor.layout();
                    for (i, pixel) in cursor.pixels_mut().enumerate() {
                        let index = ((tile_x as usize + tile_y as usize + i) % 4) as u8;
                        layout.write_opaque(pixel, index);
                    }
                }
            }
        }

        assert_eq!(pixels.transparent_pixel_count(), 0);
        assert_eq!(pixels.index_at(0, 0), Some(0));
        assert_eq!(pixels.index_at(9, 0), Some(2)); // tile (1, 0), pixel 1
        assert_eq!(pixels.index_at(3, 12), Some(0)); // tile (0, 1), pixel 3
    }

    #[test]
    fn fill_transparent_marks_whole_row() {
        let mut pixels = patterned_pixels(8, 8);
        let grid = TileGeometry::NGP_2BPP.tile_grid(8, 8).unwrap();

        if let Some(mut band) = pixels.tile_bands_mut(&grid).next() {
            band.row_mut(0, 2).fill_transparent();
        }

        assert_eq!(pixels.transparent_pixel_count(), 8);
        assert!((0..8).all(|x| pixels.is_transparent_at(x, 2) == Some(true)));
    }

    #[test]
    fn pixel_out_of_bounds_is_none() {
        let pixels = patterned_pixels(8, 8);
        assert_eq!(pixels.pixel(8, 0), None);
        assert_eq!(pixels.index_at(0, 8), None);
    }
}
