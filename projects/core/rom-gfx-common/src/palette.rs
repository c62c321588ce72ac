//! Indexed RGB palettes.
//!
//! The packed formats only store palette indices; the colours themselves come from
//! elsewhere (a palette file, the host application, a default ramp). Codecs report the
//! palette shape through [`PaletteLayout`], allocate a [`Palette`] of exactly that size and
//! let a [`PaletteLoader`] fill it in.

use crate::allocate::allocate_zeroed;
use crate::error::CodecError;
use alloc::vec::Vec;

/// Shape of a palette buffer: entry count and bytes per entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaletteLayout {
    /// Number of colours in the palette.
    pub colors: usize,
    /// Bytes used by one colour (3 for packed RGB).
    pub bytes_per_color: usize,
}

impl PaletteLayout {
    /// Total palette buffer size in bytes.
    #[inline]
    pub const fn size_bytes(&self) -> usize {
        self.colors * self.bytes_per_color
    }
}

/// A fixed-size, flat palette buffer: `colors * bytes_per_color` bytes, entry after entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    layout: PaletteLayout,
    data: Vec<u8>,
}

impl Palette {
    /// Allocates a zeroed (all black) palette with the given layout.
    ///
    /// # Errors
    ///
    /// - [`CodecError::AllocationFailure`] if the buffer cannot be allocated.
    pub fn allocate(layout: PaletteLayout) -> Result<Self, CodecError> {
        Ok(Self {
            layout,
            data: allocate_zeroed(layout.size_bytes())?,
        })
    }

    /// The layout this palette was allocated with.
    #[inline]
    pub fn layout(&self) -> PaletteLayout {
        self.layout
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.layout.colors
    }

    /// Whether the palette has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layout.colors == 0
    }

    /// Bytes of entry `index`, or [`None`] if out of range.
    pub fn color(&self, index: usize) -> Option<&[u8]> {
        let stride = self.layout.bytes_per_color;
        let start = index.checked_mul(stride)?;
        self.data.get(start..start + stride)
    }

    /// Mutable bytes of entry `index`, or [`None`] if out of range.
    pub fn color_mut(&mut self, index: usize) -> Option<&mut [u8]> {
        let stride = self.layout.bytes_per_color;
        let start = index.checked_mul(stride)?;
        self.data.get_mut(start..start + stride)
    }

    /// Raw palette bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw palette bytes. The length is fixed by the layout.
    #[inline]
    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

/// Fills a freshly allocated [`Palette`] with colours.
pub trait PaletteLoader {
    /// Writes every entry of `palette`.
    fn load(&self, palette: &mut Palette);
}

/// Evenly spaced grey levels, from white at index 0 to black at the last index.
///
/// Used when nothing better is known about the original colours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GrayscaleRamp;

impl PaletteLoader for GrayscaleRamp {
    fn load(&self, palette: &mut Palette) {
        let colors = palette.len();
        let steps = colors.saturating_sub(1).max(1);
        for index in 0..colors {
            let level = (255 - index * 255 / steps) as u8;
            if let Some(entry) = palette.color_mut(index) {
                entry.fill(level);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[test]
    fn allocate_uses_geometry_layout() {
        let palette = Palette::allocate(TileGeometry::NGP_2BPP.palette_layout()).unwrap();
        assert_eq!(palette.len(), 4);
        assert_eq!(palette.as_bytes().len(), 12);
        assert!(palette.as_bytes().iter().all(|&byte| byte == 0));
    }

    #[test]
    fn grayscale_ramp_goes_light_to_dark() {
        let mut palette = Palette::allocate(TileGeometry::NGP_2BPP.palette_layout()).unwrap();
        GrayscaleRamp.load(&mut palette);
        assert_eq!(
            palette.as_bytes(),
            &[255, 255, 255, 170, 170, 170, 85, 85, 85, 0, 0, 0]
        );
    }

    #[rstest]
    #[case(0, Some(&[1u8, 2, 3][..]))]
    #[case(3, Some(&[10u8, 11, 12][..]))]
    #[case(4, None)]
    fn color_reads_entry(#[case] index: usize, #[case] expected: Option<&[u8]>) {
        let mut palette = Palette::allocate(TileGeometry::NGP_2BPP.palette_layout()).unwrap();
        for (i, byte) in palette.as_mut_bytes().iter_mut().enumerate() {
            *byte = i as u8 + 1;
        }
        assert_eq!(palette.color(index), expected);
    }
}
