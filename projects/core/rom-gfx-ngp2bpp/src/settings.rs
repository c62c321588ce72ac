//! Per-operation settings for the NGP 2BPP codec.

use rom_gfx_common::PixelLayout;

/// Settings for [`decode_ngp_2bpp`](crate::decode_ngp_2bpp).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ngp2bppDecodeSettings {
    /// Layout of the produced pixel buffer.
    ///
    /// Only [`PixelLayout::IndexedAlpha`] can mark pixels past the end of the packed data as
    /// transparent; with [`PixelLayout::Indexed`] they decode as index 0.
    pub layout: PixelLayout,
}

impl Default for Ngp2bppDecodeSettings {
    fn default() -> Self {
        Self {
            layout: PixelLayout::IndexedAlpha,
        }
    }
}

/// Settings for [`encode_ngp_2bpp`](crate::encode_ngp_2bpp).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ngp2bppEncodeSettings {
    /// Drop tiles whose 64 pixels are all transparent from the output.
    ///
    /// Later tiles move up to fill the gap, so the packed buffer only ever contains
    /// non-empty tiles, in tile order.
    pub elide_transparent_tiles: bool,
}

impl Default for Ngp2bppEncodeSettings {
    fn default() -> Self {
        Self {
            elide_transparent_tiles: true,
        }
    }
}

impl Ngp2bppEncodeSettings {
    /// Returns every possible settings combination.
    pub fn all_combinations() -> [Self; 2] {
        [
            Self {
                elide_transparent_tiles: true,
            },
            Self {
                elide_transparent_tiles: false,
            },
        ]
    }
}
