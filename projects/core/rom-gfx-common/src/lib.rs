#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod allocate;
pub mod error;
pub mod geometry;
pub mod palette;
pub mod pixel;
pub mod resolve;
pub mod surplus;

pub use error::{CodecError, InvalidInputError};
pub use geometry::{TileGeometry, TileGrid};
pub use palette::{GrayscaleRamp, Palette, PaletteLayout, PaletteLoader};
pub use pixel::{PixelBuffer, PixelLayout, PixelRow, PixelRowMut, TileBandMut};
pub use resolve::{DefaultWidthResolver, DimensionResolver, ImageDimensions};
pub use surplus::{SurplusStore, SurplusTail};

/// Common test prelude for avoiding duplicate imports in test modules
#[cfg(test)]
pub(crate) mod test_prelude;
