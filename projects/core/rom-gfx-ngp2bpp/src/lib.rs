#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

mod decode;
mod encode;
mod row;
mod session;
mod settings;

#[cfg(feature = "bench")]
pub mod bench;

pub use decode::*;
pub use encode::*;
pub use session::*;
pub use settings::*;

// Re-export the shared types callers need for every operation
pub use rom_gfx_common::{ImageDimensions, PixelBuffer, PixelLayout, SurplusTail, TileGeometry};

/// Common test prelude for avoiding duplicate imports in test modules
#[cfg(test)]
pub(crate) mod test_prelude;
