//! Error types shared by every codec operation.
//!
//! Truncated packed data is not an error; decoders resolve it by emitting transparent
//! pixels. Everything in here is a rejected call that produced no output.

use crate::allocate::AllocateError;
use thiserror::Error;

/// Errors returned by geometry lookups and codec operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Image dimensions are zero or not a whole number of tiles.
    #[error("Invalid image dimensions: {width}x{height} (must be non-zero multiples of {tile_width}x{tile_height})")]
    InvalidDimensions {
        /// Requested image width in pixels.
        width: u32,
        /// Requested image height in pixels.
        height: u32,
        /// Tile width of the geometry the dimensions were checked against.
        tile_width: u32,
        /// Tile height of the geometry the dimensions were checked against.
        tile_height: u32,
    },

    /// A buffer or parameter passed to the operation is unusable.
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),

    /// A buffer could not be allocated.
    #[error(transparent)]
    AllocationFailure(#[from] AllocateError),
}

/// Reasons a call is rejected as [`CodecError::InvalidInput`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInputError {
    /// The packed source buffer contains no bytes.
    #[error("Packed buffer is empty")]
    EmptyPackedBuffer,

    /// Width or height is zero.
    #[error("Image dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions {
        /// Requested image width in pixels.
        width: u32,
        /// Requested image height in pixels.
        height: u32,
    },

    /// The pixel data is shorter than its dimensions and layout require.
    #[error("Pixel buffer too small: needed {needed}, got {actual}")]
    PixelBufferTooSmall {
        /// The required buffer size in bytes.
        needed: usize,
        /// The actual buffer size provided.
        actual: usize,
    },

    /// The codec cannot pack rows of this tile geometry.
    #[error("Unsupported tile geometry: {tile_width}px wide tiles at {bits_per_pixel}bpp")]
    UnsupportedGeometry {
        /// Tile width in pixels.
        tile_width: u32,
        /// Bits per pixel.
        bits_per_pixel: u32,
    },
}

impl CodecError {
    /// Shorthand for [`InvalidInputError::ZeroDimensions`] wrapped in [`CodecError::InvalidInput`].
    pub fn zero_dimensions(width: u32, height: u32) -> Self {
        Self::InvalidInput(InvalidInputError::ZeroDimensions { width, height })
    }
}
