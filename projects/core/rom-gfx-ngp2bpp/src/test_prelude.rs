//! Common test imports and utilities for the NGP 2BPP codec
//!
//! This module provides a common prelude for test modules to avoid
//! duplicate imports across the codebase.
#![allow(unused_imports)]

// Re-export commonly used alloc types for tests
pub use alloc::{format, string::String, vec, vec::Vec};

// External crates commonly used in tests
pub use rstest::rstest;

// Re-export the crate root for convenience in test modules
pub use super::*;
pub use rom_gfx_common::{CodecError, InvalidInputError};

/// Deterministic, non-repeating-looking packed bytes.
pub(crate) fn packed_pattern(len: usize) -> Vec<u8> {
    (0..len)
        .map(|i| (i as u8).wrapping_mul(31).wrapping_add((i / 7) as u8))
        .collect()
}

/// An [`PixelLayout::IndexedAlpha`] buffer with opaque pixels and indices `0..=3`.
pub(crate) fn opaque_pixels(width: u32, height: u32) -> PixelBuffer {
    let data = (0..width as usize * height as usize)
        .flat_map(|i| [((i * 5 + i / 9) % 4) as u8, 0xFF])
        .collect();
    PixelBuffer::from_raw(width, height, PixelLayout::IndexedAlpha, data).unwrap()
}

/// Marks every pixel of tile `(tile_x, tile_y)` transparent.
pub(crate) fn clear_tile(pixels: &mut PixelBuffer, tile_x: u32, tile_y: u32) {
    let width = pixels.width() as usize;
    let bytes = pixels.as_mut_bytes();
    for y in 0..8 {
        for x in 0..8 {
            let pixel = ((tile_y as usize * 8 + y) * width + tile_x as usize * 8 + x) * 2;
            bytes[pixel] = 0;
            bytes[pixel + 1] = 0;
        }
    }
}
