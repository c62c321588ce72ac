//! Common test imports and utilities for the shared codec types
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

/// Builds an [`PixelLayout::IndexedAlpha`] buffer whose indices follow a repeating pattern
/// and whose pixels are all opaque.
pub(crate) fn patterned_pixels(width: u32, height: u32) -> PixelBuffer {
    let mut data = Vec::new();
    for i in 0..(width as usize * height as usize) {
        data.push(((i * 7 + i / 3) % 4) as u8);
        data.push(pixel::OPAQUE_ALPHA);
    }
    PixelBuffer::from_raw(width, height, PixelLayout::IndexedAlpha, data).unwrap()
}
