//! Fallible buffer allocation for the codecs.
//!
//! Every buffer handed to a caller (packed bytes, pixel buffers, palettes) is allocated
//! through these helpers, so running out of memory surfaces as an [`AllocateError`]
//! before any byte of output has been written.
//!
//! ## Useful APIs
//!
//! [`allocate_zeroed`]: Allocates a zero-filled buffer of exactly `num_bytes`.
//! [`allocate_with_capacity`]: Allocates an empty buffer able to hold `num_bytes` without reallocating.

use alloc::collections::TryReserveError;
use alloc::vec::Vec;
use thiserror::Error;

/// Allocates a zero-filled buffer of `num_bytes` bytes.
///
/// # Parameters
///
/// - `num_bytes`: The number of bytes to allocate
///
/// # Returns
///
/// A [`Vec`] of length `num_bytes`, with every byte set to 0.
pub fn allocate_zeroed(num_bytes: usize) -> Result<Vec<u8>, AllocateError> {
    let mut buffer = allocate_with_capacity(num_bytes)?;
    buffer.resize(num_bytes, 0);
    Ok(buffer)
}

/// Allocates an empty buffer with room for exactly `num_bytes` bytes.
///
/// Pushing up to `num_bytes` bytes into the returned buffer never reallocates.
///
/// # Parameters
///
/// - `num_bytes`: The capacity to reserve
pub fn allocate_with_capacity(num_bytes: usize) -> Result<Vec<u8>, AllocateError> {
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(num_bytes)?;
    Ok(buffer)
}

/// An error that happened in memory allocation within the library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocateError {
    /// The allocator could not provide the requested buffer.
    #[error("Failed to allocate buffer: {0}")]
    AllocationFailed(#[from] TryReserveError),

    /// The requested size does not fit in `usize`.
    #[error("Requested buffer size overflows the address space")]
    SizeOverflow,
}
