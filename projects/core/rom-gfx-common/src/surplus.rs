//! Trailing bytes that are not part of the decoded tile grid.
//!
//! ROM dumps rarely end on a tile boundary, and the guessed image may hold fewer tiles than
//! the file. Whatever lies past the last tile the grid decodes is kept as an opaque
//! [`SurplusTail`]: stashed on import, appended unchanged on export, never read as pixels.

use crate::allocate::allocate_with_capacity;
use crate::error::CodecError;
use crate::geometry::TileGrid;
use alloc::vec::Vec;
use core::convert::Infallible;

/// Opaque trailing bytes of a packed buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurplusTail {
    bytes: Vec<u8>,
}

impl SurplusTail {
    /// Wraps previously stashed bytes.
    #[inline]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Splits `packed` into the whole tiles `grid` decodes and the surplus past them.
    ///
    /// The payload holds `min(grid tiles, whole tiles in packed)` tiles. Everything after
    /// that (a partial trailing tile, or whole tiles the grid has no room for) becomes
    /// the surplus.
    ///
    /// # Errors
    ///
    /// - [`CodecError::AllocationFailure`] if the surplus cannot be copied.
    ///
    /// # Examples
    ///
    /// ```
    /// use rom_gfx_common::{SurplusTail, TileGeometry};
    ///
    /// let grid = TileGeometry::NGP_2BPP.tile_grid(16, 8).unwrap();
    /// let packed = [0u8; 16 * 2 + 3];
    /// let (payload, surplus) = SurplusTail::split(&grid, &packed).unwrap();
    /// assert_eq!(payload.len(), 32);
    /// assert_eq!(surplus.len(), 3);
    /// ```
    pub fn split<'a>(grid: &TileGrid, packed: &'a [u8]) -> Result<(&'a [u8], Self), CodecError> {
        let tile_size = grid.geometry().tile_size_bytes();
        let whole_tiles = packed.len() / tile_size;
        let consumed = whole_tiles.min(grid.tile_count()) * tile_size;

        let (payload, tail) = packed.split_at(consumed);
        let mut bytes = allocate_with_capacity(tail.len())?;
        bytes.extend_from_slice(tail);
        Ok((payload, Self { bytes }))
    }

    /// Appends the surplus bytes to the end of `packed`.
    ///
    /// # Errors
    ///
    /// - [`CodecError::AllocationFailure`] if `packed` cannot grow.
    pub fn append_to(&self, packed: &mut Vec<u8>) -> Result<(), CodecError> {
        packed
            .try_reserve_exact(self.bytes.len())
            .map_err(|e| CodecError::AllocationFailure(e.into()))?;
        packed.extend_from_slice(&self.bytes);
        Ok(())
    }

    /// Number of surplus bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether there are no surplus bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The surplus bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the tail, returning its bytes.
    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Keeps a [`SurplusTail`] between an import and the following export of the same image.
///
/// Host applications typically attach it to the open document (metadata, a sidecar file).
pub trait SurplusStore {
    /// Error raised by the backing storage.
    type Error;

    /// Stores `tail`, replacing anything stashed before.
    fn stash(&mut self, tail: SurplusTail) -> Result<(), Self::Error>;

    /// Returns the stashed tail, if there is one.
    fn restore(&mut self) -> Result<Option<SurplusTail>, Self::Error>;
}

/// In-memory store, for sessions that live inside a single process.
impl SurplusStore for Option<SurplusTail> {
    type Error = Infallible;

    fn stash(&mut self, tail: SurplusTail) -> Result<(), Self::Error> {
        *self = Some(tail);
        Ok(())
    }

    fn restore(&mut self) -> Result<Option<SurplusTail>, Self::Error> {
        Ok(self.clone())
    }
}
