//! Import/export of whole images, the way an image editor drives the codec.
//!
//! An import guesses the image size from the buffer length, decodes, stashes the surplus
//! tail and hands back a palette. The matching export encodes and re-appends the stashed
//! tail, so an image that is opened and saved unchanged keeps its trailing bytes.

use crate::decode::decode_ngp_2bpp;
use crate::encode::{encode_ngp_2bpp, EncodedImage};
use crate::row::ensure_word_rows;
use crate::settings::{Ngp2bppDecodeSettings, Ngp2bppEncodeSettings};
use rom_gfx_common::{
    CodecError, DimensionResolver, Palette, PaletteLoader, PixelBuffer, SurplusStore,
    TileGeometry,
};
use thiserror::Error;

/// An image opened with [`import_ngp_2bpp`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedImage {
    /// The decoded pixels.
    pub pixels: PixelBuffer,
    /// The palette, sized for the geometry and filled by the palette loader.
    pub palette: Palette,
}

/// Errors from an import or export.
#[derive(Debug, Error)]
pub enum SessionError<E> {
    /// Decoding or encoding failed.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The surplus store could not keep or return the tail.
    #[error("Surplus store failed: {0}")]
    Store(E),
}

/// Decodes a packed buffer whose image size is unknown.
///
/// # Parameters
///
/// - `packed`: The packed tile data
/// - `geometry`: The tile geometry, normally [`TileGeometry::NGP_2BPP`]
/// - `resolver`: Derives the image size from `packed.len()`
/// - `store`: Receives the surplus tail, even when it is empty
/// - `palette_loader`: Fills the palette
/// - `settings`: Decode settings
///
/// The store is only written once decoding has succeeded.
///
/// # Errors
///
/// - [`SessionError::Codec`] if the geometry is not 8 pixel wide 2bpp tiles, the size cannot
///   be resolved, or decoding fails
/// - [`SessionError::Store`] if the surplus cannot be stashed
pub fn import_ngp_2bpp<R, S, L>(
    packed: &[u8],
    geometry: &TileGeometry,
    resolver: &R,
    store: &mut S,
    palette_loader: &L,
    settings: Ngp2bppDecodeSettings,
) -> Result<ImportedImage, SessionError<S::Error>>
where
    R: DimensionResolver + ?Sized,
    S: SurplusStore + ?Sized,
    L: PaletteLoader + ?Sized,
{
    ensure_word_rows(geometry)?;
    let dimensions = resolver.resolve(geometry, packed.len())?;
    let decoded = decode_ngp_2bpp(packed, dimensions, geometry, settings)?;

    if !decoded.surplus.is_empty() {
        log::info!(
            "Keeping {} trailing bytes for the next export",
            decoded.surplus.len()
        );
    }
    store.stash(decoded.surplus).map_err(SessionError::Store)?;

    let mut palette = Palette::allocate(geometry.palette_layout())?;
    palette_loader.load(&mut palette);

    Ok(ImportedImage {
        pixels: decoded.pixels,
        palette,
    })
}

/// Encodes an image and appends the surplus tail stashed by the matching import.
///
/// # Errors
///
/// - [`SessionError::Codec`] if encoding fails
/// - [`SessionError::Store`] if the surplus cannot be restored
pub fn export_ngp_2bpp<S>(
    pixels: &PixelBuffer,
    geometry: &TileGeometry,
    store: &mut S,
    settings: Ngp2bppEncodeSettings,
) -> Result<EncodedImage, SessionError<S::Error>>
where
    S: SurplusStore + ?Sized,
{
    let mut encoded = encode_ngp_2bpp(pixels, geometry, settings)?;

    if let Some(tail) = store.restore().map_err(SessionError::Store)? {
        tail.append_to(&mut encoded.packed)?;
        log::debug!("Appended {} trailing bytes", tail.len());
    }

    Ok(encoded)
}
