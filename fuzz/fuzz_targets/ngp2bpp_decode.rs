#![no_main]

// Decodes arbitrary packed data into arbitrary (tile-aligned) image sizes and checks
// the invariants that hold for any input: exact output size, surplus past the decoded
// tiles only, and transparent filler exactly where the data runs out.

use libfuzzer_sys::{arbitrary, fuzz_target};
use rom_gfx_ngp2bpp::*;

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct DecodeInput {
    pub tiles_x: u8,
    pub tiles_y: u8,
    pub packed: Vec<u8>,
}

fuzz_target!(|input: DecodeInput| {
    let tiles_x = (input.tiles_x % 32) as u32 + 1;
    let tiles_y = (input.tiles_y % 32) as u32 + 1;
    let dimensions = ImageDimensions::new(tiles_x * 8, tiles_y * 8);
    let geometry = TileGeometry::NGP_2BPP;
    let settings = Ngp2bppDecodeSettings::default();

    let decoded = match decode_ngp_2bpp(&input.packed, dimensions, &geometry, settings) {
        Ok(decoded) => decoded,
        Err(_) => {
            assert!(input.packed.is_empty(), "only empty input may fail");
            return;
        }
    };

    let tile_count = (tiles_x * tiles_y) as usize;
    let data_tiles = (input.packed.len() / 16).min(tile_count);
    assert_eq!(
        decoded.pixels.as_bytes().len(),
        tile_count * 64 * PixelLayout::IndexedAlpha.bytes_per_pixel()
    );
    assert_eq!(decoded.surplus.as_bytes(), &input.packed[data_tiles * 16..]);
    assert_eq!(decoded.truncated_tiles, tile_count - data_tiles);
    assert_eq!(
        decoded.pixels.transparent_pixel_count(),
        decoded.truncated_tiles * 64
    );

    #[cfg(feature = "multithreaded")]
    {
        let parallel = decode_ngp_2bpp_parallel(&input.packed, dimensions, &geometry, settings)
            .expect("sequential decode succeeded");
        assert_eq!(parallel, decoded, "parallel decode differs");
    }
});
