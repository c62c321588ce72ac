#![no_main]

// Imports arbitrary packed data, exports it again and requires the exact same bytes back.
// Holds for every input that contains at least one whole tile.

use libfuzzer_sys::fuzz_target;
use rom_gfx_common::{DefaultWidthResolver, GrayscaleRamp};
use rom_gfx_ngp2bpp::*;

fuzz_target!(|packed: &[u8]| {
    if packed.len() < 16 {
        return;
    }

    let geometry = TileGeometry::NGP_2BPP;
    let mut store: Option<SurplusTail> = None;
    let imported = import_ngp_2bpp(
        packed,
        &geometry,
        &DefaultWidthResolver,
        &mut store,
        &GrayscaleRamp,
        Ngp2bppDecodeSettings::default(),
    )
    .expect("import of a whole tile succeeds");

    let exported = export_ngp_2bpp(
        &imported.pixels,
        &geometry,
        &mut store,
        Ngp2bppEncodeSettings::default(),
    )
    .expect("export succeeds");

    assert_eq!(exported.packed, packed, "roundtrip is not lossless");
});
