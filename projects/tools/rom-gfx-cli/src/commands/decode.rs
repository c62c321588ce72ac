use crate::error::CliError;
use crate::util::{default_tail_path, with_mapped_file, write_mapped_file, FileSurplusStore};
use argh::FromArgs;
use rom_gfx_common::{DefaultWidthResolver, GrayscaleRamp, TileGeometry};
use rom_gfx_ngp2bpp::{import_ngp_2bpp, Ngp2bppDecodeSettings, PixelLayout};
use std::path::PathBuf;

#[derive(FromArgs, Debug)]
/// Decode packed tile data into a raw index+alpha pixel file
#[argh(subcommand, name = "decode")]
pub struct DecodeCmd {
    /// packed 2BPP tile data
    #[argh(option)]
    pub input: PathBuf,

    /// raw pixel output, 2 bytes per pixel (palette index, alpha)
    #[argh(option)]
    pub output: PathBuf,

    /// where to keep trailing bytes [default: <output>.tail]
    #[argh(option)]
    pub tail: Option<PathBuf>,
}

pub fn handle_decode_command(cmd: DecodeCmd) -> Result<(), CliError> {
    let geometry = TileGeometry::NGP_2BPP;
    let tail = cmd.tail.unwrap_or_else(|| default_tail_path(&cmd.output));
    let mut store = FileSurplusStore::new(tail);

    let imported = with_mapped_file(&cmd.input, |packed| {
        Ok(import_ngp_2bpp(
            packed,
            &geometry,
            &DefaultWidthResolver,
            &mut store,
            &GrayscaleRamp,
            Ngp2bppDecodeSettings {
                layout: PixelLayout::IndexedAlpha,
            },
        )?)
    })?;

    write_mapped_file(&cmd.output, imported.pixels.as_bytes())?;

    println!(
        "Decoded {} to {}x{} pixels",
        cmd.input.display(),
        imported.pixels.width(),
        imported.pixels.height()
    );
    if store.path().exists() {
        println!("Trailing bytes kept in {}", store.path().display());
    }
    Ok(())
}
