use crate::error::CliError;
use crate::util::{default_tail_path, with_mapped_file, write_mapped_file, FileSurplusStore};
use argh::FromArgs;
use rom_gfx_common::TileGeometry;
use rom_gfx_ngp2bpp::{export_ngp_2bpp, Ngp2bppEncodeSettings, PixelBuffer, PixelLayout};
use std::path::PathBuf;

#[derive(FromArgs, Debug)]
/// Encode a raw index+alpha pixel file into packed tile data
#[argh(subcommand, name = "encode")]
pub struct EncodeCmd {
    /// raw pixel input, 2 bytes per pixel (palette index, alpha)
    #[argh(option)]
    pub input: PathBuf,

    /// image width in pixels
    #[argh(option)]
    pub width: u32,

    /// packed 2BPP output
    #[argh(option)]
    pub output: PathBuf,

    /// trailing bytes to append [default: <input>.tail]
    #[argh(option)]
    pub tail: Option<PathBuf>,

    /// keep fully transparent tiles instead of dropping them
    #[argh(switch)]
    pub keep_empty_tiles: bool,
}

pub fn handle_encode_command(cmd: EncodeCmd) -> Result<(), CliError> {
    let geometry = TileGeometry::NGP_2BPP;
    let tail = cmd.tail.unwrap_or_else(|| default_tail_path(&cmd.input));
    let mut store = FileSurplusStore::new(tail);
    let settings = Ngp2bppEncodeSettings {
        elide_transparent_tiles: !cmd.keep_empty_tiles,
    };

    let encoded = with_mapped_file(&cmd.input, |raw| {
        let layout = PixelLayout::IndexedAlpha;
        let row_len = cmd.width as usize * layout.bytes_per_pixel();
        if row_len == 0 || raw.len() % row_len != 0 {
            return Err(CliError::RawPixelSize {
                len: raw.len(),
                width: cmd.width,
            });
        }

        let height = (raw.len() / row_len) as u32;
        let pixels = PixelBuffer::from_raw(cmd.width, height, layout, raw.to_vec())?;
        Ok(export_ngp_2bpp(&pixels, &geometry, &mut store, settings)?)
    })?;

    write_mapped_file(&cmd.output, &encoded.packed)?;

    println!(
        "Encoded {} to {} bytes ({} empty tiles)",
        cmd.input.display(),
        encoded.packed.len(),
        encoded.empty_tiles
    );
    Ok(())
}
