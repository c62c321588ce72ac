use crate::error::CliError;
use crate::util::with_mapped_file;
use argh::FromArgs;
use bytesize::ByteSize;
use rom_gfx_common::{DefaultWidthResolver, DimensionResolver, TileGeometry};
use std::path::PathBuf;

#[derive(FromArgs, Debug)]
/// Print the image size and tile layout a packed file decodes to
#[argh(subcommand, name = "info")]
pub struct InfoCmd {
    /// packed 2BPP tile data
    #[argh(option)]
    pub input: PathBuf,
}

pub fn handle_info_command(cmd: InfoCmd) -> Result<(), CliError> {
    let geometry = TileGeometry::NGP_2BPP;

    with_mapped_file(&cmd.input, |packed| {
        let dimensions = DefaultWidthResolver.resolve(&geometry, packed.len())?;
        let grid = geometry.tile_grid(dimensions.width, dimensions.height)?;
        let tile_size = geometry.tile_size_bytes();
        let data_tiles = (packed.len() / tile_size).min(grid.tile_count());
        let surplus = packed.len() - data_tiles * tile_size;

        println!("File: {}", cmd.input.display());
        println!("Size: {}", ByteSize(packed.len() as u64));
        println!(
            "Geometry: {}x{} tiles, {}bpp, {} bytes per tile",
            geometry.tile_width,
            geometry.tile_height,
            geometry.bits_per_pixel,
            tile_size
        );
        println!(
            "Image: {}x{} pixels ({}x{} tiles)",
            dimensions.width,
            dimensions.height,
            grid.tiles_x(),
            grid.tiles_y()
        );
        println!(
            "Tiles: {data_tiles} with data, {} transparent filler",
            grid.tile_count() - data_tiles
        );
        println!("Surplus: {surplus} bytes");
        Ok(())
    })
}
