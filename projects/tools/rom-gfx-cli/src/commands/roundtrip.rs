use crate::error::CliError;
use crate::util::{find_all_files, with_mapped_file};
use argh::FromArgs;
use bytesize::ByteSize;
use core::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use rom_gfx_common::{DefaultWidthResolver, GrayscaleRamp, SurplusTail, TileGeometry};
use rom_gfx_ngp2bpp::{
    export_ngp_2bpp, import_ngp_2bpp, Ngp2bppDecodeSettings, Ngp2bppEncodeSettings,
};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[cfg(feature = "multithreaded")]
use rayon::prelude::*;

#[derive(FromArgs, Debug)]
/// Import and re-export every file in a directory, checking the output matches byte for byte
#[argh(subcommand, name = "roundtrip")]
pub struct RoundtripCmd {
    /// directory of packed 2BPP files (searched recursively)
    #[argh(option)]
    pub input: PathBuf,
}

pub fn handle_roundtrip_command(cmd: RoundtripCmd) -> Result<(), CliError> {
    let mut files = Vec::new();
    find_all_files(&cmd.input, &mut files)?;
    println!(
        "Testing import/export roundtrip on {} files in: {}",
        files.len(),
        cmd.input.display()
    );

    let start = Instant::now();
    let files_passed = AtomicUsize::new(0);
    let bytes_processed = AtomicU64::new(0);

    let check = |path: &PathBuf| match roundtrip_file(path) {
        Ok(len) => {
            println!("✓ PASSED {}", path.display());
            files_passed.fetch_add(1, Ordering::Relaxed);
            bytes_processed.fetch_add(len as u64, Ordering::Relaxed);
        }
        Err(e) => println!("✗ FAILED {e}"),
    };

    #[cfg(feature = "multithreaded")]
    files.par_iter().for_each(check);
    #[cfg(not(feature = "multithreaded"))]
    files.iter().for_each(check);

    let total = files.len();
    let passed = files_passed.load(Ordering::Relaxed);
    println!("\nSummary: {passed}/{total} files passed");
    println!("Time taken: {:.2?}", start.elapsed());
    println!(
        "Data processed: {}",
        ByteSize(bytes_processed.load(Ordering::Relaxed))
    );

    if passed != total {
        return Err(CliError::RoundtripFailed {
            failed: total - passed,
            total,
        });
    }
    Ok(())
}

/// Imports and re-exports one file, returning its size if the output is identical.
fn roundtrip_file(path: &Path) -> Result<usize, CliError> {
    let geometry = TileGeometry::NGP_2BPP;

    with_mapped_file(path, |packed| {
        let mut store: Option<SurplusTail> = None;
        let imported = import_ngp_2bpp(
            packed,
            &geometry,
            &DefaultWidthResolver,
            &mut store,
            &GrayscaleRamp,
            Ngp2bppDecodeSettings::default(),
        )
        .map_err(|e| mismatch(path, e.to_string()))?;
        let exported = export_ngp_2bpp(
            &imported.pixels,
            &geometry,
            &mut store,
            Ngp2bppEncodeSettings::default(),
        )
        .map_err(|e| mismatch(path, e.to_string()))?;

        if let Some(offset) = first_difference(packed, &exported.packed) {
            return Err(mismatch(
                path,
                format!(
                    "output differs at byte {offset} ({} bytes in, {} bytes out)",
                    packed.len(),
                    exported.packed.len()
                ),
            ));
        }
        Ok(packed.len())
    })
}

/// Offset of the first differing byte, or the shorter length if one is a prefix of the other.
fn first_difference(expected: &[u8], actual: &[u8]) -> Option<usize> {
    expected
        .iter()
        .zip(actual)
        .position(|(a, b)| a != b)
        .or_else(|| (expected.len() != actual.len()).then(|| expected.len().min(actual.len())))
}

fn mismatch(path: &Path, reason: String) -> CliError {
    CliError::RoundtripMismatch {
        path: path.display().to_string(),
        reason,
    }
}
