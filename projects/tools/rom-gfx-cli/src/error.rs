use rom_gfx_common::CodecError;
use rom_gfx_ngp2bpp::SessionError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("Memory mapping failed: {0}")]
    MmapError(String),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Session(#[from] SessionError<io::Error>),
    #[error("Path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),
    #[error("Raw pixel file is {len} bytes, which is not a whole number of {width} pixel wide rows")]
    RawPixelSize { len: usize, width: u32 },
    #[error("{path}: {reason}")]
    RoundtripMismatch { path: String, reason: String },
    #[error("{failed} of {total} files failed the roundtrip")]
    RoundtripFailed { failed: usize, total: usize },
}
