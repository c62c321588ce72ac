use crate::error::CliError;
use lightweight_mmap::handles::*;
use lightweight_mmap::mmap::*;
use rom_gfx_common::{SurplusStore, SurplusTail};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Extension of the sidecar file holding a decoded image's surplus tail.
pub const TAIL_EXTENSION: &str = "tail";

/// Recursively collects every regular file under `dir`, skipping surplus sidecar files.
///
/// Unreadable directories and entries are skipped rather than reported.
pub fn find_all_files(dir: &Path, files: &mut Vec<PathBuf>) -> io::Result<()> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Ok(());
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            find_all_files(&path, files)?;
        } else if path.extension().is_none_or(|ext| ext != TAIL_EXTENSION) {
            files.push(path);
        }
    }
    Ok(())
}

/// Memory maps `path` read-only and passes its contents to `f`.
///
/// Empty files are passed as an empty slice without creating a mapping.
pub fn with_mapped_file<T>(
    path: &Path,
    f: impl FnOnce(&[u8]) -> Result<T, CliError>,
) -> Result<T, CliError> {
    let path_str = path
        .to_str()
        .ok_or_else(|| CliError::NonUtf8Path(path.to_path_buf()))?;
    let handle =
        ReadOnlyFileHandle::open(path_str).map_err(|e| CliError::MmapError(e.to_string()))?;
    let size = handle
        .size()
        .map_err(|e| CliError::MmapError(e.to_string()))? as usize;
    if size == 0 {
        return f(&[]);
    }

    let mapping =
        ReadOnlyMmap::new(&handle, 0, size).map_err(|e| CliError::MmapError(e.to_string()))?;
    f(mapping.as_slice())
}

/// Writes `bytes` to a new file at `path` through a memory mapping, creating parent directories.
pub fn write_mapped_file(path: &Path, bytes: &[u8]) -> Result<(), CliError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    if bytes.is_empty() {
        fs::write(path, bytes)?;
        return Ok(());
    }

    let path_str = path
        .to_str()
        .ok_or_else(|| CliError::NonUtf8Path(path.to_path_buf()))?;
    let handle = ReadWriteFileHandle::create_preallocated(path_str, bytes.len() as i64)
        .map_err(|e| CliError::MmapError(e.to_string()))?;
    let mut mapping = ReadWriteMmap::new(&handle, 0, bytes.len())
        .map_err(|e| CliError::MmapError(e.to_string()))?;
    mapping.as_mut_slice().copy_from_slice(bytes);
    Ok(())
}

/// Default sidecar path for the surplus tail of `output`: `<output>.tail`.
pub fn default_tail_path(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_owned();
    name.push(".");
    name.push(TAIL_EXTENSION);
    PathBuf::from(name)
}

/// Keeps the surplus tail in a sidecar file next to the decoded image.
///
/// An empty tail removes the sidecar, so a stale one never outlives a re-import.
#[derive(Debug, Clone)]
pub struct FileSurplusStore {
    path: PathBuf,
}

impl FileSurplusStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SurplusStore for FileSurplusStore {
    type Error = io::Error;

    fn stash(&mut self, tail: SurplusTail) -> Result<(), Self::Error> {
        if tail.is_empty() {
            return match fs::remove_file(&self.path) {
                Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
                _ => Ok(()),
            };
        }

        log::debug!("Writing {} surplus bytes to {}", tail.len(), self.path.display());
        fs::write(&self.path, tail.as_bytes())
    }

    fn restore(&mut self) -> Result<Option<SurplusTail>, Self::Error> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(SurplusTail::from_bytes(bytes))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[test]
    fn sidecar_store_round_trips() {
        let dir = TempDir::new().unwrap();
        let mut store = FileSurplusStore::new(dir.path().join("image.raw.tail"));
        assert_eq!(store.restore().unwrap(), None);

        let tail = SurplusTail::from_bytes(vec![0xDE, 0xAD, 0xBE]);
        store.stash(tail.clone()).unwrap();
        assert!(store.path().exists());
        assert_eq!(store.restore().unwrap(), Some(tail));
    }

    #[test]
    fn empty_tail_removes_sidecar() {
        let dir = TempDir::new().unwrap();
        let mut store = FileSurplusStore::new(dir.path().join("image.raw.tail"));

        store.stash(SurplusTail::from_bytes(vec![1])).unwrap();
        store.stash(SurplusTail::default()).unwrap();
        assert!(!store.path().exists());
        assert_eq!(store.restore().unwrap(), None);

        // Removing a sidecar that never existed is fine.
        store.stash(SurplusTail::default()).unwrap();
    }

    #[rstest]
    #[case("out/image.raw", "out/image.raw.tail")]
    #[case("image", "image.tail")]
    fn tail_path_appends_extension(#[case] output: &str, #[case] expected: &str) {
        assert_eq!(default_tail_path(Path::new(output)), PathBuf::from(expected));
    }

    #[test]
    fn find_all_files_recurses_and_skips_sidecars() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("a.bin"), [0u8; 16]).unwrap();
        fs::write(dir.path().join("a.bin.tail"), [0u8; 2]).unwrap();
        fs::write(dir.path().join("nested/b.bin"), [0u8; 32]).unwrap();

        let mut files = Vec::new();
        find_all_files(dir.path(), &mut files).unwrap();
        files.sort();
        assert_eq!(
            files,
            vec![dir.path().join("a.bin"), dir.path().join("nested/b.bin")]
        );
    }

    #[test]
    fn mapped_files_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sub/data.bin");
        let bytes: Vec<u8> = (0..=255).collect();

        write_mapped_file(&path, &bytes).unwrap();
        let read = with_mapped_file(&path, |data| Ok(data.to_vec())).unwrap();
        assert_eq!(read, bytes);

        let empty = dir.path().join("empty.bin");
        write_mapped_file(&empty, &[]).unwrap();
        assert!(with_mapped_file(&empty, |data| Ok(data.is_empty())).unwrap());
    }
}
