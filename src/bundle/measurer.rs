//! Gzipped artifact size measurement

use crate::error::BundleReportError;
use crate::infra::{FileSystem, RealFileSystem};
use flate2::write::GzEncoder;
use flate2::Compression;
use log::trace;
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Measures gzipped sizes of build artifacts.
///
/// Shared chunks are referenced by many pages, so results are cached by the
/// manifest-relative file path. The cache lives exactly as long as the
/// measurer; build a new one for every run.
#[derive(Debug)]
pub struct SizeMeasurer<FS: FileSystem = RealFileSystem> {
    build_dir: PathBuf,
    fs: FS,
    cache: HashMap<String, u64>,
}

impl SizeMeasurer<RealFileSystem> {
    /// Create a measurer reading artifacts below `build_dir`
    pub fn new(build_dir: &Path) -> Self {
        Self::with_fs(build_dir, RealFileSystem)
    }
}

impl<FS: FileSystem> SizeMeasurer<FS> {
    /// Create a measurer with a custom filesystem implementation
    pub fn with_fs(build_dir: &Path, fs: FS) -> Self {
        Self {
            build_dir: build_dir.to_path_buf(),
            fs,
            cache: HashMap::new(),
        }
    }

    /// Gzipped size in bytes of one artifact, path relative to the build dir
    pub fn measure(&mut self, file: &str) -> Result<u64, BundleReportError> {
        if let Some(&size) = self.cache.get(file) {
            return Ok(size);
        }

        let path = self.build_dir.join(file);
        let bytes = self.fs.read(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                BundleReportError::ArtifactNotFound { path: path.clone() }
            } else {
                BundleReportError::Io {
                    context: format!("reading {}", path.display()),
                    source,
                }
            }
        })?;

        let size = gzipped_size(&bytes).map_err(|source| BundleReportError::Io {
            context: format!("compressing {}", path.display()),
            source,
        })?;
        trace!("{} -> {} bytes gzipped", file, size);

        self.cache.insert(file.to_string(), size);
        Ok(size)
    }

    /// Sum of the gzipped sizes of `files`
    pub fn measure_all<'a, I>(&mut self, files: I) -> Result<u64, BundleReportError>
    where
        I: IntoIterator<Item = &'a String>,
    {
        files
            .into_iter()
            .try_fold(0u64, |total, file| Ok(total + self.measure(file)?))
    }

    /// Number of distinct artifacts measured so far
    pub fn cached_files(&self) -> usize {
        self.cache.len()
    }
}

/// Length of `bytes` after gzip compression at the default level
pub fn gzipped_size(bytes: &[u8]) -> io::Result<u64> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tempfile::TempDir;

    struct CountingFileSystem {
        reads: Cell<usize>,
    }

    impl FileSystem for CountingFileSystem {
        fn read(&self, _path: &Path) -> io::Result<Vec<u8>> {
            self.reads.set(self.reads.get() + 1);
            Ok(b"export default function Page() { return null }".to_vec())
        }

        fn read_to_string(&self, _path: &Path) -> io::Result<String> {
            unimplemented!()
        }

        fn write(&self, _path: &Path, _contents: impl AsRef<[u8]>) -> io::Result<()> {
            unimplemented!()
        }

        fn create_dir_all(&self, _path: &Path) -> io::Result<()> {
            unimplemented!()
        }
    }

    #[test]
    fn test_measure_returns_gzipped_length() {
        let temp_dir = TempDir::new().unwrap();
        let content = "var a = 1;\n".repeat(500);
        std::fs::write(temp_dir.path().join("main.js"), &content).unwrap();

        let mut measurer = SizeMeasurer::new(temp_dir.path());
        let size = measurer.measure("main.js").unwrap();

        assert_eq!(size, gzipped_size(content.as_bytes()).unwrap());
        assert!(size < content.len() as u64, "repetitive input should compress");
    }

    #[test]
    fn test_measure_caches_by_file_path() {
        let fs = CountingFileSystem {
            reads: Cell::new(0),
        };
        let mut measurer = SizeMeasurer::with_fs(Path::new("/build"), &fs);

        let first = measurer.measure("static/chunks/main.js").unwrap();
        let second = measurer.measure("static/chunks/main.js").unwrap();
        measurer.measure("static/chunks/other.js").unwrap();

        assert_eq!(first, second);
        assert_eq!(fs.reads.get(), 2);
        assert_eq!(measurer.cached_files(), 2);
    }

    #[test]
    fn test_fresh_measurer_does_not_share_cache() {
        let fs = CountingFileSystem {
            reads: Cell::new(0),
        };

        SizeMeasurer::with_fs(Path::new("/build"), &fs)
            .measure("a.js")
            .unwrap();
        SizeMeasurer::with_fs(Path::new("/build"), &fs)
            .measure("a.js")
            .unwrap();

        assert_eq!(fs.reads.get(), 2);
    }

    #[test]
    fn test_measure_missing_artifact_is_artifact_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let mut measurer = SizeMeasurer::new(temp_dir.path());

        let err = measurer.measure("static/chunks/gone.js").unwrap_err();

        match err {
            BundleReportError::ArtifactNotFound { path } => {
                assert!(path.ends_with("static/chunks/gone.js"))
            }
            other => panic!("expected ArtifactNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_measure_all_sums_and_handles_empty_lists() {
        let fs = CountingFileSystem {
            reads: Cell::new(0),
        };
        let mut measurer = SizeMeasurer::with_fs(Path::new("/build"), &fs);
        let one = measurer.measure("a.js").unwrap();

        let files = vec!["a.js".to_string(), "b.js".to_string()];
        assert_eq!(measurer.measure_all(&files).unwrap(), one * 2);
        assert_eq!(measurer.measure_all(&Vec::<String>::new()).unwrap(), 0);
    }
}
