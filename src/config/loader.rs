//! Configuration file loading

use super::file::{ConfigFile, CONFIG_FILE_NAME};
use crate::error::BundleReportError;
use crate::infra::{FileSystem, RealFileSystem};
use log::debug;
use std::io;
use std::path::Path;

/// Handles loading configuration files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config from `.bundle-report.toml` in the given directory
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use next_bundle_report::config::ConfigLoader;
    /// use std::path::Path;
    ///
    /// let config = ConfigLoader::load(Path::new("."))?;
    /// println!("Reference branch: {}", config.default_branch);
    /// # Ok::<(), next_bundle_report::error::BundleReportError>(())
    /// ```
    pub fn load(working_dir: &Path) -> Result<ConfigFile, BundleReportError> {
        Self::load_with_fs(working_dir, &RealFileSystem)
    }

    /// Load config with a custom filesystem implementation
    pub fn load_with_fs<FS: FileSystem>(
        working_dir: &Path,
        fs: &FS,
    ) -> Result<ConfigFile, BundleReportError> {
        let config_path = working_dir.join(CONFIG_FILE_NAME);

        let contents = match fs.read_to_string(&config_path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No {} found, using defaults", CONFIG_FILE_NAME);
                return Ok(ConfigFile::default());
            }
            Err(source) => {
                return Err(BundleReportError::Io {
                    context: format!("reading {}", config_path.display()),
                    source,
                });
            }
        };

        toml_edit::de::from_str(&contents).map_err(|e| BundleReportError::Config {
            path: config_path,
            message: e.to_string().trim().to_string(),
        })
    }
}
