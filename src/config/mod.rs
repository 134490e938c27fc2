//! `.bundle-report.toml` configuration
//!
//! Every key is optional; command-line flags override whatever the file sets.

pub mod file;
pub mod loader;

pub use file::{ConfigFile, CONFIG_FILE_NAME};
pub use loader::ConfigLoader;
