//! Error types with contextual suggestions
//!
//! Every fatal condition of a run surfaces as a single [`BundleReportError`]
//! (usually wrapped in an `anyhow::Error` with extra context). The CLI renders
//! it once through [`ErrorFormatter`] and exits with [`BundleReportError::exit_code`].
//!
//! A missing *optional* manifest is not an error: the loader substitutes an
//! empty manifest and keeps going.
//! During a run, a manifest that only one category reads is not fatal either:
//! that category is skipped and the others are still reported.
//!
//! # Examples
//!
//! ```
//! use next_bundle_report::error::BundleReportError;
//! use std::path::PathBuf;
//!
//! let err = BundleReportError::ArtifactNotFound {
//!     path: PathBuf::from(".next/static/chunks/main.js"),
//! };
//! assert_eq!(err.exit_code(), 66);
//! assert!(err.suggestion().unwrap().contains("next build"));
//! ```

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while measuring, comparing or publishing bundle sizes
#[derive(Error, Debug)]
pub enum BundleReportError {
    /// A required build manifest could not be read
    #[error("Required manifest not found: {path}")]
    MissingManifest {
        /// Path to the manifest
        path: PathBuf,
        #[source]
        /// IO error source
        source: std::io::Error,
    },

    /// A required build manifest exists but is not valid JSON of the expected shape
    #[error("Invalid manifest: {path}")]
    InvalidManifest {
        /// Path to the manifest
        path: PathBuf,
        #[source]
        /// JSON error source
        source: serde_json::Error,
    },

    /// A build artifact referenced by a manifest does not exist on disk
    #[error("Build artifact not found: {path}")]
    ArtifactNotFound {
        /// Path to the missing artifact
        path: PathBuf,
    },

    /// A route in the app path routes manifest has no app build manifest entry
    #[error("Route '{route}' maps to '{fs_path}', which is missing from the app build manifest")]
    BrokenRouteMapping {
        /// File-system route key, e.g. `/about/page`
        fs_path: String,
        /// Public route, e.g. `/about`
        route: String,
    },

    /// Creating or updating the published report failed
    #[error("Failed to publish {target}: {message}")]
    Publish {
        /// What was being published (comment or issue)
        target: String,
        /// Failure description
        message: String,
    },

    /// Configuration file could not be parsed
    #[error("Invalid configuration in {path}: {message}")]
    Config {
        /// Path to the configuration file
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// Generic I/O error with context
    #[error("I/O error: {context}")]
    Io {
        /// Context about where the error occurred
        context: String,
        #[source]
        /// IO error source
        source: std::io::Error,
    },
}

impl BundleReportError {
    /// Get actionable suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::MissingManifest { path, .. } => Some(format!(
                "Run 'next build' before measuring, and check that --working-dir points at the app ({} was expected)",
                path.display()
            )),
            Self::InvalidManifest { .. } => Some(
                "The build output looks truncated or was produced by an unsupported Next.js version; rebuild and retry"
                    .to_string(),
            ),
            Self::ArtifactNotFound { .. } => Some(
                "The build output is incomplete. Re-run 'next build' and measure the same output directory"
                    .to_string(),
            ),
            Self::BrokenRouteMapping { .. } => Some(
                "app-path-routes-manifest.json and app-build-manifest.json are out of sync; run a clean 'next build'"
                    .to_string(),
            ),
            Self::Publish { .. } => {
                Some("Check the report destination is writable and retry the job".to_string())
            }
            Self::Config { .. } => {
                Some("Fix the syntax in .bundle-report.toml or remove the file to use defaults".to_string())
            }
            Self::Io { context, .. } => Some(format!(
                "Check file permissions and that {} is accessible",
                context
            )),
        }
    }

    /// Manifest that could not be loaded, for the manifest variants
    pub fn manifest_path(&self) -> Option<&Path> {
        match self {
            Self::MissingManifest { path, .. } | Self::InvalidManifest { path, .. } => {
                Some(path)
            }
            _ => None,
        }
    }

    /// Get appropriate exit code for this error, following sysexits.h conventions.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingManifest { .. } => 66,    // EX_NOINPUT
            Self::InvalidManifest { .. } => 65,    // EX_DATAERR
            Self::ArtifactNotFound { .. } => 66,   // EX_NOINPUT
            Self::BrokenRouteMapping { .. } => 65, // EX_DATAERR
            Self::Publish { .. } => 1,
            Self::Config { .. } => 78, // EX_CONFIG
            Self::Io { .. } => 74,     // EX_IOERR
        }
    }
}

/// Error formatter with colors and structured output
pub struct ErrorFormatter;

impl ErrorFormatter {
    /// Format error with its cause chain and a suggestion when one is known
    pub fn format(error: &anyhow::Error) -> String {
        use console::style;

        let mut output = String::new();

        output.push_str(&format!("{} {}\n", style("error:").red().bold(), error));

        let mut source = error.source();
        let mut indent = 1;
        while let Some(err) = source {
            output.push_str(&format!(
                "{}{} {}\n",
                "  ".repeat(indent),
                style("caused by:").yellow(),
                err
            ));
            source = err.source();
            indent += 1;
        }

        if let Some(report_error) = Self::find(error) {
            if let Some(suggestion) = report_error.suggestion() {
                output.push_str(&format!(
                    "\n{} {}\n",
                    style("help:").cyan().bold(),
                    suggestion
                ));
            }
        }

        output
    }

    /// Get exit code from error
    pub fn exit_code(error: &anyhow::Error) -> i32 {
        Self::find(error).map_or(1, BundleReportError::exit_code)
    }

    // The typed error may sit under one or more `.context(...)` layers
    fn find(error: &anyhow::Error) -> Option<&BundleReportError> {
        error
            .chain()
            .find_map(|cause| cause.downcast_ref::<BundleReportError>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    fn all_variants() -> Vec<BundleReportError> {
        vec![
            BundleReportError::MissingManifest {
                path: PathBuf::from(".next/build-manifest.json"),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
            },
            BundleReportError::InvalidManifest {
                path: PathBuf::from(".next/build-manifest.json"),
                source: serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
            },
            BundleReportError::ArtifactNotFound {
                path: PathBuf::from(".next/static/chunks/main.js"),
            },
            BundleReportError::BrokenRouteMapping {
                fs_path: "/about/page".to_string(),
                route: "/about".to_string(),
            },
            BundleReportError::Publish {
                target: "comment".to_string(),
                message: "denied".to_string(),
            },
            BundleReportError::Config {
                path: PathBuf::from(".bundle-report.toml"),
                message: "expected `=`".to_string(),
            },
            BundleReportError::Io {
                context: "writing snapshot".to_string(),
                source: std::io::Error::other("disk full"),
            },
        ]
    }

    #[test]
    fn test_all_error_variants_have_exit_codes() {
        for err in all_variants() {
            let exit_code = err.exit_code();
            assert!(exit_code > 0, "Error {:?} should have non-zero exit code", err);
            assert!(exit_code < 256, "Exit code should fit in a byte");
        }
    }

    #[test]
    fn test_all_error_variants_have_suggestions() {
        for err in &all_variants() {
            let suggestion = err.suggestion();
            assert!(suggestion.is_some(), "Error {:?} should have a suggestion", err);
            assert!(!suggestion.unwrap().is_empty());
        }
    }

    #[test]
    fn test_missing_manifest_suggestion_names_path() {
        let err = BundleReportError::MissingManifest {
            path: PathBuf::from("web/.next/build-manifest.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };

        let suggestion = err.suggestion().unwrap();
        assert!(suggestion.contains("web/.next/build-manifest.json"));
        assert!(suggestion.contains("next build"));
    }

    #[test]
    fn test_manifest_path_only_for_manifest_variants() {
        let missing = BundleReportError::MissingManifest {
            path: PathBuf::from(".next/react-loadable-manifest.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let artifact = BundleReportError::ArtifactNotFound {
            path: PathBuf::from(".next/static/chunks/main.js"),
        };

        assert_eq!(
            missing.manifest_path(),
            Some(Path::new(".next/react-loadable-manifest.json"))
        );
        assert_eq!(artifact.manifest_path(), None);
    }

    #[test]
    fn test_broken_route_mapping_message_names_both_keys() {
        let err = BundleReportError::BrokenRouteMapping {
            fs_path: "/blog/[slug]/page".to_string(),
            route: "/blog/[slug]".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("/blog/[slug]/page"));
        assert!(msg.contains("'/blog/[slug]'"));
    }

    #[test]
    fn test_formatter_finds_error_below_context() {
        let result: anyhow::Result<()> = Err(BundleReportError::ArtifactNotFound {
            path: PathBuf::from(".next/static/chunks/a.js"),
        })
        .context("Failed to measure Route (Pages)");
        let err = result.unwrap_err();

        assert_eq!(ErrorFormatter::exit_code(&err), 66);
        let formatted = ErrorFormatter::format(&err);
        assert!(formatted.contains("Failed to measure Route (Pages)"));
        assert!(formatted.contains("caused by:"));
        assert!(formatted.contains("help:"));
    }

    #[test]
    fn test_formatter_generic_error_exit_code() {
        let err = anyhow::anyhow!("something else");
        assert_eq!(ErrorFormatter::exit_code(&err), 1);
        assert!(!ErrorFormatter::format(&err).contains("help:"));
    }
}
