//! Test fixture helpers for fake Next.js build output
//!
//! A [`NextBuild`] is a temporary app directory holding a `package.json` and
//! a `.next` build directory with whichever manifests and chunks a test
//! writes into it.

#![allow(dead_code)]

use next_bundle_report::bundle::measurer::gzipped_size;
use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Re-export anyhow for convenience
pub use anyhow;

/// A temporary Next.js app with a `.next` build directory
pub struct NextBuild {
    temp_dir: TempDir,
    app_dir: PathBuf,
    pages: Map<String, Value>,
}

impl NextBuild {
    /// Create an app named `name` with an empty pages router build
    pub fn new(name: &str) -> anyhow::Result<Self> {
        let temp_dir = TempDir::new()?;
        let app_dir = temp_dir.path().join(name);
        fs::create_dir_all(app_dir.join(".next"))?;
        fs::write(
            app_dir.join("package.json"),
            json!({ "name": name, "private": true }).to_string(),
        )?;

        let build = Self {
            temp_dir,
            app_dir,
            pages: Map::new(),
        };
        build.manifest("react-loadable-manifest.json", json!({}))?;
        build.write_build_manifest(None)?;
        Ok(build)
    }

    /// The app's working directory
    pub fn working_dir(&self) -> &Path {
        &self.app_dir
    }

    /// The `.next` directory
    pub fn build_dir(&self) -> PathBuf {
        self.app_dir.join(".next")
    }

    /// A scratch directory next to the app, for artifacts and reports
    pub fn scratch_dir(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Write a chunk below `.next`
    pub fn chunk(&self, file: &str, contents: &str) -> anyhow::Result<()> {
        let path = self.build_dir().join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
        Ok(())
    }

    /// Add a pages router page whose only file is `file`
    pub fn page(mut self, route: &str, files: &[&str], contents: &str) -> anyhow::Result<Self> {
        for file in files {
            self.chunk(file, contents)?;
        }
        self.pages.insert(route.to_string(), json!(files));
        self.write_build_manifest(None)?;
        Ok(self)
    }

    /// Write any manifest below `.next`
    pub fn manifest(&self, name: &str, value: Value) -> anyhow::Result<()> {
        fs::write(self.build_dir().join(name), serde_json::to_string_pretty(&value)?)?;
        Ok(())
    }

    /// Rewrite `build-manifest.json`, optionally with `rootMainFiles`
    pub fn write_build_manifest(&self, root_main_files: Option<&[&str]>) -> anyhow::Result<()> {
        let mut manifest = json!({ "pages": Value::Object(self.pages.clone()) });
        if let Some(files) = root_main_files {
            manifest["rootMainFiles"] = json!(files);
        }
        self.manifest("build-manifest.json", manifest)
    }

    /// Add an app router setup: shared root files, one page and one layout
    pub fn with_app_router(self) -> anyhow::Result<Self> {
        self.chunk("static/chunks/main-app.js", &"shared();".repeat(200))?;
        self.chunk("static/chunks/app/page.js", &"home();".repeat(80))?;
        self.chunk("static/chunks/app/layout.js", &"layout();".repeat(40))?;
        self.chunk("static/css/app.css", "body{margin:0}")?;

        self.write_build_manifest(Some(&["static/chunks/main-app.js"]))?;
        self.manifest(
            "app-build-manifest.json",
            json!({
                "pages": {
                    "/page": [
                        "static/chunks/main-app.js",
                        "static/chunks/app/page.js",
                        "static/css/app.css"
                    ],
                    "/layout": ["static/chunks/main-app.js", "static/chunks/app/layout.js"]
                }
            }),
        )?;
        self.manifest(
            "app-path-routes-manifest.json",
            json!({ "/page": "/", "/layout": "/", "/api/route": "/api" }),
        )?;
        Ok(self)
    }

    /// Gzipped size of a chunk already written below `.next`
    pub fn gz(&self, file: &str) -> u64 {
        gzipped_size(&fs::read(self.build_dir().join(file)).expect("chunk exists"))
            .expect("gzip in memory")
    }
}

/// Write a snapshot document to `path`
pub fn write_snapshot(path: &Path, sha: &str, data: &[(&str, u64)]) -> anyhow::Result<()> {
    let data: Vec<Value> = data
        .iter()
        .map(|(page, size)| json!({ "page": page, "size": size }))
        .collect();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json!({ "sha": sha, "data": data }).to_string())?;
    Ok(())
}
