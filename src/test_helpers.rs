//! Shared test utilities.
//!
//! [`SiteFixture`] owns a temp directory laid out like a real project:
//!
//! ```text
//! <tmp>/input/global.json
//! <tmp>/output/
//! ```
//!
//! ```rust
//! let site = SiteFixture::with_globals(r#"{"site": "Example"}"#);
//! site.write("index.html", "<h1>{{ site }}</h1>");
//! site.build();
//! assert_eq!(site.read_output("index.html"), "<h1>Example</h1>");
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::build::{self, BuildError, BuildOptions, BuildSummary, FileEvent};

pub struct SiteFixture {
    _tmp: TempDir,
    pub options: BuildOptions,
}

impl SiteFixture {
    /// Empty site with `global.json` holding `{}`.
    pub fn new() -> Self {
        Self::with_globals("{}")
    }

    pub fn with_globals(json: &str) -> Self {
        let site = Self::without_globals();
        site.write("global.json", json);
        site
    }

    /// Site whose input root exists but has no global variables file.
    pub fn without_globals() -> Self {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("input");
        fs::create_dir_all(&input).unwrap();
        let options = BuildOptions::new(input, tmp.path().join("output"));
        Self { _tmp: tmp, options }
    }

    pub fn input(&self) -> &Path {
        &self.options.input
    }

    pub fn output(&self) -> &Path {
        &self.options.output
    }

    /// Write a file under the input root, creating directories.
    pub fn write(&self, rel: &str, content: &str) {
        let path = self.input().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    pub fn try_build(&self) -> Result<BuildSummary, BuildError> {
        build::build(&self.options, |_| {})
    }

    /// Build, panicking on a fatal error.
    pub fn build(&self) -> BuildSummary {
        self.try_build()
            .unwrap_or_else(|e| panic!("build failed: {e}"))
    }

    /// Build and collect every per-file event in order.
    pub fn build_events(&self) -> Vec<FileEvent> {
        let mut events = Vec::new();
        build::build(&self.options, |e| events.push(e.clone()))
            .unwrap_or_else(|e| panic!("build failed: {e}"));
        events
    }

    pub fn read_output(&self, rel: &str) -> String {
        let path = self.output().join(rel);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("cannot read output {}: {e}", path.display()))
    }

    pub fn output_exists(&self, rel: &str) -> bool {
        self.output().join(rel).exists()
    }
}
