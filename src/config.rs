//! Site configuration module.
//!
//! Handles loading, validating, and merging `makeweb.toml`. The file is
//! optional: without it every setting takes its stock default, which matches
//! the classic `input/` + `global.json` layout.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! global_file = "global.json"   # Global variables, relative to the input root
//!
//! [suffixes]
//! source = [".html", ".htm", ".source", ".md"]  # Rendered as pages
//! ignore = [".json", ".template"]               # Never copied to output
//! template_only = [".template"]                 # Never rendered on their own
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse, override just the values you want:
//!
//! ```toml
//! [suffixes]
//! source = [".html", ".md", ".markdown"]
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::scan;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `makeweb.toml`.
///
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Path of the global variables file, relative to the input root.
    pub global_file: String,
    /// File classification by suffix.
    pub suffixes: SuffixConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            global_file: "global.json".to_string(),
            suffixes: SuffixConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !scan::stays_inside_root(Path::new(&self.global_file)) {
            return Err(ConfigError::Validation(format!(
                "global_file must be a relative path inside the input root, got {:?}",
                self.global_file
            )));
        }
        for (key, list) in [
            ("suffixes.source", &self.suffixes.source),
            ("suffixes.ignore", &self.suffixes.ignore),
            ("suffixes.template_only", &self.suffixes.template_only),
        ] {
            if let Some(bad) = list.iter().find(|s| !is_valid_suffix(s)) {
                return Err(ConfigError::Validation(format!(
                    "{key} entries must look like \".ext\", got {bad:?}"
                )));
            }
        }
        Ok(())
    }
}

fn is_valid_suffix(suffix: &str) -> bool {
    suffix.len() > 1 && suffix.starts_with('.') && !suffix[1..].contains(['.', '/', '\\'])
}

/// Suffix lists driving file classification.
///
/// Suffixes include the leading dot and are compared case-sensitively against
/// the last extension of a file name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuffixConfig {
    /// Files rendered as pages.
    pub source: Vec<String>,
    /// Files never copied to the output (variable files, fragments).
    pub ignore: Vec<String>,
    /// Source files that only exist to be included by other templates.
    pub template_only: Vec<String>,
}

impl Default for SuffixConfig {
    fn default() -> Self {
        Self {
            source: [".html", ".htm", ".source", ".md"].map(String::from).to_vec(),
            ignore: [".json", ".template"].map(String::from).to_vec(),
            template_only: vec![".template".to_string()],
        }
    }
}

impl SuffixConfig {
    pub fn is_source(&self, suffix: &str) -> bool {
        self.source.iter().any(|s| s == suffix)
    }

    pub fn is_ignored(&self, suffix: &str) -> bool {
        self.ignore.iter().any(|s| s == suffix)
    }

    pub fn is_template_only(&self, suffix: &str) -> bool {
        self.template_only.iter().any(|s| s == suffix)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely, so a suffix
///   list in the overlay replaces the stock list instead of extending it.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load config from the given file.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let merged = match load_raw_config(path)? {
        Some(overlay) => merge_toml(stock_defaults_value(), overlay),
        None => stock_defaults_value(),
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `makeweb.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# makeweb configuration
# =====================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# Global variables shared by every page, relative to the input root.
# The file is required: a build without it stops before rendering anything.
global_file = "global.json"

# ---------------------------------------------------------------------------
# File classification
# ---------------------------------------------------------------------------
# Suffixes include the leading dot and match the last extension, exactly.
# Anything that is neither a source nor ignored is hard-linked into the output.
[suffixes]
# Rendered as pages: front-matter, format conversion, templates.
source = [".html", ".htm", ".source", ".md"]

# Never copied to the output.
ignore = [".json", ".template"]

# Fragments for include/extends only. Never rendered on their own, even when
# the suffix is also listed under `source`.
template_only = [".template"]
"##
}
