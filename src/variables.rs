//! Page variable resolution.
//!
//! Every page sees one [`VariableSet`], built fresh for that page by layering
//! sources in increasing precedence:
//!
//! | Layer | Source |
//! |-------|--------|
//! | 1 | builtin defaults: recognized keys present as `null` |
//! | 2 | the page's own front-matter |
//! | 3 | the global variables file (`input/global.json`) |
//! | 4 | files listed in `use`, in list order |
//! | 5 | files listed in `use_builtin`, in list order |
//!
//! Merging is shallow: a later layer replaces a key's whole value, nested
//! objects included. Reading a key that no layer set yields `null`, so
//! templates can test `render == false` on pages that never mention it.
//!
//! Note that globals override front-matter. A page customizes its output by
//! pulling in variable files with `use`, not by shadowing globals.
//!
//! Layers 1 to 3 ([`Resolver::base`]) always succeed and are enough to decide
//! `render` and `format`. The include layers ([`Resolver::include_files`])
//! read files and can fail, so a page switched off with `render: false` never
//! gets that far.

use crate::scan;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Front-matter key that suppresses output when explicitly `false`.
pub const RENDER: &str = "render";
/// Front-matter key selecting the body format.
pub const FORMAT: &str = "format";
/// Front-matter key listing variable files to merge.
pub const USE: &str = "use";
/// Front-matter key listing builtin variable files, merged after `use`.
pub const USE_BUILTIN: &str = "use_builtin";

const RECOGNIZED_KEYS: &[&str] = &[RENDER, FORMAT, USE, USE_BUILTIN];

static NULL: Value = Value::Null;

#[derive(Error, Debug)]
pub enum VariableError {
    #[error("cannot read variables file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("variables file {0} must contain a JSON object")]
    NotAnObject(PathBuf),
    #[error("`{key}` must be a list of file paths, got {value}")]
    InvalidIncludeList { key: &'static str, value: Value },
    #[error("variables file {0:?} points outside the input directory")]
    OutsideRoot(String),
}

/// The merged variables visible to one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct VariableSet(Map<String, Value>);

impl VariableSet {
    /// Layer 1: every recognized key present with a `null` value.
    pub fn builtin() -> Self {
        Self(
            RECOGNIZED_KEYS
                .iter()
                .map(|key| (key.to_string(), Value::Null))
                .collect(),
        )
    }

    /// Value of `key`, or `null` when no layer set it.
    pub fn get(&self, key: &str) -> &Value {
        self.0.get(key).unwrap_or(&NULL)
    }

    /// Shallow merge: every key of `layer` overwrites the current value.
    pub fn merge(&mut self, layer: Map<String, Value>) {
        self.0.extend(layer);
    }

    /// `false` only when `render` is explicitly the boolean `false`.
    pub fn should_render(&self) -> bool {
        !matches!(self.get(RENDER), Value::Bool(false))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// File paths listed under `key` (`use` or `use_builtin`).
    ///
    /// `null` and `[]` mean nothing to merge. Anything else that is not a
    /// list of strings is rejected.
    pub fn include_list(&self, key: &'static str) -> Result<Vec<String>, VariableError> {
        let value = self.get(key);
        let invalid = || VariableError::InvalidIncludeList {
            key,
            value: value.clone(),
        };
        match value {
            Value::Null => Ok(Vec::new()),
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string).ok_or_else(|| invalid()))
                .collect(),
            _ => Err(invalid()),
        }
    }
}

impl From<Map<String, Value>> for VariableSet {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Load a JSON file that must hold an object.
pub fn load_object(path: &Path) -> Result<Map<String, Value>, VariableError> {
    let content = fs::read_to_string(path).map_err(|source| VariableError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&content).map_err(|source| VariableError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(VariableError::NotAnObject(path.to_path_buf())),
    }
}

/// Load the global variables file. Its absence is the caller's fatal error.
pub fn load_globals(input_root: &Path, global_file: &str) -> Result<VariableSet, VariableError> {
    load_object(&input_root.join(global_file)).map(VariableSet::from)
}

/// Parse front-matter text into an object.
///
/// A blank header is an empty object. Malformed JSON, or JSON that is not an
/// object, is logged with the page path and raw text and also treated as
/// empty: one bad page header never stops a build.
pub fn parse_header(header: &str, page: &Path) -> Map<String, Value> {
    if header.trim().is_empty() {
        return Map::new();
    }
    match serde_json::from_str::<Value>(header) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            tracing::warn!(
                page = %page.display(),
                content = header,
                "front-matter is not a JSON object ({}), ignoring it",
                json_kind(&other)
            );
            Map::new()
        }
        Err(err) => {
            tracing::warn!(
                page = %page.display(),
                content = header,
                "invalid front-matter JSON, ignoring it: {err}"
            );
            Map::new()
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Builds per-page variable sets against one input root and one set of
/// globals.
#[derive(Debug)]
pub struct Resolver<'a> {
    input_root: &'a Path,
    globals: &'a VariableSet,
}

impl<'a> Resolver<'a> {
    pub fn new(input_root: &'a Path, globals: &'a VariableSet) -> Self {
        Self {
            input_root,
            globals,
        }
    }

    /// Layers 1 to 3 for the page at `page` (relative to the input root)
    /// with front-matter `header`.
    pub fn base(&self, page: &Path, header: &str) -> VariableSet {
        let mut vars = VariableSet::builtin();
        vars.merge(parse_header(header, page));
        vars.merge(self.globals.0.clone());
        vars
    }

    /// Layers 4 and 5: merge the files listed in `use`, then those listed in
    /// `use_builtin` as it stands after the `use` merges.
    pub fn include_files(&self, vars: &mut VariableSet) -> Result<(), VariableError> {
        for key in [USE, USE_BUILTIN] {
            for file in vars.include_list(key)? {
                if !scan::stays_inside_root(Path::new(&file)) {
                    return Err(VariableError::OutsideRoot(file));
                }
                vars.merge(load_object(&self.input_root.join(&file))?);
            }
        }
        Ok(())
    }

    /// All five layers.
    pub fn resolve(&self, page: &Path, header: &str) -> Result<VariableSet, VariableError> {
        let mut vars = self.base(page, header);
        self.include_files(&mut vars)?;
        Ok(vars)
    }
}
