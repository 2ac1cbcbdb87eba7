//! Template rendering with [MiniJinja](https://docs.rs/minijinja).
//!
//! A page's converted body is its main template. Anything it pulls in with
//! `{% include %}`, `{% extends %}` or `{% import %}` is requested from the
//! environment's loader, which reads it from the input root by relative path
//! with front-matter stripped, so a partial can carry its own header without
//! leaking it into the output.
//!
//! Names no layer defines are undefined, not errors: they print as nothing,
//! test false, and attribute lookups on them stay undefined.
//!
//! Auto-escaping follows MiniJinja's default: on for templates named
//! `*.html`, `*.htm` and `*.xml`. Variable values are escaped there; a layout
//! inserts trusted HTML with `{{ content | safe }}`.
//!
//! Loaded partials are cached for the run and reloaded when the file behind
//! them changes ([`LoadedTemplate::is_fresh`]).

use crate::frontmatter;
use crate::scan;
use crate::variables::VariableSet;
use minijinja::{Environment, ErrorKind, UndefinedBehavior};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("template {0:?} not found")]
    NotFound(String),
    #[error("template name {0:?} points outside the input directory")]
    OutsideRoot(String),
    #[error("cannot read template {name:?}: {source}")]
    Io {
        name: String,
        source: std::io::Error,
    },
    #[error("template error in {name:?}: {message}")]
    Template { name: String, message: String },
}

impl RenderError {
    fn template(name: &str, err: &minijinja::Error) -> Self {
        RenderError::Template {
            name: name.to_string(),
            message: error_chain(err),
        }
    }
}

/// Errors raised inside an included template (or by the loader) arrive as
/// the source of the top-level error.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Template source read from disk, front-matter removed.
#[derive(Debug, Clone)]
pub struct LoadedTemplate {
    pub name: String,
    pub source: String,
    path: PathBuf,
    mtime: Option<SystemTime>,
}

impl LoadedTemplate {
    /// Whether the file behind this template is unchanged since it was loaded.
    ///
    /// A file whose modification time cannot be read is never fresh.
    pub fn is_fresh(&self) -> bool {
        match (self.mtime, modified(&self.path)) {
            (Some(loaded), Some(current)) => loaded == current,
            _ => false,
        }
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Loads templates by name from the input root.
#[derive(Debug, Clone)]
pub struct TemplateLoader {
    root: PathBuf,
}

impl TemplateLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve `name` (a `/`-separated path relative to the root) to a file.
    fn path_for(&self, name: &str) -> Result<PathBuf, RenderError> {
        let rel = Path::new(name);
        if !scan::stays_inside_root(rel) {
            return Err(RenderError::OutsideRoot(name.to_string()));
        }
        Ok(self.root.join(rel))
    }

    pub fn load(&self, name: &str) -> Result<LoadedTemplate, RenderError> {
        let path = self.path_for(name)?;
        let mtime = modified(&path);
        let text = fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                RenderError::NotFound(name.to_string())
            } else {
                RenderError::Io {
                    name: name.to_string(),
                    source,
                }
            }
        })?;
        Ok(LoadedTemplate {
            name: name.to_string(),
            source: frontmatter::body(&text).to_string(),
            path,
            mtime,
        })
    }
}

/// Partials loaded during the run, shared with the environment's loader.
#[derive(Debug)]
struct TemplateCache {
    loader: TemplateLoader,
    loaded: Mutex<BTreeMap<String, LoadedTemplate>>,
}

impl TemplateCache {
    /// Source of `name`, or `None` when no such file exists.
    fn source(&self, name: &str) -> Result<Option<String>, RenderError> {
        let mut loaded = self.loaded.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(template) = loaded.get(name) {
            if template.is_fresh() {
                return Ok(Some(template.source.clone()));
            }
            tracing::debug!(template = name, "template changed on disk, reloading");
        }
        match self.loader.load(name) {
            Ok(template) => {
                let source = template.source.clone();
                loaded.insert(name.to_string(), template);
                Ok(Some(source))
            }
            // MiniJinja reports the missing template itself, unless the
            // include says `ignore missing`.
            Err(RenderError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

/// Renders pages through MiniJinja, loading partials on demand.
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    pub fn new(input_root: impl Into<PathBuf>) -> Self {
        let cache = Arc::new(TemplateCache {
            loader: TemplateLoader::new(input_root),
            loaded: Mutex::new(BTreeMap::new()),
        });

        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Chainable);
        // Output mirrors the source byte for byte, final newline included.
        env.set_keep_trailing_newline(true);
        env.set_loader(move |name| {
            cache.source(name).map_err(|err| {
                minijinja::Error::new(
                    ErrorKind::InvalidOperation,
                    format!("cannot load template {name:?}"),
                )
                .with_source(err)
            })
        });
        Self { env }
    }

    /// Render `body` as the template `name` with `vars` as context.
    ///
    /// `name` decides auto-escaping and is the name other templates would
    /// use to include this page.
    pub fn render_page(
        &mut self,
        name: &str,
        body: &str,
        vars: &VariableSet,
    ) -> Result<String, RenderError> {
        // Parsed templates from the previous page go; the loader hands back
        // cached sources and rereads only files that changed.
        self.env.clear_templates();
        self.env
            .add_template_owned(name.to_string(), body.to_string())
            .map_err(|e| RenderError::template(name, &e))?;
        let template = self
            .env
            .get_template(name)
            .map_err(|e| RenderError::template(name, &e))?;
        template
            .render(vars)
            .map_err(|e| RenderError::template(name, &e))
    }
}
