//! The build pipeline.
//!
//! One sequential pass over the input tree:
//!
//! ```text
//! scan ──┬─ Ignored ─────────────────────────────────────────→ (dropped)
//!        ├─ Asset ───────────────────────────────────────────→ link_asset
//!        └─ Source ─ split → base vars → render? → use files → convert → render_page → write_page
//! ```
//!
//! Failures are contained per page: a bad page is reported and the run moves
//! on. Only environment problems stop the run: a missing input root, a missing
//! or invalid global variables file, an unusable output root, or a Markdown
//! page in a build without Markdown support.

use crate::config::SiteConfig;
use crate::convert::{self, Capabilities, ConvertError, Format};
use crate::frontmatter;
use crate::render::{RenderError, Renderer};
use crate::scan::{self, ScanError, SourceFile, SourceKind};
use crate::variables::{self, FORMAT, Resolver, VariableError, VariableSet};
use crate::write::{self, LinkOutcome};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that stop the whole run.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("global variables: {0}")]
    Globals(#[source] VariableError),
    #[error("cannot create output directory {path}: {source}")]
    OutputRoot {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{0} requests Markdown but this build has no Markdown converter")]
    MarkdownUnavailable(PathBuf),
}

/// Errors confined to one page.
#[derive(Error, Debug)]
pub enum PageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Variables(#[from] VariableError),
    #[error(transparent)]
    Convert(#[from] ConvertError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Where to read, where to write, and with what.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub config: SiteConfig,
    pub capabilities: Capabilities,
}

impl BuildOptions {
    /// Stock config and the capabilities compiled into this binary.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            config: SiteConfig::default(),
            capabilities: Capabilities::detect(),
        }
    }
}

/// Why a source page produced no output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// `render` is `false`.
    RenderDisabled,
    /// The suffix marks a fragment used only by other templates.
    TemplateOnly,
}

/// Per-file progress, emitted as the run proceeds.
#[derive(Debug, Clone)]
pub enum FileEvent {
    Rendered { path: PathBuf },
    Skipped { path: PathBuf, reason: SkipReason },
    Ignored { path: PathBuf },
    Linked { path: PathBuf, outcome: LinkOutcome },
    Failed { path: PathBuf, error: String },
}

/// Counts per outcome for a finished run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildSummary {
    pub rendered: usize,
    pub skipped: usize,
    pub ignored: usize,
    pub linked: usize,
    pub failed: usize,
}

impl BuildSummary {
    fn record(&mut self, event: &FileEvent) {
        match event {
            FileEvent::Rendered { .. } => self.rendered += 1,
            FileEvent::Skipped { .. } => self.skipped += 1,
            FileEvent::Ignored { .. } => self.ignored += 1,
            FileEvent::Linked { .. } => self.linked += 1,
            FileEvent::Failed { .. } => self.failed += 1,
        }
    }
}

/// Run the whole pipeline, calling `on_event` once per file.
pub fn build(
    options: &BuildOptions,
    mut on_event: impl FnMut(&FileEvent),
) -> Result<BuildSummary, BuildError> {
    let caps = options.capabilities;
    if !caps.markdown {
        tracing::error!("Markdown support is not compiled in; Markdown pages will stop the build");
    }

    let files = scan::scan(&options.input, &options.config.suffixes)?;
    let globals = variables::load_globals(&options.input, &options.config.global_file)
        .map_err(BuildError::Globals)?;
    fs::create_dir_all(&options.output).map_err(|source| BuildError::OutputRoot {
        path: options.output.clone(),
        source,
    })?;

    let site = Site {
        input: &options.input,
        output: &options.output,
        config: &options.config,
        caps,
        resolver: Resolver::new(&options.input, &globals),
    };
    let mut renderer = Renderer::new(&options.input);
    let mut summary = BuildSummary::default();

    for file in &files {
        let event = site.process(file, &mut renderer)?;
        summary.record(&event);
        on_event(&event);
    }

    Ok(summary)
}

struct Site<'a> {
    input: &'a Path,
    output: &'a Path,
    config: &'a SiteConfig,
    caps: Capabilities,
    resolver: Resolver<'a>,
}

/// Result of a page that did not fail.
enum PageOutcome {
    Written,
    Skipped(SkipReason),
}

impl Site<'_> {
    /// Handle one file. Only fatal errors escape; everything else becomes an
    /// event.
    fn process(&self, file: &SourceFile, renderer: &mut Renderer) -> Result<FileEvent, BuildError> {
        let path = file.rel_path.clone();
        let event = match file.kind {
            SourceKind::Ignored => FileEvent::Ignored { path },
            SourceKind::Asset => match write::link_asset(self.input, self.output, &path) {
                Ok(outcome) => FileEvent::Linked { path, outcome },
                Err(err) => self.failed(path, &PageError::Io(err)),
            },
            SourceKind::Source => match self.render_page(file, renderer) {
                Ok(PageOutcome::Written) => FileEvent::Rendered { path },
                Ok(PageOutcome::Skipped(reason)) => FileEvent::Skipped { path, reason },
                Err(PageError::Convert(ConvertError::MarkdownUnavailable)) => {
                    return Err(BuildError::MarkdownUnavailable(path));
                }
                Err(err) => self.failed(path, &err),
            },
        };
        Ok(event)
    }

    fn failed(&self, path: PathBuf, err: &PageError) -> FileEvent {
        tracing::error!(page = %path.display(), "{err}");
        FileEvent::Failed {
            path,
            error: err.to_string(),
        }
    }

    fn render_page(
        &self,
        file: &SourceFile,
        renderer: &mut Renderer,
    ) -> Result<PageOutcome, PageError> {
        if self.config.suffixes.is_template_only(&file.suffix) {
            return Ok(PageOutcome::Skipped(SkipReason::TemplateOnly));
        }

        let text = fs::read_to_string(self.input.join(&file.rel_path))?;
        let (header, body) = frontmatter::split(&text);
        let mut vars: VariableSet = self.resolver.base(&file.rel_path, header);
        if !vars.should_render() {
            return Ok(PageOutcome::Skipped(SkipReason::RenderDisabled));
        }
        let format = Format::from_value(vars.get(FORMAT))?;

        self.resolver.include_files(&mut vars)?;
        // A shared `use` file can still switch a page off.
        if !vars.should_render() {
            return Ok(PageOutcome::Skipped(SkipReason::RenderDisabled));
        }

        let html = convert::to_html(body, format, self.caps)?;
        let rendered = renderer.render_page(&file.template_name(), &html, &vars)?;
        write::write_page(self.output, &file.rel_path, &rendered)?;
        Ok(PageOutcome::Written)
    }
}
