//! # makeweb
//!
//! A small static site generator. Every file under `input/` is mirrored into
//! `output/`: pages are rendered, assets are hard-linked, variable files and
//! template fragments are left out.
//!
//! # Pipeline
//!
//! ```text
//! input/ ──scan──▶ SourceFile ──┬─ page:  split → resolve → convert → render → write
//!                               ├─ asset: link
//!                               └─ ignored
//! ```
//!
//! A page is a text file with optional JSON front-matter ended by a `---`
//! line. Its variables come from layers merged key by key, last wins:
//! builtin nulls, front-matter, `global.json`, files listed in `use`, files
//! listed in `use_builtin`. `render: false` skips the page; `format: md`
//! turns the body from Markdown into HTML before it is rendered as a
//! Jinja template (MiniJinja).
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Walks the input root and classifies files by suffix |
//! | [`frontmatter`] | Splits JSON front-matter from the body at the first `---` line |
//! | [`variables`] | Layers variable sources into one [`variables::VariableSet`] per page |
//! | [`convert`] | Markdown/HTML body conversion and the Markdown capability check |
//! | [`render`] | MiniJinja rendering with a front-matter-stripping template loader |
//! | [`write`] | Writes pages and hard-links assets into the output root |
//! | [`build`] | Drives the pipeline with per-page failure isolation |
//! | [`config`] | Optional `makeweb.toml`: suffix lists and the global file name |
//! | [`output`] | CLI output formatting, one line per file plus a summary |
//!
//! # Failure Model
//!
//! A page that cannot be built (unsupported format, missing `use` file,
//! template error) is reported and skipped; the run continues. Malformed
//! front-matter is not even a failure: it is logged and the page renders with
//! the other layers. The run stops only when the environment is wrong: no
//! input root, no global variables file, or a Markdown page in a binary
//! built without the `markdown` feature.
//!
//! Every run regenerates every page. Nothing is cached between runs, so two
//! runs over the same input produce the same bytes.

pub mod build;
pub mod config;
pub mod convert;
pub mod frontmatter;
pub mod output;
pub mod render;
pub mod scan;
pub mod variables;
pub mod write;

#[cfg(test)]
pub(crate) mod test_helpers;
