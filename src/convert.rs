//! Body format conversion.
//!
//! The `format` variable picks how a page body becomes HTML before it is
//! rendered as a template:
//!
//! | `format` | Conversion |
//! |----------|------------|
//! | absent, `null`, `html` | none, the body already is HTML |
//! | `md`, `markdown` | CommonMark to HTML via [pulldown-cmark](https://docs.rs/pulldown-cmark) |
//!
//! Matching is case-insensitive. Any other value is an error for that page.
//!
//! Markdown support is a capability: it is compiled in with the `markdown`
//! feature (on by default) and checked once at startup through
//! [`Capabilities::detect`].

use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("unsupported format {0}, expected \"html\", \"md\" or \"markdown\"")]
    UnsupportedFormat(Value),
    #[error("page requests Markdown but this build has no Markdown converter")]
    MarkdownUnavailable,
}

/// Optional converters available to this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub markdown: bool,
}

impl Capabilities {
    /// Capabilities compiled into this binary.
    pub fn detect() -> Self {
        Self {
            markdown: cfg!(feature = "markdown"),
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::detect()
    }
}

/// A body format selected by the `format` variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Html,
    Markdown,
}

impl Format {
    /// Read a `format` variable value.
    pub fn from_value(value: &Value) -> Result<Self, ConvertError> {
        match value {
            Value::Null => Ok(Format::Html),
            Value::String(s) => match s.to_lowercase().as_str() {
                "html" => Ok(Format::Html),
                "md" | "markdown" => Ok(Format::Markdown),
                _ => Err(ConvertError::UnsupportedFormat(value.clone())),
            },
            _ => Err(ConvertError::UnsupportedFormat(value.clone())),
        }
    }
}

/// Convert `body` to HTML.
pub fn to_html(body: &str, format: Format, caps: Capabilities) -> Result<String, ConvertError> {
    match format {
        Format::Html => Ok(body.to_string()),
        Format::Markdown if !caps.markdown => Err(ConvertError::MarkdownUnavailable),
        Format::Markdown => markdown_to_html(body),
    }
}

#[cfg(feature = "markdown")]
fn markdown_to_html(body: &str) -> Result<String, ConvertError> {
    use pulldown_cmark::{Parser, html};

    let parser = Parser::new(body);
    let mut out = String::with_capacity(body.len() * 3 / 2);
    html::push_html(&mut out, parser);
    Ok(out)
}

#[cfg(not(feature = "markdown"))]
fn markdown_to_html(_body: &str) -> Result<String, ConvertError> {
    Err(ConvertError::MarkdownUnavailable)
}
