//! CLI output formatting.
//!
//! One line per input file, printed as the build reaches it, then a summary:
//!
//! ```text
//! ignoring global.json
//! rendering index.html
//! not rendering drafts/wip.html (render is false)
//! not rendering layout.template (template only)
//! linking assets/logo.png
//! linking assets/style.css ... already there
//! failed notes.html: unsupported format "rst", expected "html", "md" or "markdown"
//!
//! Rendered 1 page, skipped 2, linked 2 assets, ignored 1, 1 failed
//! ```
//!
//! `format_*` functions are pure and return strings; `print_*` wrappers write
//! them to stdout.

use crate::build::{BuildSummary, FileEvent, SkipReason};
use crate::write::LinkOutcome;

/// Format the line for one per-file event.
pub fn format_file_event(event: &FileEvent) -> String {
    match event {
        FileEvent::Rendered { path } => format!("rendering {}", path.display()),
        FileEvent::Skipped { path, reason } => {
            let why = match reason {
                SkipReason::RenderDisabled => "render is false",
                SkipReason::TemplateOnly => "template only",
            };
            format!("not rendering {} ({why})", path.display())
        }
        FileEvent::Ignored { path } => format!("ignoring {}", path.display()),
        FileEvent::Linked { path, outcome } => match outcome {
            LinkOutcome::Linked => format!("linking {}", path.display()),
            LinkOutcome::AlreadyPresent => format!("linking {} ... already there", path.display()),
            LinkOutcome::Copied => format!("copying {} (cross-device)", path.display()),
        },
        FileEvent::Failed { path, error } => format!("failed {}: {error}", path.display()),
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    format!("{n} {}", if n == 1 { one } else { many })
}

/// Format the end-of-run summary line.
pub fn format_summary(summary: &BuildSummary) -> String {
    format!(
        "Rendered {}, skipped {}, linked {}, ignored {}, {} failed",
        plural(summary.rendered, "page", "pages"),
        summary.skipped,
        plural(summary.linked, "asset", "assets"),
        summary.ignored,
        summary.failed,
    )
}

pub fn print_file_event(event: &FileEvent) {
    println!("{}", format_file_event(event));
}

pub fn print_summary(summary: &BuildSummary) {
    println!();
    println!("{}", format_summary(summary));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn path(p: &str) -> PathBuf {
        PathBuf::from(p)
    }

    #[test]
    fn rendered_line() {
        let event = FileEvent::Rendered {
            path: path("blog/post.md"),
        };
        assert_eq!(format_file_event(&event), "rendering blog/post.md");
    }

    #[test]
    fn skipped_lines_name_the_reason() {
        let disabled = FileEvent::Skipped {
            path: path("wip.html"),
            reason: SkipReason::RenderDisabled,
        };
        let fragment = FileEvent::Skipped {
            path: path("base.template"),
            reason: SkipReason::TemplateOnly,
        };
        assert_eq!(
            format_file_event(&disabled),
            "not rendering wip.html (render is false)"
        );
        assert_eq!(
            format_file_event(&fragment),
            "not rendering base.template (template only)"
        );
    }

    #[test]
    fn ignored_line() {
        let event = FileEvent::Ignored {
            path: path("global.json"),
        };
        assert_eq!(format_file_event(&event), "ignoring global.json");
    }

    #[test]
    fn link_lines() {
        let linked = |outcome| FileEvent::Linked {
            path: path("img/a.png"),
            outcome,
        };
        assert_eq!(
            format_file_event(&linked(LinkOutcome::Linked)),
            "linking img/a.png"
        );
        assert_eq!(
            format_file_event(&linked(LinkOutcome::AlreadyPresent)),
            "linking img/a.png ... already there"
        );
        assert_eq!(
            format_file_event(&linked(LinkOutcome::Copied)),
            "copying img/a.png (cross-device)"
        );
    }

    #[test]
    fn failed_line_includes_error() {
        let event = FileEvent::Failed {
            path: path("a.html"),
            error: "boom".to_string(),
        };
        assert_eq!(format_file_event(&event), "failed a.html: boom");
    }

    #[test]
    fn summary_pluralizes() {
        let one = BuildSummary {
            rendered: 1,
            skipped: 0,
            ignored: 2,
            linked: 1,
            failed: 0,
        };
        assert_eq!(
            format_summary(&one),
            "Rendered 1 page, skipped 0, linked 1 asset, ignored 2, 0 failed"
        );

        let many = BuildSummary {
            rendered: 3,
            linked: 0,
            ..one
        };
        assert_eq!(
            format_summary(&many),
            "Rendered 3 pages, skipped 0, linked 0 assets, ignored 2, 0 failed"
        );
    }
}
