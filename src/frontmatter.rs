//! Front-matter splitting.
//!
//! A page may start with a JSON object terminated by a line that is exactly
//! `---`:
//!
//! ```text
//! {"title": "Home", "format": "md"}
//! ---
//! # Welcome
//! ```
//!
//! Only the first sentinel splits. A file without one is all body.

/// The sentinel line separating front-matter from body.
pub const SENTINEL: &str = "---";

/// Split `text` into `(header, body)`.
///
/// Both parts keep their original line terminators; the sentinel line itself
/// lands in neither. Without a sentinel, the header is empty and the body is
/// the whole text.
pub fn split(text: &str) -> (&str, &str) {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let content = line
            .strip_suffix('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .unwrap_or(line);
        if content == SENTINEL {
            return (&text[..offset], &text[offset + line.len()..]);
        }
        offset += line.len();
    }
    ("", text)
}

/// Body of `text` with any front-matter removed.
pub fn body(text: &str) -> &str {
    split(text).1
}
