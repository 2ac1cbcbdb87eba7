//! Output tree writes.
//!
//! Rendered pages are written to the same relative path under the output
//! root. Assets are hard-linked, so unchanged files cost nothing to mirror.

use std::fs;
use std::io;
use std::path::Path;

/// What happened when mirroring an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    Linked,
    /// The destination already existed and was left alone.
    AlreadyPresent,
    /// Input and output live on different filesystems; the file was copied.
    Copied,
}

/// Write `text` to `rel` under `output_root`, creating parent directories.
pub fn write_page(output_root: &Path, rel: &Path, text: &str) -> io::Result<()> {
    let dest = output_root.join(rel);
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(dest, text)
}

/// Hard-link `rel` from `input_root` into `output_root`.
pub fn link_asset(input_root: &Path, output_root: &Path, rel: &Path) -> io::Result<LinkOutcome> {
    let src = input_root.join(rel);
    let dest = output_root.join(rel);
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    match fs::hard_link(&src, &dest) {
        Ok(()) => Ok(LinkOutcome::Linked),
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => Ok(LinkOutcome::AlreadyPresent),
        Err(err) if err.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(&src, &dest)?;
            Ok(LinkOutcome::Copied)
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_page_creates_parents() {
        let tmp = TempDir::new().unwrap();
        write_page(tmp.path(), Path::new("a/b/c.html"), "<p>hi</p>").unwrap();
        assert_eq!(
            fs::read_to_string(tmp.path().join("a/b/c.html")).unwrap(),
            "<p>hi</p>"
        );
    }

    #[test]
    fn write_page_overwrites() {
        let tmp = TempDir::new().unwrap();
        write_page(tmp.path(), Path::new("x.html"), "old").unwrap();
        write_page(tmp.path(), Path::new("x.html"), "new").unwrap();
        assert_eq!(fs::read_to_string(tmp.path().join("x.html")).unwrap(), "new");
    }

    #[test]
    fn link_asset_mirrors_path() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::create_dir_all(input.path().join("assets")).unwrap();
        fs::write(input.path().join("assets/logo.png"), b"\x89PNG").unwrap();

        let outcome =
            link_asset(input.path(), output.path(), Path::new("assets/logo.png")).unwrap();
        assert_eq!(outcome, LinkOutcome::Linked);
        assert_eq!(
            fs::read(output.path().join("assets/logo.png")).unwrap(),
            b"\x89PNG"
        );
    }

    #[test]
    fn link_asset_twice_is_already_present() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::write(input.path().join("robots.txt"), "User-agent: *").unwrap();

        let rel = Path::new("robots.txt");
        assert_eq!(
            link_asset(input.path(), output.path(), rel).unwrap(),
            LinkOutcome::Linked
        );
        assert_eq!(
            link_asset(input.path(), output.path(), rel).unwrap(),
            LinkOutcome::AlreadyPresent
        );
    }

    #[test]
    fn link_asset_missing_source_is_error() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        assert!(link_asset(input.path(), output.path(), Path::new("gone.png")).is_err());
    }
}
