use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Extension appended to every stored document, regardless of its content type.
pub const EXTENSION: &str = "html";

/// Turns a URL into a flat file name.
///
/// A leading `scheme://` is dropped and every `/` left in the string is
/// replaced by `_`, so `https://example.com/a/b` becomes `example.com_a_b`.
/// Nothing else is touched: two URLs that differ only by scheme, or only in
/// where their slashes sit, map to the same name and the later download
/// overwrites the earlier one.
///
/// # Examples
///
/// ```rust
/// use urlgrab::storage::sanitize_filename;
///
/// assert_eq!(sanitize_filename("https://example.com/a"), "example.com_a");
/// assert_eq!(sanitize_filename("example.com/a?b=c"), "example.com_a?b=c");
/// ```
pub fn sanitize_filename(url: &str) -> String {
    let without_scheme = match url.split_once("://") {
        Some((scheme, rest)) if is_scheme(scheme) => rest,
        _ => url,
    };

    let name = without_scheme.replace('/', "_");
    if name.is_empty() {
        "index".to_string()
    } else {
        name
    }
}

fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Path under `dest_dir` where the body fetched from `url` is stored.
pub fn output_path(dest_dir: &Path, url: &str) -> PathBuf {
    dest_dir.join(format!("{}.{}", sanitize_filename(url), EXTENSION))
}

/// Creates the destination directory, parents included.
///
/// An existing directory is accepted as is and nothing inside it is removed.
/// A path that exists but is not a directory is rejected.
pub fn prepare_destination(path: &Path) -> io::Result<PathBuf> {
    if path.exists() && !path.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("the output path '{}' is not a directory", path.display()),
        ));
    }
    fs::create_dir_all(path)?;
    Ok(path.to_path_buf())
}
