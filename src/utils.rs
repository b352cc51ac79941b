use std::time::Duration;
use unicode_segmentation::UnicodeSegmentation;

/// Shortens `message` to at most `max_width` grapheme clusters, ending with
/// `…` when something was cut. Used to keep progress messages on one line.
///
/// # Panics
/// Panics if `max_width` is less than 2.
///
/// # Examples
/// ```rust
/// use urlgrab::utils::truncate_message;
///
/// assert_eq!(truncate_message("https://example.com/long", 8), "https:/…");
/// assert_eq!(truncate_message("short", 8), "short");
/// ```
pub fn truncate_message(message: &str, max_width: usize) -> String {
    assert!(
        max_width >= 2,
        "max_width must be at least 2 to accommodate the ellipsis"
    );

    let graphemes: Vec<&str> = message.graphemes(true).collect();
    if graphemes.len() > max_width {
        format!("{}…", graphemes[..max_width - 1].concat())
    } else {
        message.to_string()
    }
}

/// Validates basic auth credentials given as `username:password`.
///
/// Both parts must be non-empty. The password may itself contain colons.
///
/// # Example
///
/// ```rust
/// use urlgrab::utils::validate_basic_auth;
///
/// assert!(validate_basic_auth("user:pass").is_ok());
/// assert!(validate_basic_auth("invalid_format").is_err());
/// ```
pub fn validate_basic_auth(val: &str) -> Result<String, String> {
    match val.split_once(':') {
        Some((user, password)) if !user.is_empty() && !password.is_empty() => Ok(val.to_string()),
        Some(_) => Err(String::from(
            "Invalid format: must be `username:password` with non-empty values",
        )),
        None => Err(String::from("Invalid format: must be `username:password`")),
    }
}

pub fn kb(bytes: u64) -> String {
    let kilobytes = bytes as f64 / 1024.0;
    format!("{kilobytes:.2}kb")
}

pub fn ms(duration: Duration) -> String {
    let milliseconds = duration.as_millis() as f64;
    format!("{milliseconds:.2}ms")
}
