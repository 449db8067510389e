//! Decides whether the widget may appear on a given page path.
//!
//! Entries are either literal paths or regular expressions. The root entry
//! `/` is only ever compared literally, since as a pattern it would match
//! every path.

use regex::Regex;

const ROOT_PATH: &str = "/";

/// `None` means the domain has no restriction.
#[must_use]
pub fn is_path_allowed(whitelist: Option<&[String]>, path: &str) -> bool {
    let Some(whitelist) = whitelist else {
        return true;
    };
    whitelist.iter().any(|entry| entry_matches(entry, path))
}

fn entry_matches(entry: &str, path: &str) -> bool {
    if entry == path {
        return true;
    }
    if entry == ROOT_PATH {
        return false;
    }
    match Regex::new(entry) {
        Ok(pattern) => pattern.is_match(path),
        Err(error) => {
            tracing::error!(pattern = %entry, %error, "invalid path whitelist pattern");
            false
        }
    }
}
