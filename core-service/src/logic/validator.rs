//! URL Validator
//!
//! Cheap syntactic gate run before any model work.
//! Not a security boundary: a match says nothing about whether the URL is safe
//! or even resolvable.

use once_cell::sync::Lazy;
use regex::Regex;

/// Optional http(s) scheme, dotted labels of word chars and hyphens,
/// alphabetic TLD of at least two letters, optional `/...` suffix.
const URL_PATTERN: &str = r"^(https?://)?([\w\-]+\.)+[a-zA-Z]{2,}(/.*)?$";

static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(URL_PATTERN).expect("URL_PATTERN is a valid regex")
});

/// Check whether `url` looks like a well-formed URL.
///
/// Never fails: malformed input simply returns `false`.
pub fn is_valid(url: &str) -> bool {
    URL_REGEX.is_match(url)
}
