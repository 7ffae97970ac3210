//! Content length extraction utilities.

use crate::http::HeaderList;
use reqwest::header::CONTENT_LENGTH;

/// Extract the declared body length from response headers.
///
/// Returns `None` when the header is missing, empty, negative or not a
/// number, which callers treat as "length unknown". An explicit `0` stays
/// `Some(0)`.
///
/// # Example
///
/// ```rust
/// use fetchkit::http::HeaderList;
/// use fetchkit::utils::parse_content_length;
///
/// let mut headers = HeaderList::new();
/// assert_eq!(parse_content_length(&headers), None);
/// headers.add("Content-Length", "11");
/// assert_eq!(parse_content_length(&headers), Some(11));
/// ```
pub fn parse_content_length(headers: &HeaderList) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH.as_str())
        .and_then(|value| value.trim().parse::<u64>().ok())
}
