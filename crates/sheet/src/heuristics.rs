//! Header-name heuristics used by contact-card export.
//!
//! Both predicates are case-insensitive substring tests:
//!
//! - name-like: `name`, `full name` (any one separator or none), `contact`
//! - phone-like: `phone`, `tel`, `mobile`, `cell`, `contact no` (any one
//!   separator or none), `number`

use regex::Regex;
use std::sync::LazyLock;

static NAME_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)name|full.?name|contact").expect("valid name pattern"));

static PHONE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)phone|tel|mobile|cell|contact.?no|number").expect("valid phone pattern")
});

/// Whether a header looks like it holds a person's display name.
pub fn is_name_header(header: &str) -> bool {
    NAME_HEADER.is_match(header)
}

/// Whether a header looks like it holds a phone number.
pub fn is_phone_header(header: &str) -> bool {
    PHONE_HEADER.is_match(header)
}

/// Headers that look like phone columns, in header order.
pub fn phone_columns<'a, I>(headers: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    headers
        .into_iter()
        .filter(|h| is_phone_header(h))
        .cloned()
        .collect()
}
