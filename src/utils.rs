//! Utility functions for log truncation, date formatting and HTML escaping.

use chrono::{DateTime, NaiveDateTime};
use url::Url;

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a character boundary)
/// with an ellipsis and byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Format an upstream `pubDate` as `dd/mm/yyyy HH:MM`.
///
/// newsdata.io sends `YYYY-MM-DD HH:MM:SS`; RFC 3339 is accepted too.
/// Anything else is returned unchanged.
pub fn format_pub_date(raw: &str) -> String {
    const OUT: &str = "%d/%m/%Y %H:%M";

    if let Ok(dt) = NaiveDateTime::parse_from_str(raw.trim(), "%Y-%m-%d %H:%M:%S") {
        return dt.format(OUT).to_string();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw.trim()) {
        return dt.format(OUT).to_string();
    }
    raw.to_string()
}

/// Escape text for inclusion in HTML element content or a quoted attribute.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `link` if it is an absolute `http`/`https` URL, otherwise `"#"`.
///
/// Keeps `javascript:` and other schemes out of rendered `href`s.
pub fn safe_link(link: &str) -> &str {
    match Url::parse(link) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => link,
        _ => "#",
    }
}
