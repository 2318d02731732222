//! RFC 2822 date helpers for `pubDate` and HTTP date headers

use chrono::{DateTime, Utc};

const RFC2822_FORMAT: &str = "%a, %d %b %Y %H:%M:%S +0000";

/// Convert Unix seconds to a UTC timestamp
///
/// Out-of-range values fall back to the Unix epoch.
pub fn from_unix(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

/// Format a timestamp as RFC 2822 with a literal `+0000` offset
pub fn rfc2822(t: &DateTime<Utc>) -> String {
    t.format(RFC2822_FORMAT).to_string()
}

/// Format a timestamp for HTTP headers (`GMT` in place of `+0000`)
pub fn http_date(t: &DateTime<Utc>) -> String {
    rfc2822(t).replace("+0000", "GMT")
}
