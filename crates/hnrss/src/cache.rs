//! HTTP caching headers derived from item cadence
//!
//! A feed whose items arrive every few minutes should be polled often;
//! a quiet one can be cached for longer. `max-age` is set to the average
//! gap between items, clamped to [`MIN_MAX_AGE`, `MAX_MAX_AGE`].

use crate::date::{from_unix, http_date};
use crate::types::FeedItem;
use chrono::{DateTime, Duration, Utc};

/// Lower bound on `max-age`, also used for empty feeds (5 minutes)
pub const MIN_MAX_AGE: u64 = 5 * 60;

/// Upper bound on `max-age` (1 hour)
pub const MAX_MAX_AGE: u64 = 60 * 60;

/// Caching values for one response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheDirective {
    pub last_modified: DateTime<Utc>,
    pub expires: DateTime<Utc>,
    pub max_age: u64,
}

impl CacheDirective {
    /// `Last-Modified` header value
    pub fn last_modified_header(&self) -> String {
        http_date(&self.last_modified)
    }

    /// `Expires` header value
    pub fn expires_header(&self) -> String {
        http_date(&self.expires)
    }

    /// `Cache-Control` header value
    pub fn cache_control_header(&self) -> String {
        format!("max-age={}", self.max_age)
    }
}

/// Computes [`CacheDirective`]s from feed items
pub struct CacheHeaderPolicy;

impl CacheHeaderPolicy {
    /// Caching values for `items` as of now
    pub fn compute(items: &[FeedItem]) -> CacheDirective {
        let timestamps: Vec<i64> = items.iter().map(|i| i.pub_date.timestamp()).collect();
        Self::compute_at(&timestamps, Utc::now())
    }

    /// Caching values for the given Unix timestamps as of `now`
    pub fn compute_at(timestamps: &[i64], now: DateTime<Utc>) -> CacheDirective {
        let (last_modified, seconds) = match timestamps.iter().max() {
            None => (now, MIN_MAX_AGE as f64),
            Some(&latest) => (from_unix(latest), average_gap(timestamps)),
        };

        let seconds = seconds.clamp(MIN_MAX_AGE as f64, MAX_MAX_AGE as f64);
        let expires = now + Duration::milliseconds((seconds * 1000.0) as i64);

        CacheDirective {
            last_modified,
            expires,
            max_age: seconds as u64,
        }
    }
}

/// Sum of gaps between consecutive items divided by the item count
///
/// The divisor is the number of items, not the number of gaps.
fn average_gap(timestamps: &[i64]) -> f64 {
    if timestamps.is_empty() {
        return 0.0;
    }

    let mut sorted = timestamps.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));

    // Widened so the full i64 span cannot overflow
    let total: i128 = sorted
        .windows(2)
        .map(|w| i128::from(w[0]) - i128::from(w[1]))
        .sum();
    total as f64 / sorted.len() as f64
}
