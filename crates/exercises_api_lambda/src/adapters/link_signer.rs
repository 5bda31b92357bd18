use std::time::Duration;

use chrono::{DateTime, Utc};

pub trait LinkSigner {
    /// Produces a GET URL for `key` valid from `issued_at` for `ttl`.
    fn presign(&self, key: &str, issued_at: DateTime<Utc>, ttl: Duration)
        -> Result<String, String>;
}
