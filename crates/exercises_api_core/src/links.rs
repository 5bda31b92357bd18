use std::time::Duration;

use chrono::{DateTime, Utc};

pub const DEFAULT_LINK_TTL_MINUTES: u32 = 60;
/// SigV4 presigned URLs cannot outlive seven days.
pub const MAX_LINK_TTL_MINUTES: u32 = 7 * 24 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkTtl {
    minutes: u32,
}

impl LinkTtl {
    pub fn from_minutes(minutes: u32) -> Result<Self, String> {
        if minutes == 0 {
            return Err("link TTL must be a positive number of minutes".to_string());
        }
        if minutes > MAX_LINK_TTL_MINUTES {
            return Err(format!(
                "link TTL cannot exceed {MAX_LINK_TTL_MINUTES} minutes"
            ));
        }
        Ok(Self { minutes })
    }

    pub fn minutes(self) -> u32 {
        self.minutes
    }

    pub fn as_duration(self) -> Duration {
        Duration::from_secs(u64::from(self.minutes) * 60)
    }

    pub fn expires_at(self, issued_at: DateTime<Utc>) -> DateTime<Utc> {
        issued_at + chrono::Duration::minutes(i64::from(self.minutes))
    }
}

impl Default for LinkTtl {
    fn default() -> Self {
        Self {
            minutes: DEFAULT_LINK_TTL_MINUTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedLink {
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

impl SignedLink {
    pub fn expiration_timestamp(&self) -> String {
        format_timestamp(self.expires_at)
    }
}

pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339()
}
