use exercises_api_core::links::LinkTtl;
use thiserror::Error;

use crate::handlers::assembler::SigningFailurePolicy;

pub const TABLE_NAME_VAR: &str = "DYNAMODB_TABLE_NAME";
pub const BUCKET_NAME_VAR: &str = "S3_BUCKET_NAME";
pub const LINK_TTL_MINUTES_VAR: &str = "PRESIGNED_URL_EXPIRATION_MINUTES";
pub const REGION_VAR: &str = "AWS_REGION";
pub const SIGNING_FAILURE_POLICY_VAR: &str = "SIGNING_FAILURE_POLICY";
pub const DEFAULT_REGION: &str = "us-east-1";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be configured")]
    Missing(&'static str),
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Settings read once at cold start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseApiConfig {
    pub table_name: String,
    pub bucket_name: String,
    pub link_ttl: LinkTtl,
    pub region: String,
    pub signing_failure_policy: SigningFailurePolicy,
}

impl ExerciseApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        let table_name = value(TABLE_NAME_VAR).ok_or(ConfigError::Missing(TABLE_NAME_VAR))?;
        let bucket_name = value(BUCKET_NAME_VAR).ok_or(ConfigError::Missing(BUCKET_NAME_VAR))?;

        let link_ttl = match value(LINK_TTL_MINUTES_VAR) {
            Some(raw) => raw
                .parse::<u32>()
                .map_err(|error| error.to_string())
                .and_then(LinkTtl::from_minutes)
                .map_err(|reason| ConfigError::Invalid {
                    name: LINK_TTL_MINUTES_VAR,
                    reason,
                })?,
            None => LinkTtl::default(),
        };

        let signing_failure_policy = match value(SIGNING_FAILURE_POLICY_VAR) {
            Some(raw) => raw
                .parse::<SigningFailurePolicy>()
                .map_err(|reason| ConfigError::Invalid {
                    name: SIGNING_FAILURE_POLICY_VAR,
                    reason,
                })?,
            None => SigningFailurePolicy::default(),
        };

        Ok(Self {
            table_name,
            bucket_name,
            link_ttl,
            region: value(REGION_VAR).unwrap_or_else(|| DEFAULT_REGION.to_string()),
            signing_failure_policy,
        })
    }
}
