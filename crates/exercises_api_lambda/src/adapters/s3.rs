use std::time::{Duration, SystemTime};

use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use chrono::{DateTime, Utc};

use crate::adapters::link_signer::LinkSigner;

pub struct S3LinkSigner {
    bucket: String,
    s3_client: aws_sdk_s3::Client,
}

impl S3LinkSigner {
    pub fn new(s3_client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            s3_client,
        }
    }
}

impl LinkSigner for S3LinkSigner {
    fn presign(
        &self,
        key: &str,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, String> {
        // Signed from `issued_at` so the URL lapses exactly at the reported expiry.
        let presigning_config = PresigningConfig::builder()
            .start_time(SystemTime::from(issued_at))
            .expires_in(ttl)
            .build()
            .map_err(|error| format!("invalid presigning config: {error}"))?;

        let bucket = self.bucket.clone();
        let object_key = key.to_string();
        let client = self.s3_client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .get_object()
                    .bucket(bucket)
                    .key(object_key)
                    .presigned(presigning_config)
                    .await
                    .map(|request| request.uri().to_string())
                    .map_err(|error| format!(
                        "failed to presign s3 object: {}",
                        DisplayErrorContext(&error)
                    ))
            })
        })
    }
}
