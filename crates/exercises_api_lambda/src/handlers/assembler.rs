use std::str::FromStr;

use chrono::{DateTime, Utc};
use exercises_api_core::contract::ExerciseResponse;
use exercises_api_core::entity::ExerciseEntity;
use exercises_api_core::links::{LinkTtl, SignedLink};
use thiserror::Error;

use crate::adapters::link_signer::LinkSigner;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to sign link for '{key}': {message}")]
pub struct SigningError {
    pub key: String,
    pub message: String,
}

/// What a list request does when one exercise's media cannot be signed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SigningFailurePolicy {
    /// Fail the whole request with a signing error.
    #[default]
    AbortBatch,
    /// Log and omit the exercise, returning the rest.
    SkipItem,
}

impl SigningFailurePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AbortBatch => "abort",
            Self::SkipItem => "skip",
        }
    }
}

impl FromStr for SigningFailurePolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::AbortBatch),
            "skip" => Ok(Self::SkipItem),
            other => Err(format!(
                "unknown signing failure policy '{other}', expected 'abort' or 'skip'"
            )),
        }
    }
}

pub fn sign_link(
    signer: &dyn LinkSigner,
    key: &str,
    issued_at: DateTime<Utc>,
    ttl: LinkTtl,
) -> Result<SignedLink, SigningError> {
    if key.trim().is_empty() {
        return Err(SigningError {
            key: key.to_string(),
            message: "object key cannot be empty".to_string(),
        });
    }

    let url = signer
        .presign(key, issued_at, ttl.as_duration())
        .map_err(|message| SigningError {
            key: key.to_string(),
            message,
        })?;

    Ok(SignedLink {
        url,
        expires_at: ttl.expires_at(issued_at),
    })
}

/// Builds the public view of one exercise. Every link of the item shares a
/// single issue instant.
pub fn assemble_exercise(
    entity: ExerciseEntity,
    signer: &dyn LinkSigner,
    ttl: LinkTtl,
) -> Result<ExerciseResponse, SigningError> {
    let issued_at = Utc::now();

    let image = sign_link(signer, &entity.image_key, issued_at, ttl)?;
    let thumbnail = entity
        .thumbnail_image_key
        .as_deref()
        .map(|key| sign_link(signer, key, issued_at, ttl))
        .transpose()?;
    let instruction_video = entity
        .instruction_video_key
        .as_deref()
        .map(|key| sign_link(signer, key, issued_at, ttl))
        .transpose()?;

    Ok(ExerciseResponse::from_entity(
        entity,
        image,
        thumbnail,
        instruction_video,
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use exercises_api_core::entity::DifficultyLevel;

    use super::*;

    struct RecordingSigner {
        calls: Mutex<Vec<(String, DateTime<Utc>, Duration)>>,
    }

    impl RecordingSigner {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(String, DateTime<Utc>, Duration)> {
            self.calls.lock().expect("poisoned mutex").clone()
        }
    }

    impl LinkSigner for RecordingSigner {
        fn presign(
            &self,
            key: &str,
            issued_at: DateTime<Utc>,
            ttl: Duration,
        ) -> Result<String, String> {
            self.calls
                .lock()
                .expect("poisoned mutex")
                .push((key.to_string(), issued_at, ttl));
            Ok(format!("https://bucket.example.com/{key}?X-Amz-Signature=abc"))
        }
    }

    struct DenyingSigner {
        denied_key: &'static str,
    }

    impl LinkSigner for DenyingSigner {
        fn presign(
            &self,
            key: &str,
            _issued_at: DateTime<Utc>,
            _ttl: Duration,
        ) -> Result<String, String> {
            if key == self.denied_key {
                return Err("ExpiredToken: credentials expired".to_string());
            }
            Ok(format!("https://bucket.example.com/{key}"))
        }
    }

    fn sample_entity() -> ExerciseEntity {
        ExerciseEntity {
            exercise_id: "ex-1".to_string(),
            name: "Push-ups".to_string(),
            description: String::new(),
            difficulty_level: DifficultyLevel::Intermediate,
            image_key: "exercises/pushups.jpg".to_string(),
            thumbnail_image_key: Some("exercises/thumbs/pushups.jpg".to_string()),
            instructions: Some("Lower slowly".to_string()),
            instruction_video_key: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn signs_image_and_thumbnail_with_one_issue_instant() {
        let signer = RecordingSigner::new();
        let started_at = Utc::now();

        let response = assemble_exercise(sample_entity(), &signer, LinkTtl::default())
            .expect("assembly should succeed");

        let calls = signer.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, "exercises/pushups.jpg");
        assert_eq!(calls[1].0, "exercises/thumbs/pushups.jpg");
        assert_eq!(calls[0].1, calls[1].1);
        assert_eq!(calls[0].2, Duration::from_secs(3_600));

        assert_ne!(response.image_url, "exercises/pushups.jpg");
        let expiration = DateTime::parse_from_rfc3339(&response.image_url_expiration)
            .expect("expiration should be RFC 3339");
        assert!(expiration.with_timezone(&Utc) > started_at);
        assert_eq!(
            response.thumbnail_image_url_expiration.as_deref(),
            Some(response.image_url_expiration.as_str())
        );
        assert_eq!(response.instruction_video_url, None);
    }

    #[test]
    fn skips_thumbnail_signing_when_absent() {
        let signer = RecordingSigner::new();
        let mut entity = sample_entity();
        entity.thumbnail_image_key = None;
        entity.instruction_video_key = Some("videos/pushups.mp4".to_string());

        let response =
            assemble_exercise(entity, &signer, LinkTtl::default()).expect("assembly should pass");

        let keys: Vec<String> = signer.calls().into_iter().map(|call| call.0).collect();
        assert_eq!(keys, vec!["exercises/pushups.jpg", "videos/pushups.mp4"]);
        assert_eq!(response.thumbnail_image_url, None);
        assert!(response.instruction_video_url.is_some());
    }

    #[test]
    fn thumbnail_failure_fails_the_item() {
        let signer = DenyingSigner {
            denied_key: "exercises/thumbs/pushups.jpg",
        };

        let error = assemble_exercise(sample_entity(), &signer, LinkTtl::default())
            .expect_err("thumbnail failure should propagate");

        assert_eq!(error.key, "exercises/thumbs/pushups.jpg");
        assert!(error.to_string().contains("ExpiredToken"));
    }

    #[test]
    fn empty_key_is_rejected_before_signing() {
        let signer = RecordingSigner::new();

        let error = sign_link(&signer, "  ", Utc::now(), LinkTtl::default())
            .expect_err("blank key should fail");

        assert_eq!(error.message, "object key cannot be empty");
        assert!(signer.calls().is_empty());
    }

    #[test]
    fn stored_keys_reach_the_signer_verbatim() {
        let row = serde_json::from_value(serde_json::json!({
            "exerciseId": "ex-7",
            "name": "Squat",
            "difficultyLevel": "beginner",
            "imageKey": "media/squat.jpg ",
            "thumbnailImageKey": " thumbs/squat.jpg"
        }))
        .expect("row fixture should be an object");
        let entity = ExerciseEntity::from_row(&row).expect("row should be valid");
        let signer = RecordingSigner::new();

        assemble_exercise(entity, &signer, LinkTtl::default()).expect("assembly should succeed");

        let keys: Vec<String> = signer.calls().into_iter().map(|call| call.0).collect();
        assert_eq!(keys, vec!["media/squat.jpg ", " thumbs/squat.jpg"]);
    }

    #[test]
    fn parses_signing_failure_policy() {
        assert_eq!(
            "abort".parse::<SigningFailurePolicy>(),
            Ok(SigningFailurePolicy::AbortBatch)
        );
        assert_eq!(
            " SKIP ".parse::<SigningFailurePolicy>(),
            Ok(SigningFailurePolicy::SkipItem)
        );
        assert!("retry".parse::<SigningFailurePolicy>().is_err());
        assert_eq!(SigningFailurePolicy::default().as_str(), "abort");
    }
}
