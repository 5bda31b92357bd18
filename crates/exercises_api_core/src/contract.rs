use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::entity::{DifficultyLevel, ExerciseEntity};
use crate::links::{format_timestamp, SignedLink};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidMethod,
    StorageError,
    SigningError,
    ExerciseNotFound,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidMethod => "INVALID_METHOD",
            Self::StorageError => "STORAGE_ERROR",
            Self::SigningError => "SIGNING_ERROR",
            Self::ExerciseNotFound => "EXERCISE_NOT_FOUND",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    pub fn http_status(self) -> u16 {
        match self {
            Self::InvalidMethod => 400,
            Self::ExerciseNotFound => 404,
            Self::StorageError | Self::SigningError | Self::InternalError => 500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseResponse {
    pub exercise_id: String,
    pub name: String,
    pub description: String,
    pub difficulty_level: DifficultyLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    pub image_url: String,
    pub image_url_expiration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_image_url_expiration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction_video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction_video_url_expiration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl ExerciseResponse {
    pub fn from_entity(
        entity: ExerciseEntity,
        image: SignedLink,
        thumbnail: Option<SignedLink>,
        instruction_video: Option<SignedLink>,
    ) -> Self {
        let (thumbnail_image_url, thumbnail_image_url_expiration) = split_link(thumbnail);
        let (instruction_video_url, instruction_video_url_expiration) =
            split_link(instruction_video);

        Self {
            exercise_id: entity.exercise_id,
            name: entity.name,
            description: entity.description,
            difficulty_level: entity.difficulty_level,
            instructions: entity.instructions,
            image_url_expiration: image.expiration_timestamp(),
            image_url: image.url,
            thumbnail_image_url,
            thumbnail_image_url_expiration,
            instruction_video_url,
            instruction_video_url_expiration,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

fn split_link(link: Option<SignedLink>) -> (Option<String>, Option<String>) {
    match link {
        Some(link) => {
            let expiration = link.expiration_timestamp();
            (Some(link.url), Some(expiration))
        }
        None => (None, None),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExerciseListData {
    pub exercises: Vec<ExerciseResponse>,
    pub count: usize,
}

impl ExerciseListData {
    pub fn new(exercises: Vec<ExerciseResponse>) -> Self {
        Self {
            count: exercises.len(),
            exercises,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SingleExerciseData {
    pub exercise: ExerciseResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuccessEnvelope<T> {
    pub success: bool,
    pub data: T,
    pub timestamp: String,
}

impl<T> SuccessEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            timestamp: format_timestamp(Utc::now()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    pub code: ErrorCode,
    pub message: String,
    pub timestamp: String,
    pub request_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: ErrorDetail,
}

impl ErrorEnvelope {
    pub fn new(code: ErrorCode, message: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self {
            success: false,
            error: ErrorDetail {
                code,
                message: message.into(),
                timestamp: format_timestamp(Utc::now()),
                request_id: request_id.into(),
            },
        }
    }
}
