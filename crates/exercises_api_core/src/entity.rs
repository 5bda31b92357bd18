use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A stored table row keyed by attribute name, before validation.
pub type RawRow = BTreeMap<String, Value>;

pub const EXERCISE_ID_ATTRIBUTE: &str = "exerciseId";
pub const NAME_ATTRIBUTE: &str = "name";
pub const DESCRIPTION_ATTRIBUTE: &str = "description";
pub const DIFFICULTY_LEVEL_ATTRIBUTE: &str = "difficultyLevel";
pub const IMAGE_KEY_ATTRIBUTE: &str = "imageKey";
pub const THUMBNAIL_IMAGE_KEY_ATTRIBUTE: &str = "thumbnailImageKey";
pub const INSTRUCTIONS_ATTRIBUTE: &str = "instructions";
pub const INSTRUCTION_VIDEO_KEY_ATTRIBUTE: &str = "instructionVideoKey";
pub const CREATED_AT_ATTRIBUTE: &str = "createdAt";
pub const UPDATED_AT_ATTRIBUTE: &str = "updatedAt";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl DifficultyLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(ValidationError::new(format!(
                "difficultyLevel '{raw}' must be one of beginner, intermediate, advanced"
            ))),
        }
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseEntity {
    pub exercise_id: String,
    pub name: String,
    pub description: String,
    pub difficulty_level: DifficultyLevel,
    pub image_key: String,
    pub thumbnail_image_key: Option<String>,
    pub instructions: Option<String>,
    pub instruction_video_key: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl ExerciseEntity {
    /// Validates a stored row. Rows without an id, name or image key, or
    /// with an unrecognised difficulty, are rejected.
    pub fn from_row(row: &RawRow) -> Result<Self, ValidationError> {
        let exercise_id = required_string(row, EXERCISE_ID_ATTRIBUTE)?;
        let name = required_string(row, NAME_ATTRIBUTE)
            .map_err(|error| error.for_exercise(&exercise_id))?;
        let image_key = required_string(row, IMAGE_KEY_ATTRIBUTE)
            .map_err(|error| error.for_exercise(&exercise_id))?;
        let difficulty_level = match row.get(DIFFICULTY_LEVEL_ATTRIBUTE) {
            Some(Value::String(raw)) => DifficultyLevel::parse(raw),
            Some(_) => Err(ValidationError::new("difficultyLevel must be a string")),
            None => Err(ValidationError::new("difficultyLevel is required")),
        }
        .map_err(|error| error.for_exercise(&exercise_id))?;

        let description = match row.get(DESCRIPTION_ATTRIBUTE) {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Null) | None => String::new(),
            Some(_) => {
                return Err(ValidationError::new("description must be a string")
                    .for_exercise(&exercise_id))
            }
        };

        Ok(Self {
            exercise_id,
            name,
            description,
            difficulty_level,
            image_key,
            thumbnail_image_key: optional_key(row, THUMBNAIL_IMAGE_KEY_ATTRIBUTE),
            instructions: optional_text(row, INSTRUCTIONS_ATTRIBUTE),
            instruction_video_key: optional_key(row, INSTRUCTION_VIDEO_KEY_ATTRIBUTE),
            created_at: optional_text(row, CREATED_AT_ATTRIBUTE),
            updated_at: optional_text(row, UPDATED_AT_ATTRIBUTE),
        })
    }
}

/// Best-effort identifier for log lines about rows that failed validation.
pub fn row_identifier(row: &RawRow) -> &str {
    row.get(EXERCISE_ID_ATTRIBUTE)
        .and_then(Value::as_str)
        .filter(|value| !value.trim().is_empty())
        .unwrap_or("unknown")
}

fn required_string(row: &RawRow, attribute: &str) -> Result<String, ValidationError> {
    match row.get(attribute) {
        Some(Value::String(value)) if !value.trim().is_empty() => Ok(value.clone()),
        Some(Value::String(_)) => Err(ValidationError::new(format!(
            "{attribute} cannot be empty"
        ))),
        Some(Value::Null) | None => Err(ValidationError::new(format!("{attribute} is required"))),
        Some(_) => Err(ValidationError::new(format!(
            "{attribute} must be a string"
        ))),
    }
}

// Whitespace-only keys count as absent; other keys are kept verbatim.
fn optional_key(row: &RawRow, attribute: &str) -> Option<String> {
    row.get(attribute)
        .and_then(Value::as_str)
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
}

fn optional_text(row: &RawRow, attribute: &str) -> Option<String> {
    row.get(attribute)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn for_exercise(self, exercise_id: &str) -> Self {
        Self {
            message: format!("exercise '{exercise_id}': {}", self.message),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}
