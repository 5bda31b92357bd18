#![allow(dead_code)]

use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use exercises_api_core::entity::RawRow;
use exercises_api_core::links::LinkTtl;
use exercises_api_lambda::adapters::link_signer::LinkSigner;
use exercises_api_lambda::adapters::table_store::ExerciseTable;
use exercises_api_lambda::handlers::assembler::SigningFailurePolicy;
use exercises_api_lambda::handlers::exercises::ExerciseDependencies;
use exercises_api_lambda::handlers::response::ApiGatewayResponse;
use serde_json::{json, Value};

/// Table backed by fixed rows that counts backend calls.
pub struct FixtureTable {
    rows: Vec<RawRow>,
    fail_with: Option<String>,
    calls: Mutex<usize>,
}

impl FixtureTable {
    pub fn with_rows(rows: Vec<Value>) -> Self {
        Self {
            rows: rows
                .into_iter()
                .map(|row| serde_json::from_value(row).expect("row fixture should be an object"))
                .collect(),
            fail_with: None,
            calls: Mutex::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            rows: Vec::new(),
            fail_with: Some(message.to_string()),
            calls: Mutex::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().expect("poisoned mutex")
    }

    fn record_call(&self) -> Result<(), String> {
        *self.calls.lock().expect("poisoned mutex") += 1;
        match &self.fail_with {
            Some(message) => Err(message.clone()),
            None => Ok(()),
        }
    }
}

impl ExerciseTable for FixtureTable {
    fn scan_all(&self) -> Result<Vec<RawRow>, String> {
        self.record_call()?;
        Ok(self.rows.clone())
    }

    fn get_item(&self, exercise_id: &str) -> Result<Option<RawRow>, String> {
        self.record_call()?;
        Ok(self
            .rows
            .iter()
            .find(|row| row.get("exerciseId").and_then(Value::as_str) == Some(exercise_id))
            .cloned())
    }
}

/// Signer that mints a fresh nonce for every URL.
#[derive(Default)]
pub struct NonceSigner {
    issued: Mutex<Vec<String>>,
}

impl NonceSigner {
    pub fn new() -> Self {
        Self {
            issued: Mutex::new(Vec::new()),
        }
    }

    pub fn issued_keys(&self) -> Vec<String> {
        self.issued.lock().expect("poisoned mutex").clone()
    }
}

impl LinkSigner for NonceSigner {
    fn presign(&self, key: &str, issued_at: DateTime<Utc>, ttl: Duration) -> Result<String, String> {
        let mut issued = self.issued.lock().expect("poisoned mutex");
        issued.push(key.to_string());
        Ok(format!(
            "https://exercise-media.s3.amazonaws.com/{key}?X-Amz-Date={}&X-Amz-Expires={}&X-Amz-Signature=sig{}",
            issued_at.format("%Y%m%dT%H%M%SZ"),
            ttl.as_secs(),
            issued.len()
        ))
    }
}

pub fn dependencies<'a>(
    table: &'a FixtureTable,
    signer: &'a NonceSigner,
    policy: SigningFailurePolicy,
) -> ExerciseDependencies<'a> {
    ExerciseDependencies {
        table,
        signer,
        link_ttl: LinkTtl::default(),
        signing_failure_policy: policy,
    }
}

pub fn get_event() -> Value {
    json!({
        "httpMethod": "GET",
        "path": "/exercises",
        "pathParameters": null,
    })
}

pub fn complete_row(id: &str) -> Value {
    json!({
        "exerciseId": id,
        "name": "Push-ups",
        "description": "Classic upper body exercise",
        "difficultyLevel": "beginner",
        "imageKey": format!("exercises/{id}.jpg"),
        "thumbnailImageKey": format!("exercises/thumbs/{id}.jpg"),
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-01T00:00:00Z",
    })
}

pub fn body(response: &ApiGatewayResponse) -> Value {
    serde_json::from_str(&response.body).expect("response body should be json")
}
