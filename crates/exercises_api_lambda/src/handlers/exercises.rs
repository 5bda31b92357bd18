use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use exercises_api_core::contract::{
    ErrorCode, ErrorEnvelope, ExerciseListData, SingleExerciseData, SuccessEnvelope,
};
use exercises_api_core::entity::{row_identifier, ExerciseEntity};
use exercises_api_core::links::LinkTtl;
use serde_json::Value;
use thiserror::Error;

use crate::adapters::link_signer::LinkSigner;
use crate::adapters::table_store::ExerciseTable;
use crate::handlers::assembler::{assemble_exercise, SigningError, SigningFailurePolicy};
use crate::handlers::response::{error_response, success_response, ApiGatewayResponse};

const COMPONENT: &str = "exercises_handler";

/// Process-wide collaborators, built once at cold start and shared by every
/// invocation.
pub struct ExerciseDependencies<'a> {
    pub table: &'a dyn ExerciseTable,
    pub signer: &'a dyn LinkSigner,
    pub link_ttl: LinkTtl,
    pub signing_failure_policy: SigningFailurePolicy,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Only GET method is supported")]
    InvalidMethod { method: String },
    #[error("Failed to retrieve exercises from storage: {0}")]
    Storage(String),
    #[error("Failed to generate signed media link: {0}")]
    Signing(#[from] SigningError),
    #[error("Exercise with ID '{0}' not found")]
    NotFound(String),
    #[error("An unexpected error occurred while processing your request")]
    Unexpected { detail: String },
}

impl PipelineError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidMethod { .. } => ErrorCode::InvalidMethod,
            Self::Storage(_) => ErrorCode::StorageError,
            Self::Signing(_) => ErrorCode::SigningError,
            Self::NotFound(_) => ErrorCode::ExerciseNotFound,
            Self::Unexpected { .. } => ErrorCode::InternalError,
        }
    }
}

pub fn handle_exercises_event(
    event: &Value,
    request_id: &str,
    deps: &ExerciseDependencies<'_>,
) -> ApiGatewayResponse {
    let method = request_method(event);
    let path = request_path(event);
    tracing::info!(
        component = COMPONENT,
        event = "request_received",
        request_id,
        method,
        path
    );

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        run_pipeline(event, method, request_id, deps)
    }))
    .unwrap_or_else(|payload| {
        Err(PipelineError::Unexpected {
            detail: panic_message(payload),
        })
    });

    match outcome {
        Ok(response) => response,
        Err(error) => failure_response(&error, request_id),
    }
}

fn run_pipeline(
    event: &Value,
    method: &str,
    request_id: &str,
    deps: &ExerciseDependencies<'_>,
) -> Result<ApiGatewayResponse, PipelineError> {
    if !method.eq_ignore_ascii_case("GET") {
        return Err(PipelineError::InvalidMethod {
            method: method.to_string(),
        });
    }

    match requested_exercise_id(event) {
        Some(exercise_id) => {
            let data = get_exercise(exercise_id, deps)?;
            tracing::info!(
                component = COMPONENT,
                event = "request_completed",
                request_id,
                exercise_id
            );
            Ok(success_response(&SuccessEnvelope::new(data), request_id))
        }
        None => {
            let data = list_exercises(deps)?;
            tracing::info!(
                component = COMPONENT,
                event = "request_completed",
                request_id,
                count = data.count
            );
            Ok(success_response(&SuccessEnvelope::new(data), request_id))
        }
    }
}

/// Scans the table and assembles every valid row. Malformed rows are dropped;
/// signing failures follow the configured policy.
pub fn list_exercises(deps: &ExerciseDependencies<'_>) -> Result<ExerciseListData, PipelineError> {
    let rows = deps.table.scan_all().map_err(PipelineError::Storage)?;
    tracing::info!(
        component = COMPONENT,
        event = "scan_completed",
        rows = rows.len()
    );

    let mut exercises = Vec::with_capacity(rows.len());
    let mut rejected_rows = 0usize;
    let mut skipped_items = 0usize;

    for row in &rows {
        let entity = match ExerciseEntity::from_row(row) {
            Ok(entity) => entity,
            Err(error) => {
                tracing::warn!(
                    component = COMPONENT,
                    event = "row_rejected",
                    exercise_id = row_identifier(row),
                    error = %error
                );
                rejected_rows += 1;
                continue;
            }
        };

        let exercise_id = entity.exercise_id.clone();
        match assemble_exercise(entity, deps.signer, deps.link_ttl) {
            Ok(exercise) => exercises.push(exercise),
            Err(error) => {
                tracing::error!(
                    component = COMPONENT,
                    event = "signing_failed",
                    exercise_id = exercise_id.as_str(),
                    policy = deps.signing_failure_policy.as_str(),
                    error = %error
                );
                match deps.signing_failure_policy {
                    SigningFailurePolicy::AbortBatch => return Err(error.into()),
                    SigningFailurePolicy::SkipItem => skipped_items += 1,
                }
            }
        }
    }

    tracing::info!(
        component = COMPONENT,
        event = "exercises_assembled",
        count = exercises.len(),
        rejected_rows,
        skipped_items
    );
    Ok(ExerciseListData::new(exercises))
}

pub fn get_exercise(
    exercise_id: &str,
    deps: &ExerciseDependencies<'_>,
) -> Result<SingleExerciseData, PipelineError> {
    let row = deps
        .table
        .get_item(exercise_id)
        .map_err(PipelineError::Storage)?
        .ok_or_else(|| PipelineError::NotFound(exercise_id.to_string()))?;

    let entity = ExerciseEntity::from_row(&row).map_err(|error| {
        tracing::warn!(
            component = COMPONENT,
            event = "row_rejected",
            exercise_id,
            error = %error
        );
        PipelineError::NotFound(exercise_id.to_string())
    })?;

    let exercise = assemble_exercise(entity, deps.signer, deps.link_ttl)?;
    Ok(SingleExerciseData { exercise })
}

/// Reads the verb from a REST API (`httpMethod`) or HTTP API v2
/// (`requestContext.http.method`) proxy event.
pub fn request_method(event: &Value) -> &str {
    event
        .get("httpMethod")
        .and_then(Value::as_str)
        .or_else(|| {
            event
                .pointer("/requestContext/http/method")
                .and_then(Value::as_str)
        })
        .unwrap_or("")
}

/// Reads the request path from a REST API (`path`) or HTTP API v2
/// (`rawPath`) proxy event.
pub fn request_path(event: &Value) -> &str {
    event
        .get("path")
        .or_else(|| event.get("rawPath"))
        .and_then(Value::as_str)
        .unwrap_or("")
}

pub fn requested_exercise_id(event: &Value) -> Option<&str> {
    let parameters = event.get("pathParameters")?;
    parameters
        .get("exercise_id")
        .or_else(|| parameters.get("exerciseId"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn failure_response(error: &PipelineError, request_id: &str) -> ApiGatewayResponse {
    let code = error.code();
    match error {
        PipelineError::InvalidMethod { method } => tracing::warn!(
            component = COMPONENT,
            event = "invalid_method",
            request_id,
            method = method.as_str()
        ),
        PipelineError::NotFound(exercise_id) => tracing::warn!(
            component = COMPONENT,
            event = "exercise_not_found",
            request_id,
            exercise_id = exercise_id.as_str()
        ),
        PipelineError::Unexpected { detail } => tracing::error!(
            component = COMPONENT,
            event = "request_failed",
            request_id,
            code = code.as_str(),
            error = detail.as_str()
        ),
        other => tracing::error!(
            component = COMPONENT,
            event = "request_failed",
            request_id,
            code = code.as_str(),
            error = %other
        ),
    }

    error_response(&ErrorEnvelope::new(code, error.to_string(), request_id))
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return (*message).to_string();
    }
    payload
        .downcast_ref::<String>()
        .cloned()
        .unwrap_or_else(|| "pipeline panicked".to_string())
}
