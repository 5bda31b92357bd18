use exercises_api_core::contract::{ErrorCode, ErrorEnvelope, SuccessEnvelope};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const SERIALIZATION_FAILURE_MESSAGE: &str = "Failed to serialize response";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: Value,
    pub body: String,
}

pub fn cors_headers() -> Value {
    json!({
        "Content-Type": "application/json",
        "Access-Control-Allow-Origin": "*",
        "Access-Control-Allow-Methods": "GET, OPTIONS",
        "Access-Control-Allow-Headers": "Content-Type",
    })
}

pub fn success_response<T: Serialize>(
    envelope: &SuccessEnvelope<T>,
    request_id: &str,
) -> ApiGatewayResponse {
    match serde_json::to_string(envelope) {
        Ok(body) => ApiGatewayResponse {
            status_code: 200,
            headers: cors_headers(),
            body,
        },
        Err(error) => {
            tracing::error!(
                component = "exercises_handler",
                event = "serialization_failed",
                request_id,
                error = %error
            );
            error_response(&ErrorEnvelope::new(
                ErrorCode::InternalError,
                SERIALIZATION_FAILURE_MESSAGE,
                request_id,
            ))
        }
    }
}

pub fn error_response(envelope: &ErrorEnvelope) -> ApiGatewayResponse {
    let body =
        serde_json::to_string(envelope).unwrap_or_else(|_| fallback_error_body(envelope));

    ApiGatewayResponse {
        status_code: envelope.error.code.http_status(),
        headers: cors_headers(),
        body,
    }
}

fn fallback_error_body(envelope: &ErrorEnvelope) -> String {
    json!({
        "success": false,
        "error": {
            "code": envelope.error.code.as_str(),
            "message": envelope.error.message,
            "timestamp": envelope.error.timestamp,
            "requestId": envelope.error.request_id,
        },
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use exercises_api_core::contract::ExerciseListData;

    use super::*;

    #[test]
    fn success_response_carries_cors_headers() {
        let envelope = SuccessEnvelope::new(ExerciseListData::new(Vec::new()));

        let response = success_response(&envelope, "req-1");

        assert_eq!(response.status_code, 200);
        assert_eq!(response.headers["Access-Control-Allow-Origin"], "*");
        assert_eq!(response.headers["Access-Control-Allow-Methods"], "GET, OPTIONS");
        let body: Value = serde_json::from_str(&response.body).expect("body should be json");
        assert_eq!(body["data"], json!({"exercises": [], "count": 0}));
    }

    #[test]
    fn error_response_status_follows_code() {
        let envelope = ErrorEnvelope::new(ErrorCode::InvalidMethod, "Only GET", "req-2");

        let response = error_response(&envelope);

        assert_eq!(response.status_code, 400);
        assert!(response.headers["Content-Type"]
            .as_str()
            .is_some_and(|value| value.contains("application/json")));
        let body: Value = serde_json::from_str(&response.body).expect("body should be json");
        assert_eq!(body["error"]["code"], "INVALID_METHOD");
        assert_eq!(body["error"]["requestId"], "req-2");
    }

    #[test]
    fn api_gateway_response_uses_proxy_field_names() {
        let response = error_response(&ErrorEnvelope::new(
            ErrorCode::InternalError,
            "boom",
            "req-3",
        ));

        let value = serde_json::to_value(&response).expect("response should serialize");
        assert_eq!(value["statusCode"], 500);
        assert!(value["body"].is_string());
    }

    #[test]
    fn fallback_error_body_matches_envelope_shape() {
        let envelope = ErrorEnvelope::new(ErrorCode::StorageError, "table down", "req-4");

        let fallback: Value =
            serde_json::from_str(&fallback_error_body(&envelope)).expect("fallback should be json");
        let serialized = serde_json::to_value(&envelope).expect("envelope should serialize");

        assert_eq!(fallback, serialized);
        assert_eq!(fallback["error"]["timestamp"], envelope.error.timestamp.as_str());
    }
}
