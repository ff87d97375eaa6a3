use actix_web::{HttpResponse, http::StatusCode};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;

/// Success envelope: `{"data": <payload>}`.
pub fn ok<T: Serialize>(payload: T) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "data": payload }))
}

pub fn created<T: Serialize>(payload: T) -> HttpResponse {
    HttpResponse::Created().json(json!({ "data": payload }))
}

/// Error envelope: `{"error": {"message", "status", "timestamp"}}`.
pub fn error(status: StatusCode, message: &str) -> HttpResponse {
    tracing::error!(status = status.as_u16(), error = message, "request failed");
    HttpResponse::build(status).json(json!({
        "error": {
            "message": message,
            "status": status.as_u16(),
            "timestamp": Utc::now().to_rfc3339(),
        }
    }))
}
