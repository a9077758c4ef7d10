use crate::model::FieldError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use snaplink_shortener::ShortenerError;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    /// The submitted form failed field validation.
    Validation(Vec<FieldError>),
    Shortener(ShortenerError),
    NotFound(String),
}

impl From<ShortenerError> for AppError {
    fn from(value: ShortenerError) -> Self {
        AppError::Shortener(value)
    }
}

fn shortener_status(err: &ShortenerError) -> StatusCode {
    match err.kind() {
        ShortenerError::InvalidUrl(_)
        | ShortenerError::InvalidShortCode(_)
        | ShortenerError::InvalidValidity(_)
        | ShortenerError::BatchSize { .. }
        | ShortenerError::ImmutableField(_)
        | ShortenerError::InvalidUpdate(_) => StatusCode::BAD_REQUEST,
        ShortenerError::ShortCodeTaken(_) | ShortenerError::Conflict(_) => StatusCode::CONFLICT,
        ShortenerError::RecordNotFound(_) => StatusCode::NOT_FOUND,
        ShortenerError::Expired { .. } => StatusCode::GONE,
        ShortenerError::CodeGenerationExhausted { .. } | ShortenerError::Batch { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(fields) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "error": "validation failed", "fields": fields })),
            )
                .into_response(),
            AppError::Shortener(err) => {
                let status = shortener_status(&err);
                let body = json!({
                    "error": err.kind().to_string(),
                    "index": err.batch_index(),
                });
                (status, Json(body)).into_response()
            }
            AppError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
            }
        }
    }
}
