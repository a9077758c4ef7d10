use crate::error::{AppError, Result};
use crate::model::{CreateUrlsRequest, CreateUrlsResponse, FieldError, UrlResponse};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use snaplink_core::validate::validate_form;
use snaplink_core::{Category, Clock, Level, Telemetry};
use tracing::{debug, info};

pub async fn create_urls_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateUrlsRequest>,
) -> Result<(StatusCode, Json<CreateUrlsResponse>)> {
    let registry = state.registry();

    let fields: Vec<FieldError> = request
        .urls
        .iter()
        .enumerate()
        .flat_map(|(index, url)| {
            validate_form(url)
                .iter()
                .map(move |(field, message)| FieldError {
                    index,
                    field,
                    message,
                })
                .collect::<Vec<_>>()
        })
        .collect();

    if !fields.is_empty() {
        debug!(errors = fields.len(), "rejecting invalid form");
        registry.telemetry().emit(
            &registry.settings().stack,
            Level::Warn,
            Category::Api,
            "Form validation failed",
        );
        return Err(AppError::Validation(fields));
    }

    let created = registry.create(request.urls).await?;
    info!(count = created.len(), "created short urls");

    let now = registry.clock().now();
    let urls = created
        .into_iter()
        .map(|record| UrlResponse::from_record(record, state.base_url(), now))
        .collect();

    Ok((StatusCode::CREATED, Json(CreateUrlsResponse { urls })))
}

/// Looks a record up without counting it as a click.
pub async fn get_url_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<UrlResponse>> {
    let registry = state.registry();
    let record = registry
        .find_by_code(&code)
        .await
        .ok_or_else(|| AppError::NotFound(format!("short code {code} does not exist")))?;

    Ok(Json(UrlResponse::from_record(
        record,
        state.base_url(),
        registry.clock().now(),
    )))
}
