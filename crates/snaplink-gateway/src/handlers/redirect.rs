use crate::model::{RedirectParams, ResolveResponse};
use crate::state::AppState;
use axum::extract::{ConnectInfo, Path, Query, Request, State};
use axum::http::header::REFERER;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use snaplink_redirector::{ClickContext, Resolution};
use std::net::SocketAddr;

/// GET /{code}
///
/// Answers with the countdown details for a live code, or with a 307 when
/// `?go=1` is given. The click is recorded either way.
pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(params): Query<RedirectParams>,
    request: Request,
) -> Response {
    let mut ctx = ClickContext::new();
    if let Some(referrer) = request
        .headers()
        .get(REFERER)
        .and_then(|v| v.to_str().ok())
    {
        ctx = ctx.with_referrer(referrer);
    }
    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        ctx = ctx.with_client_ip(addr.ip());
    }

    let resolver = state.resolver();
    let resolution = resolver.resolve(&code, ctx).await;
    let message = resolution.message().unwrap_or_default();

    match resolution {
        Resolution::Redirect { url, .. } if params.immediate() => {
            Redirect::temporary(&url).into_response()
        }
        Resolution::Redirect { url, click_count } => (
            StatusCode::OK,
            Json(ResolveResponse::Redirect {
                url,
                countdown_secs: resolver.settings().countdown_secs,
                click_count,
            }),
        )
            .into_response(),
        Resolution::NotFound => (
            StatusCode::NOT_FOUND,
            Json(ResolveResponse::NotFound { message }),
        )
            .into_response(),
        Resolution::Expired { expires_at } => (
            StatusCode::GONE,
            Json(ResolveResponse::Expired {
                expires_at,
                message,
            }),
        )
            .into_response(),
    }
}
