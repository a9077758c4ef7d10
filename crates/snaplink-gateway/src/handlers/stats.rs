use crate::model::{StatsResponse, UrlResponse};
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::Json;
use snaplink_core::Clock;
use snaplink_shortener::StatsQuery;

pub async fn stats_handler(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Json<StatsResponse> {
    let registry = state.registry();
    let summary = registry.summary().await;
    let now = registry.clock().now();
    let urls = registry
        .list(query)
        .await
        .into_iter()
        .map(|record| UrlResponse::from_record(record, state.base_url(), now))
        .collect();

    Json(StatsResponse { summary, urls })
}
