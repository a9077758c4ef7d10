use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    create_urls_handler, get_url_handler, health_handler, redirect_handler, stats_handler,
};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .nest(
                "/v1",
                Router::new()
                    .route("/urls", post(create_urls_handler))
                    .route("/urls/{code}", get(get_url_handler))
                    .route("/stats", get(stats_handler)),
            )
            // resolved last so the fixed routes above take priority
            .route("/{code}", get(redirect_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }
}
