mod redirect;
mod stats;
mod url;

pub use redirect::{RedirectParams, ResolveResponse};
pub use stats::StatsResponse;
pub use url::{CreateUrlsRequest, CreateUrlsResponse, FieldError, UrlResponse};

use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
