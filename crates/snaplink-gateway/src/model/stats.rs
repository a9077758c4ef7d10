use super::UrlResponse;
use serde::Serialize;
use snaplink_shortener::StatsSummary;

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub summary: StatsSummary,
    pub urls: Vec<UrlResponse>,
}
