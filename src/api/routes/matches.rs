use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::analyze::QueryLength;
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::MatchAnalysis;

#[derive(Debug, Deserialize)]
pub struct AnalyzeMatchRequest {
    pub match_url: String,
    /// `past_20` (default) or `all_time`
    #[serde(default)]
    pub query_length: Option<String>,
}

pub async fn analyze_match(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeMatchRequest>,
) -> Result<Json<MatchAnalysis>, ApiError> {
    let query_length = req
        .query_length
        .as_deref()
        .map(QueryLength::from_param)
        .unwrap_or_default();

    let analysis = state.analyzer.analyze(&req.match_url, query_length).await?;
    Ok(Json(analysis))
}
