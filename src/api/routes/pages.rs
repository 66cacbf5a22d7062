use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use serde::Deserialize;

use crate::analyze::QueryLength;
use crate::api::render;
use crate::api::state::AppState;
use crate::api::ApiError;

#[derive(Debug, Deserialize)]
pub struct MatchForm {
    pub match_url: String,
    #[serde(default = "default_query_length")]
    pub query_length: String,
}

fn default_query_length() -> String {
    QueryLength::Recent.as_str().to_string()
}

fn html_page(page: askama::Result<String>) -> Response {
    match page {
        Ok(body) => Html(body).into_response(),
        Err(e) => ApiError::from(e).into_html_response(),
    }
}

pub async fn index() -> Response {
    html_page(render::index_page())
}

pub async fn form(State(state): State<AppState>) -> Response {
    html_page(render::form_page(
        state.analyzer.match_limit(QueryLength::Recent),
        state.analyzer.match_limit(QueryLength::AllTime),
    ))
}

pub async fn analyze_match_form(
    State(state): State<AppState>,
    Form(form): Form<MatchForm>,
) -> Response {
    let query_length = QueryLength::from_param(&form.query_length);

    match state.analyzer.analyze(&form.match_url, query_length).await {
        Ok(analysis) => html_page(render::analysis_page(&analysis)),
        Err(e) => ApiError::from(e).into_html_response(),
    }
}
