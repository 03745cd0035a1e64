use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    domain::search::SearchResponse,
    routes::{ApiError, Envelope},
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(search).post(search_json))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchQuery {
    q: Option<String>,
    language: Option<String>,
    framework: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchBody {
    #[serde(alias = "q")]
    query: Option<String>,
    language: Option<String>,
    framework: Option<String>,
}

#[instrument(name = "GET /search", skip(app_state))]
async fn search(
    State(app_state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Envelope<SearchResponse>>, ApiError> {
    let Query(query) = query?;
    run(
        &app_state,
        query.q.as_deref(),
        query.language.as_deref(),
        query.framework.as_deref(),
    )
    .await
}

#[instrument(name = "POST /search", skip(app_state))]
async fn search_json(
    State(app_state): State<AppState>,
    body: Result<Json<SearchBody>, JsonRejection>,
) -> Result<Json<Envelope<SearchResponse>>, ApiError> {
    let Json(body) = body?;
    run(
        &app_state,
        body.query.as_deref(),
        body.language.as_deref(),
        body.framework.as_deref(),
    )
    .await
}

async fn run(
    app_state: &AppState,
    query: Option<&str>,
    language: Option<&str>,
    framework: Option<&str>,
) -> Result<Json<Envelope<SearchResponse>>, ApiError> {
    let response = app_state
        .aggregator()
        .search(query.unwrap_or_default(), language, framework)
        .await?;

    Ok(Json(Envelope::ok(response)))
}
