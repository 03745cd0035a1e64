use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use crate::{domain::search::SourceHealth, routes::Envelope, AppState};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(health))
}

/// Index liveness for operators. The probe itself never fails; an unreachable index is
/// reported in the payload.
#[instrument(name = "GET /health", skip(app_state))]
async fn health(State(app_state): State<AppState>) -> Json<Envelope<SourceHealth>> {
    Json(Envelope::ok(app_state.aggregator().health().await))
}
