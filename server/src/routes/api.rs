use axum::Json;
use axum::extract::State;

use crate::data::DataSummary;
use crate::state::ServerState;

pub async fn health(State(state): State<ServerState>) -> Json<DataSummary> {
    Json(state.summary.as_ref().clone())
}
