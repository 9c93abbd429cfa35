use std::path::Path;

use happiness_shared::AppState;
use serde::Serialize;

use crate::config::{BOUNDARIES_FILE, SCORES_FILE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataStatus {
    Ok,
    Degraded,
}

/// Result of validating the data directory at startup, reported by `/api/health`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataSummary {
    pub status: DataStatus,
    pub scores: usize,
    pub boundaries: usize,
    pub matched: usize,
    /// Boundary names with no score row.
    pub unmatched: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DataSummary {
    fn degraded(error: String) -> Self {
        Self {
            status: DataStatus::Degraded,
            scores: 0,
            boundaries: 0,
            matched: 0,
            unmatched: Vec::new(),
            error: Some(error),
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        let join = state.join_summary();
        Self {
            status: DataStatus::Ok,
            scores: state.scores().len(),
            boundaries: state.boundaries().len(),
            matched: join.matched,
            unmatched: join.unmatched,
            error: None,
        }
    }
}

/// Parse and join both documents with the same code the client uses.
/// Failures are logged and reported as a degraded summary; serving continues.
pub async fn validate_data_dir(dir: &Path) -> DataSummary {
    let boundaries_path = dir.join(BOUNDARIES_FILE);
    let scores_path = dir.join(SCORES_FILE);

    let (geojson, csv) = match tokio::try_join!(
        tokio::fs::read_to_string(&boundaries_path),
        tokio::fs::read_to_string(&scores_path),
    ) {
        Ok(texts) => texts,
        Err(e) => {
            tracing::warn!(error = %e, dir = %dir.display(), "failed to read data files");
            return DataSummary::degraded(format!("read error: {e}"));
        }
    };

    let state = match AppState::from_sources(&geojson, &csv) {
        Ok(state) => state,
        Err(e) => {
            tracing::warn!(error = %e, dir = %dir.display(), "data files failed validation");
            return DataSummary::degraded(e.to_string());
        }
    };

    let summary = DataSummary::from_state(&state);
    tracing::info!(
        scores = summary.scores,
        boundaries = summary.boundaries,
        matched = summary.matched,
        unmatched = summary.unmatched.len(),
        "data files validated"
    );
    for name in state.index().duplicates() {
        tracing::warn!(country = %name, "duplicate score row; the first one wins");
    }
    summary
}
