use std::path::PathBuf;
use std::sync::Arc;

use crate::data::DataSummary;

/// Shared, read-only server state.
#[derive(Clone)]
pub struct ServerState {
    pub summary: Arc<DataSummary>,
    pub dist_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl ServerState {
    pub fn new(summary: DataSummary, dist_dir: PathBuf, data_dir: PathBuf) -> Self {
        Self {
            summary: Arc::new(summary),
            dist_dir,
            data_dir,
        }
    }
}
