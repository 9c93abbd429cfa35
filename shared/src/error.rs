use thiserror::Error;

/// Everything that can stop the two input documents from becoming an `AppState`.
///
/// Per-field numeric coercion failures never show up here; they become NaN.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("fetch error for {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("timed out after {secs}s waiting for map data")]
    Timeout { secs: u64 },

    #[error("invalid GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("boundary document is not a GeoJSON FeatureCollection")]
    NotAFeatureCollection,

    #[error("invalid score CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("score CSV is missing required column `{0}`")]
    MissingColumn(String),
}
