use std::path::PathBuf;

pub const DEFAULT_SERVER_PORT: u16 = 3000;
pub const DEFAULT_DIST_DIR: &str = "client/dist";
pub const DEFAULT_DATA_DIR: &str = "client/data";

pub const BOUNDARIES_FILE: &str = "countries.json";
pub const SCORES_FILE: &str = "whr2018scores.csv";

pub fn server_port() -> u16 {
    std::env::var("HAPPINESS_PORT")
        .ok()
        .and_then(|value| value.trim().parse::<u16>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_SERVER_PORT)
}

/// Built client bundle (trunk output).
pub fn dist_dir() -> PathBuf {
    dir_from_env("HAPPINESS_DIST_DIR", DEFAULT_DIST_DIR)
}

/// Directory holding the boundary and score documents.
pub fn data_dir() -> PathBuf {
    dir_from_env("HAPPINESS_DATA_DIR", DEFAULT_DATA_DIR)
}

fn dir_from_env(key: &str, default: &str) -> PathBuf {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}
