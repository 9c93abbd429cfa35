use futures::future::{self, Either};
use futures::pin_mut;
use gloo_timers::future::TimeoutFuture;

use happiness_shared::{AppState, LoadError};

pub const BOUNDARIES_URL: &str = "countries.json";
pub const SCORES_URL: &str = "whr2018scores.csv";
pub const LOAD_TIMEOUT_SECS: u64 = 15;

/// GET a document as text. Non-2xx responses are errors.
pub async fn fetch_text(url: &str) -> Result<String, LoadError> {
    let resp = gloo_net::http::Request::get(url)
        .send()
        .await
        .map_err(|e| LoadError::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        })?;

    if !resp.ok() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status: resp.status(),
        });
    }

    resp.text().await.map_err(|e| LoadError::Fetch {
        url: url.to_string(),
        message: e.to_string(),
    })
}

/// Fetch both documents concurrently and build the joined state.
///
/// Nothing is built until both documents have arrived; if either fails, or
/// neither finishes within the timeout, no state is produced.
pub async fn load_app_state() -> Result<AppState, LoadError> {
    let both = future::try_join(fetch_text(BOUNDARIES_URL), fetch_text(SCORES_URL));
    let timeout = TimeoutFuture::new((LOAD_TIMEOUT_SECS * 1000) as u32);
    pin_mut!(both);

    let (geojson, csv) = match future::select(both, timeout).await {
        Either::Left((result, _)) => result?,
        Either::Right(_) => {
            return Err(LoadError::Timeout {
                secs: LOAD_TIMEOUT_SECS,
            });
        }
    };

    let state = AppState::from_sources(&geojson, &csv)?;
    let summary = state.join_summary();
    web_sys::console::info_1(
        &format!(
            "loaded {} score records, {} boundaries ({} matched)",
            state.scores().len(),
            state.boundaries().len(),
            summary.matched
        )
        .into(),
    );
    if !summary.unmatched.is_empty() {
        web_sys::console::info_1(
            &format!(
                "boundaries without a score: {}",
                summary.unmatched.join(", ")
            )
            .into(),
        );
    }
    for name in state.index().duplicates() {
        web_sys::console::warn_1(&format!("duplicate score row for {name}; keeping the first").into());
    }
    Ok(state)
}
