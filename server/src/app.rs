use std::path::Path;

use axum::{
    Router,
    extract::Request,
    http::{HeaderValue, header},
    middleware::{self, Next},
    response::Response,
};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;

use crate::routes;
use crate::state::ServerState;

pub(crate) fn build_app(state: ServerState) -> Router {
    // Bundle first; the data documents resolve next to it at the root.
    let static_files = ServeDir::new(&state.dist_dir)
        .precompressed_br()
        .precompressed_gzip()
        .fallback(ServeDir::new(&state.data_dir));

    let static_assets = Router::new()
        .fallback_service(static_files)
        .layer(middleware::from_fn(set_static_cache_control));

    Router::new()
        .route("/api/health", axum::routing::get(routes::api::health))
        .layer(CompressionLayer::new())
        .fallback_service(static_assets)
        .with_state(state)
}

async fn set_static_cache_control(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let mut response = next.run(request).await;

    if response.status().is_success()
        && let Some(cache_control) = cache_control_for_path(&path)
    {
        response.headers_mut().insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static(cache_control),
        );
    }

    response
}

fn cache_control_for_path(path: &str) -> Option<&'static str> {
    if is_hashed_bundle_asset(path) {
        return Some("public, max-age=31536000, immutable");
    }

    if is_data_document(path) {
        return Some("public, max-age=3600");
    }

    None
}

fn is_data_document(path: &str) -> bool {
    matches!(
        Path::new(path).extension().and_then(|ext| ext.to_str()),
        Some("json" | "geojson" | "csv")
    )
}

fn is_hashed_bundle_asset(path: &str) -> bool {
    let Some(ext) = Path::new(path).extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    if !matches!(ext, "wasm" | "js" | "css") {
        return false;
    }

    let Some(filename) = Path::new(path).file_name().and_then(|name| name.to_str()) else {
        return false;
    };

    filename
        .split(['-', '_', '.'])
        .any(|segment| segment.len() >= 8 && segment.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::data::validate_data_dir;

    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../shared/fixtures")
    }

    async fn fixture_app() -> Router {
        let data_dir = fixtures_dir();
        let summary = validate_data_dir(&data_dir).await;
        // No bundle in tests: every static request falls through to the data dir.
        build_app(ServerState::new(
            summary,
            PathBuf::from("/nonexistent/happiness-dist"),
            data_dir,
        ))
    }

    async fn get(app: Router, uri: &str) -> Response {
        app.oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router is infallible")
    }

    #[test]
    fn immutable_cache_for_hashed_bundle_assets() {
        assert_eq!(
            cache_control_for_path("/happiness-client-71578f6b278221f3_bg.wasm"),
            Some("public, max-age=31536000, immutable")
        );
        assert_eq!(
            cache_control_for_path("/happiness-client-71578f6b278221f3.js"),
            Some("public, max-age=31536000, immutable")
        );
    }

    #[test]
    fn hour_cache_for_data_documents() {
        assert_eq!(
            cache_control_for_path("/countries.json"),
            Some("public, max-age=3600")
        );
        assert_eq!(
            cache_control_for_path("/whr2018scores.csv"),
            Some("public, max-age=3600")
        );
    }

    #[test]
    fn no_cache_header_override_for_html() {
        assert_eq!(cache_control_for_path("/"), None);
        assert_eq!(cache_control_for_path("/index.html"), None);
    }

    #[tokio::test]
    async fn health_reports_join_summary() {
        let response = get(fixture_app().await, "/api/health").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("health body");
        let health: serde_json::Value = serde_json::from_slice(&body).expect("health is JSON");
        assert_eq!(health["status"], "ok");
        assert_eq!(health["scores"], 6);
        assert_eq!(health["boundaries"], 6);
        assert_eq!(health["matched"], 5);
        assert_eq!(health["unmatched"], serde_json::json!(["Atlantis"]));
        assert!(health.get("error").is_none());
    }

    #[tokio::test]
    async fn data_documents_are_served_from_the_root() {
        let response = get(fixture_app().await, "/whr2018scores.csv").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL),
            Some(&HeaderValue::from_static("public, max-age=3600"))
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("csv body");
        assert!(body.starts_with(b"Country,Happiness score"));
    }

    #[tokio::test]
    async fn unknown_paths_are_not_found() {
        let response = get(fixture_app().await, "/missing.json").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().get(header::CACHE_CONTROL).is_none());
    }
}
