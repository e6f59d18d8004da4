//! Delivery shim: serves the built single-page bundle.
//!
//! Every path that is not a file under the dist directory gets `index.html`
//! with the API key substituted for [`PLACEHOLDER`]. `/index.html` itself
//! goes through the same substitution, so the raw template is never served.
//! Directory index files are never auto-served.

use crate::error::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, MethodRouter},
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info, instrument};

/// Token in `index.html` replaced by the API key at request time.
pub const PLACEHOLDER: &str = "__VITE_API_KEY_PLACEHOLDER__";

pub struct ShimState {
    pub dist_dir: PathBuf,
    pub api_key: String,
}

/// Replace the first occurrence of [`PLACEHOLDER`] with `secret`.
pub fn inject_secret(html: &str, secret: &str) -> String {
    html.replacen(PLACEHOLDER, secret, 1)
}

#[instrument(level = "debug", skip_all)]
async fn index(State(state): State<Arc<ShimState>>) -> Response {
    let path = state.dist_dir.join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Html(inject_secret(&html, &state.api_key)).into_response(),
        Err(e) => {
            error!(path = %path.display(), error = %e, "Error reading index.html");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

pub fn create_app(state: ShimState) -> Router {
    let state = Arc::new(state);
    let spa_fallback: MethodRouter = get(index).with_state(Arc::clone(&state));
    let assets = ServeDir::new(&state.dist_dir)
        .append_index_html_on_directories(false)
        .fallback(spa_fallback);

    Router::new()
        .route("/index.html", get(index))
        .fallback_service(assets)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `port` on all interfaces and serve until the process is stopped.
pub async fn serve(state: ShimState, port: u16) -> Result<()> {
    if state.api_key.is_empty() {
        tracing::warn!("API key is empty; the page will not be able to reach the model");
    }
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let dist_dir = state.dist_dir.display().to_string();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, %dist_dir, "Server running on port {}", port);
    axum::serve(listener, create_app(state)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    const TEMPLATE: &str =
        "<html><script>window.API_KEY = \"__VITE_API_KEY_PLACEHOLDER__\";</script></html>";

    fn dist_with_index() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), TEMPLATE).unwrap();
        std::fs::create_dir(dir.path().join("assets")).unwrap();
        std::fs::write(dir.path().join("assets/app.js"), "console.log('__VITE_API_KEY_PLACEHOLDER__')").unwrap();
        dir
    }

    fn app(dir: &tempfile::TempDir) -> Router {
        create_app(ShimState {
            dist_dir: dir.path().to_path_buf(),
            api_key: "sekret".to_string(),
        })
    }

    async fn get_body(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn test_inject_secret_replaces_first_only() {
        let html = format!("{p} {p}", p = PLACEHOLDER);
        assert_eq!(inject_secret(&html, "k"), format!("k {}", PLACEHOLDER));
        assert_eq!(inject_secret("no token", "k"), "no token");
    }

    #[tokio::test]
    async fn test_root_serves_injected_index() {
        let dir = dist_with_index();
        let (status, body) = get_body(app(&dir), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("window.API_KEY = \"sekret\""));
        assert!(!body.contains(PLACEHOLDER));
    }

    #[tokio::test]
    async fn test_client_routes_serve_index() {
        let dir = dist_with_index();
        let (status, body) = get_body(app(&dir), "/news/rockets/42").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("sekret"));
    }

    #[tokio::test]
    async fn test_index_html_is_injected() {
        let dir = dist_with_index();
        let (status, body) = get_body(app(&dir), "/index.html").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("sekret"));
    }

    #[tokio::test]
    async fn test_assets_are_served_verbatim() {
        let dir = dist_with_index();
        let (status, body) = get_body(app(&dir), "/assets/app.js").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "console.log('__VITE_API_KEY_PLACEHOLDER__')");
    }

    #[tokio::test]
    async fn test_missing_index_is_server_error() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = get_body(app(&dir), "/").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Internal Server Error");
    }

    #[tokio::test]
    async fn test_empty_secret_injects_nothing() {
        let dir = dist_with_index();
        let app = create_app(ShimState {
            dist_dir: dir.path().to_path_buf(),
            api_key: String::new(),
        });
        let (_, body) = get_body(app, "/").await;
        assert!(body.contains("window.API_KEY = \"\""));
    }
}
