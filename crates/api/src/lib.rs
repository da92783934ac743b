//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - The upload, listing, deletion and status routes
//! - Multipart staging of uploads on local disk
//! - The `{ success, ... }` response envelope

pub mod envelope;
pub mod routes;
pub mod staging;

#[cfg(test)]
mod test_support;

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use photodrop_core::AssetProvider;
use photodrop_shared::{AppConfig, CorsConfig, ServerConfig};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Provider every request is relayed to.
    pub provider: Arc<dyn AssetProvider>,
    /// Directory uploads are staged in before relaying.
    pub upload_dir: Arc<PathBuf>,
}

impl AppState {
    /// Creates state for `provider` using the server settings.
    pub fn new(provider: Arc<dyn AssetProvider>, server: &ServerConfig) -> Self {
        Self {
            provider,
            upload_dir: Arc::new(server.upload_dir.clone()),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState, config: &AppConfig) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .layer(DefaultBodyLimit::max(config.server.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors))
        .with_state(state)
}

/// Credentialed CORS restricted to the configured origins.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Binds the configured address and serves `provider` until the process exits.
///
/// # Errors
///
/// Returns an error if the staging directory cannot be created, the address
/// cannot be bound, or the server fails.
pub async fn serve(config: &AppConfig, provider: Arc<dyn AssetProvider>) -> std::io::Result<()> {
    tokio::fs::create_dir_all(&config.server.upload_dir).await?;

    let name = provider.name();
    let app = create_router(AppState::new(provider, &config.server), config);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(provider = name, "Server listening on {}", addr);

    axum::serve(listener, app).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::test_support::{FakeProvider, test_app};

    fn status_request(origin: &str) -> Request<Body> {
        Request::builder()
            .uri("/")
            .header(header::ORIGIN, origin)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin_with_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(Arc::new(FakeProvider::default()), dir.path());

        let response = app
            .oneshot(status_request("http://localhost:3000"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:3000"
        );
        assert_eq!(
            headers
                .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
                .unwrap(),
            "true"
        );
    }

    #[tokio::test]
    async fn test_cors_omits_headers_for_other_origins() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(Arc::new(FakeProvider::default()), dir.path());

        let response = app
            .oneshot(status_request("https://evil.example.com"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_preflight_allows_post_with_content_type() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(Arc::new(FakeProvider::default()), dir.path());

        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/upload")
            .header(header::ORIGIN, "http://localhost:3000")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let methods = response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_METHODS)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(methods.contains("POST"));
    }
}
