use std::any::Any;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;
use subtle::ConstantTimeEq;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{error, warn};

use super::carbon::Clock;
use super::domain::ScoreRequest;
use super::fetch::SiteFetcher;
use super::service::ReadinessService;
use crate::config::{AuthConfig, CorsConfig};

pub const SCORE_PATH: &str = "/api/gap-score";
pub const API_KEY_HEADER: &str = "x-key";

/// Shared-secret check for the scoring endpoint.
#[derive(Clone, Default)]
pub struct ApiGuard {
    api_key: Option<Arc<str>>,
}

impl ApiGuard {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.map(Arc::from),
        }
    }

    /// Constant-time comparison of the presented key. Always true when no key is configured.
    pub fn authorize(&self, headers: &HeaderMap) -> bool {
        let Some(expected) = self.api_key.as_deref() else {
            return true;
        };
        let presented = headers
            .get(API_KEY_HEADER)
            .map(HeaderValue::as_bytes)
            .unwrap_or_default();
        bool::from(presented.ct_eq(expected.as_bytes()))
    }

    pub fn is_enforced(&self) -> bool {
        self.api_key.is_some()
    }
}

impl From<&AuthConfig> for ApiGuard {
    fn from(config: &AuthConfig) -> Self {
        Self::new(config.api_key.clone())
    }
}

struct ScoreState<F, C> {
    service: Arc<ReadinessService<F, C>>,
    guard: ApiGuard,
}

/// Router exposing the scoring endpoint with auth, CORS and panic containment.
pub fn score_router<F, C>(
    service: Arc<ReadinessService<F, C>>,
    guard: ApiGuard,
    cors: &CorsConfig,
) -> Router
where
    F: SiteFetcher + 'static,
    C: Clock + 'static,
{
    let state = Arc::new(ScoreState { service, guard });

    Router::new()
        .route(SCORE_PATH, post(score_handler::<F, C>))
        .with_state(state)
        .layer(cors_layer(cors))
        .layer(CatchPanicLayer::custom(panic_response))
}

async fn score_handler<F, C>(
    State(state): State<Arc<ScoreState<F, C>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response
where
    F: SiteFetcher + 'static,
    C: Clock + 'static,
{
    if !state.guard.authorize(&headers) {
        warn!("rejected score request with missing or invalid key");
        let payload = json!({ "error": "unauthorized" });
        return (StatusCode::UNAUTHORIZED, Json(payload)).into_response();
    }

    let request = ScoreRequest::from_slice(&body);
    let report = state.service.assess(&request).await;
    (StatusCode::OK, Json(report)).into_response()
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(API_KEY_HEADER)])
}

fn panic_response(_panic: Box<dyn Any + Send + 'static>) -> Response {
    error!("score handler panicked");
    let payload = json!({ "error": "server_error" });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
}
