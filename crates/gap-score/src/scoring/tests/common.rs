use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use serde_json::Value;

use crate::config::CorsConfig;
use crate::scoring::{
    score_router, AnswerSet, ApiGuard, ComplianceEvaluator, ComplianceModel, FixedClock,
    PageFetch, ReadinessEngine, ReadinessService, ScoringConfig, SignalCatalog, SiteFetcher,
};

pub(super) const TEST_YEAR: i32 = 2025;
pub(super) const API_KEY: &str = "test-key";

pub(super) const MANDATORY_KEYS: [&str; 7] = [
    "insolvency_clear",
    "tax_clear",
    "no_convictions",
    "insurance_pl",
    "insurance_el",
    "dp_ukgdpr",
    "h_and_s",
];

pub(super) fn catalog() -> Arc<SignalCatalog> {
    Arc::new(SignalCatalog::standard())
}

pub(super) fn evaluator(model: ComplianceModel) -> ComplianceEvaluator {
    ComplianceEvaluator::new(catalog(), model)
}

pub(super) fn engine() -> ReadinessEngine {
    ReadinessEngine::new(catalog(), ScoringConfig::default())
}

/// Every mandatory signal answered yes, nothing else submitted.
pub(super) fn mandatory_answers() -> AnswerSet {
    AnswerSet::from_pairs(MANDATORY_KEYS.iter().map(|key| (*key, true)))
}

/// A page that satisfies every website predicate.
pub(super) const COMPLETE_PAGE: &str = r#"
    <footer>
      <a href="/privacy">Privacy</a> | <a href="/cookies">Cookie policy</a> |
      <a href="/accessibility">Accessibility</a> | <a href="/contact">Contact us</a>
      <p>Registered in England &amp; Wales. Company Number 01234567.</p>
      <p>Read our Case Studies and Trustpilot reviews.</p>
      <p>Modern Slavery Statement | Cyber Essentials certified</p>
    </footer>
"#;

/// Fetcher that replays a canned outcome and counts calls.
pub(super) struct StubFetcher {
    outcome: PageFetch,
    calls: AtomicUsize,
    urls: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub(super) fn new(outcome: PageFetch) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            urls: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(super) fn urls(&self) -> Vec<String> {
        self.urls.lock().expect("url mutex poisoned").clone()
    }
}

#[async_trait]
impl SiteFetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> PageFetch {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls
            .lock()
            .expect("url mutex poisoned")
            .push(url.to_string());
        self.outcome.clone()
    }
}

pub(super) fn service(
    fetcher: Arc<StubFetcher>,
) -> Arc<ReadinessService<StubFetcher, FixedClock>> {
    Arc::new(ReadinessService::new(
        Arc::new(engine()),
        fetcher,
        Arc::new(FixedClock(TEST_YEAR)),
    ))
}

pub(super) fn router(fetcher: Arc<StubFetcher>, api_key: Option<&str>) -> axum::Router {
    let cors = CorsConfig {
        allowed_origins: vec!["https://bids.example.co.uk".to_string()],
    };
    score_router(
        service(fetcher),
        ApiGuard::new(api_key.map(str::to_string)),
        &cors,
    )
}

pub(super) fn score_request(body: &str, key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/gap-score")
        .header("content-type", "application/json");
    if let Some(key) = key {
        builder = builder.header("x-key", key);
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

pub(super) async fn json_body(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let value = serde_json::from_slice(&bytes).expect("json body");
    (status, value)
}
