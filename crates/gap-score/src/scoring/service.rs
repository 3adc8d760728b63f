use std::sync::Arc;

use tracing::info;

use super::carbon::Clock;
use super::domain::ScoreRequest;
use super::engine::ReadinessEngine;
use super::fetch::SiteFetcher;
use super::report::ScoreReport;

/// Service composing the engine with the outbound fetch and the year source.
pub struct ReadinessService<F, C> {
    engine: Arc<ReadinessEngine>,
    fetcher: Arc<F>,
    clock: Arc<C>,
}

impl<F, C> ReadinessService<F, C>
where
    F: SiteFetcher + 'static,
    C: Clock + 'static,
{
    pub fn new(engine: Arc<ReadinessEngine>, fetcher: Arc<F>, clock: Arc<C>) -> Self {
        Self {
            engine,
            fetcher,
            clock,
        }
    }

    pub fn engine(&self) -> &ReadinessEngine {
        &self.engine
    }

    /// Score a request, fetching its website at most once.
    pub async fn assess(&self, request: &ScoreRequest) -> ScoreReport {
        if self.engine.is_disqualified(request) {
            let report = self.engine.score(request, None, self.clock.current_year());
            info!(overall_pct = report.overall_pct, "scored disqualified request");
            return report;
        }

        let page = match request.scannable_website() {
            Some(url) => Some(self.fetcher.fetch(url).await),
            None => None,
        };

        let report = self
            .engine
            .score(request, page.as_ref(), self.clock.current_year());

        info!(
            overall_pct = report.overall_pct,
            band = report.band_label,
            red = report.rag.red,
            amber = report.rag.amber,
            green = report.rag.green,
            "scored request"
        );
        report
    }
}
