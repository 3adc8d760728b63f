use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::advice::AdviceGenerator;
use super::carbon::CarbonAdvisor;
use super::catalog::SignalCatalog;
use super::compliance::{ComplianceEvaluator, ComplianceModel};
use super::composite::{Band, CompositeWeights};
use super::domain::ScoreRequest;
use super::fetch::PageFetch;
use super::issues::IssueAggregator;
use super::report::{ScoreReport, Subscore, WebsiteFindingsView};
use super::website::WebsiteSignalExtractor;

/// Strategy selection for one deployment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringConfig {
    pub compliance_model: ComplianceModel,
    pub weights: CompositeWeights,
    pub next_step_url: String,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            compliance_model: ComplianceModel::default(),
            weights: CompositeWeights::default(),
            next_step_url: "/thanks".to_string(),
        }
    }
}

/// Stateless engine turning a request and its fetched page into a report.
#[derive(Debug, Clone)]
pub struct ReadinessEngine {
    compliance: ComplianceEvaluator,
    website: WebsiteSignalExtractor,
    carbon: CarbonAdvisor,
    advice: AdviceGenerator,
    weights: CompositeWeights,
    next_step_url: String,
}

impl ReadinessEngine {
    pub fn new(catalog: Arc<SignalCatalog>, config: ScoringConfig) -> Self {
        Self {
            compliance: ComplianceEvaluator::new(catalog, config.compliance_model),
            website: WebsiteSignalExtractor,
            carbon: CarbonAdvisor,
            advice: AdviceGenerator,
            weights: config.weights,
            next_step_url: config.next_step_url,
        }
    }

    pub fn standard() -> Self {
        Self::new(Arc::new(SignalCatalog::standard()), ScoringConfig::default())
    }

    /// True when a disqualifier short-circuits scoring; no fetch is needed in that case.
    pub fn is_disqualified(&self, request: &ScoreRequest) -> bool {
        self.compliance.is_disqualified(&request.answers)
    }

    /// Score a request. `page` is the fetch outcome for `request.website`, if one was attempted.
    pub fn score(
        &self,
        request: &ScoreRequest,
        page: Option<&PageFetch>,
        current_year: i32,
    ) -> ScoreReport {
        let failed = self.compliance.failed_disqualifiers(&request.answers);
        if !failed.is_empty() {
            debug!(?failed, "disqualifier present, returning early-stage report");
            return ScoreReport::early_stage(
                self.next_step_url.clone(),
                self.weights.includes_carbon(),
            );
        }

        let compliance = self.compliance.evaluate(&request.answers);
        let scan = self.website.scan(request.scannable_website(), page);
        let carbon = self
            .carbon
            .advise(&request.carbon, &request.answers, current_year);

        let aggregate = IssueAggregator::merge(compliance.issues, scan.issues());
        let website_missing = scan.missing_labels();
        let bullets = self.advice.bullets(&aggregate, &website_missing);

        let perception_pct = scan.perception_pct();
        let overall_pct =
            self.weights
                .overall_pct(compliance.compliance_pct, perception_pct, carbon.carbon_pct);
        let band = Band::for_pct(overall_pct);

        debug!(
            overall_pct,
            compliance_pct = compliance.compliance_pct,
            perception_pct,
            carbon_pct = carbon.carbon_pct,
            issues = aggregate.tally().total(),
            "request scored"
        );

        let website_findings = scan.is_supplied().then(|| WebsiteFindingsView {
            present: scan.present_labels(),
            missing: website_missing,
        });

        ScoreReport {
            overall_pct,
            band_label: band.label(),
            compliance_band: Some(compliance.band),
            bullets,
            subscore: Subscore {
                compliance_pct: compliance.compliance_pct,
                perception_pct,
                carbon_pct: self.weights.includes_carbon().then_some(carbon.carbon_pct),
            },
            rag: aggregate.tally(),
            issues: aggregate.into_issues(),
            website_findings,
            carbon_advice: Some(carbon.advice),
            next_step_url: self.next_step_url.clone(),
        }
    }
}
