//! Readiness scoring: signal catalog, evaluators, composite arithmetic and advice.
//!
//! Everything below [`ReadinessService`] is a pure function of the request, the fetched page
//! and the current year. The service adds the single outbound fetch and the disqualifier gate
//! that skips it.

pub mod advice;
pub mod carbon;
pub mod catalog;
pub mod compliance;
pub mod composite;
pub mod domain;
pub mod engine;
pub mod fetch;
pub mod issues;
pub mod report;
pub mod router;
pub mod service;
pub mod website;

#[cfg(test)]
mod tests;

pub use advice::AdviceGenerator;
pub use carbon::{CarbonAdvice, CarbonAdvisor, CarbonOutcome, Clock, FixedClock, SystemClock};
pub use catalog::{SignalCatalog, SignalDefinition, SignalTier};
pub use compliance::{ComplianceBand, ComplianceEvaluator, ComplianceModel, ComplianceOutcome};
pub use composite::{Band, CompositeWeights};
pub use domain::{AnswerSet, CarbonFigures, Issue, IssueSource, ScoreRequest, Severity};
pub use engine::{ReadinessEngine, ScoringConfig};
pub use fetch::{FetchError, HttpSiteFetcher, PageFetch, PageText, SiteFetcher};
pub use issues::{IssueAggregator, RagTally};
pub use report::{ScoreReport, Subscore, WebsiteFindingsView};
pub use router::{score_router, ApiGuard};
pub use service::ReadinessService;
pub use website::{WebsiteFinding, WebsiteScan, WebsiteSignalExtractor};
