use serde::Serialize;

use super::carbon::CarbonAdvice;
use super::compliance::ComplianceBand;
use super::composite::Band;
use super::domain::Issue;
use super::issues::RagTally;

const EARLY_STAGE_PCT: u8 = 22;
const EARLY_STAGE_BULLET: &str = "Resolve legal/financial disqualifiers before bidding.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscore {
    pub compliance_pct: u8,
    pub perception_pct: u8,
    /// Omitted when the deployment weights carbon at zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbon_pct: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WebsiteFindingsView {
    pub present: Vec<&'static str>,
    pub missing: Vec<&'static str>,
}

/// Response payload for one scoring request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    pub overall_pct: u8,
    pub band_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliance_band: Option<ComplianceBand>,
    pub bullets: Vec<String>,
    pub subscore: Subscore,
    pub rag: RagTally,
    pub issues: Vec<Issue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_findings: Option<WebsiteFindingsView>,
    pub carbon_advice: Option<CarbonAdvice>,
    pub next_step_url: String,
}

impl ScoreReport {
    /// Fixed report returned when a legal or financial disqualifier is present.
    /// `carbonPct` is only reported when the deployment weights carbon.
    pub fn early_stage(next_step_url: impl Into<String>, includes_carbon: bool) -> Self {
        Self {
            overall_pct: EARLY_STAGE_PCT,
            band_label: Band::EarlyStage.label(),
            compliance_band: None,
            bullets: vec![EARLY_STAGE_BULLET.to_string()],
            subscore: Subscore {
                compliance_pct: 0,
                perception_pct: 0,
                carbon_pct: includes_carbon.then_some(0),
            },
            rag: RagTally::default(),
            issues: Vec::new(),
            website_findings: None,
            carbon_advice: None,
            next_step_url: next_step_url.into(),
        }
    }

    pub fn band(&self) -> Band {
        Band::for_pct(self.overall_pct)
    }
}
