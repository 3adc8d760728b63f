use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::catalog::{SignalCatalog, SignalDefinition, SignalTier};
use super::domain::{AnswerSet, Issue, IssueSource, Severity};
use super::issues::RagTally;

/// Answer flagging that the business is actively pursuing public-sector work.
const PUBLIC_SECTOR_FLAG: &str = "targets_public_sector";
/// Expected signal escalated when the business targets the public sector.
const MODERN_SLAVERY_KEY: &str = "modern_slavery";
/// Ratio-model deduction applied alongside the escalation above.
const MODERN_SLAVERY_RATIO_DEDUCTION: f64 = 3.0;

/// Points deducted per outstanding issue in the penalty model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltySchedule {
    pub red: u16,
    pub amber: u16,
    pub green: u16,
}

impl Default for PenaltySchedule {
    fn default() -> Self {
        Self {
            red: 20,
            amber: 8,
            green: 2,
        }
    }
}

/// Strategy used to turn questionnaire gaps into a compliance percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceModel {
    /// `100 - Σ severity penalties`, clamped.
    Penalty(PenaltySchedule),
    /// Satisfied weight over possible weight. Kept to reproduce historical scores.
    Ratio,
}

impl ComplianceModel {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "penalty" => Some(Self::Penalty(PenaltySchedule::default())),
            "ratio" | "weighted" | "weighted_ratio" => Some(Self::Ratio),
            _ => None,
        }
    }
}

impl Default for ComplianceModel {
    fn default() -> Self {
        Self::Penalty(PenaltySchedule::default())
    }
}

/// Coarse label for the compliance percentage on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComplianceBand {
    Strong,
    Good,
    Emerging,
    Low,
}

impl ComplianceBand {
    pub fn for_pct(pct: u8) -> Self {
        match pct {
            80.. => Self::Strong,
            60..=79 => Self::Good,
            40..=59 => Self::Emerging,
            _ => Self::Low,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComplianceOutcome {
    /// Issues in catalog declaration order.
    pub issues: Vec<Issue>,
    pub compliance_pct: u8,
    pub band: ComplianceBand,
}

/// Partitions answers into satisfied and missing signals per the catalog.
#[derive(Debug, Clone)]
pub struct ComplianceEvaluator {
    catalog: Arc<SignalCatalog>,
    model: ComplianceModel,
}

impl ComplianceEvaluator {
    pub fn new(catalog: Arc<SignalCatalog>, model: ComplianceModel) -> Self {
        Self { catalog, model }
    }

    pub fn model(&self) -> ComplianceModel {
        self.model
    }

    /// Disqualifier keys that are not truthy, in catalog order.
    pub fn failed_disqualifiers(&self, answers: &AnswerSet) -> Vec<&'static str> {
        self.catalog
            .disqualifiers()
            .iter()
            .copied()
            .filter(|key| !answers.has(key))
            .collect()
    }

    pub fn is_disqualified(&self, answers: &AnswerSet) -> bool {
        !self.failed_disqualifiers(answers).is_empty()
    }

    pub fn evaluate(&self, answers: &AnswerSet) -> ComplianceOutcome {
        let issues: Vec<Issue> = self
            .catalog
            .signals()
            .iter()
            .filter_map(|signal| {
                self.gap_severity(signal, answers).map(|severity| Issue {
                    key: signal.key.to_string(),
                    label: signal.label.to_string(),
                    severity,
                    source: IssueSource::Compliance,
                })
            })
            .collect();

        let compliance_pct = match self.model {
            ComplianceModel::Penalty(schedule) => penalty_pct(&issues, schedule),
            ComplianceModel::Ratio => self.ratio_pct(answers),
        };

        ComplianceOutcome {
            issues,
            compliance_pct,
            band: ComplianceBand::for_pct(compliance_pct),
        }
    }

    fn gap_severity(&self, signal: &SignalDefinition, answers: &AnswerSet) -> Option<Severity> {
        if answers.has(signal.key) || superseded(signal, answers) {
            return None;
        }

        match signal.tier {
            SignalTier::Mandatory => Some(Severity::Red),
            SignalTier::Expected
                if answers.seen(signal.key) || escalated_for_public_sector(signal.key, answers) =>
            {
                Some(Severity::Amber)
            }
            SignalTier::Expected | SignalTier::Optional => None,
        }
    }

    fn ratio_pct(&self, answers: &AnswerSet) -> u8 {
        let (score, max) = self
            .catalog
            .signals()
            .iter()
            .filter(|signal| !superseded(signal, answers))
            .fold((0.0_f64, 0.0_f64), |(score, max), signal| {
                let weight = f64::from(signal.weight);
                let max = match signal.tier {
                    SignalTier::Optional => max,
                    SignalTier::Mandatory | SignalTier::Expected => max + weight,
                };
                let score = if answers.has(signal.key) {
                    score + weight
                } else {
                    score
                };
                (score, max)
            });

        let score = if escalated_for_public_sector(MODERN_SLAVERY_KEY, answers) {
            score - MODERN_SLAVERY_RATIO_DEDUCTION
        } else {
            score
        };

        if max <= 0.0 {
            return 0;
        }
        clamp_pct(score / max * 100.0)
    }
}

fn superseded(signal: &SignalDefinition, answers: &AnswerSet) -> bool {
    signal
        .superseded_by
        .map(|stronger| answers.has(stronger))
        .unwrap_or(false)
}

fn escalated_for_public_sector(key: &str, answers: &AnswerSet) -> bool {
    key == MODERN_SLAVERY_KEY && answers.has(PUBLIC_SECTOR_FLAG) && !answers.has(MODERN_SLAVERY_KEY)
}

fn penalty_pct(issues: &[Issue], schedule: PenaltySchedule) -> u8 {
    let tally = RagTally::from_issues(issues);
    let deduction = tally.red as f64 * f64::from(schedule.red)
        + tally.amber as f64 * f64::from(schedule.amber)
        + tally.green as f64 * f64::from(schedule.green);
    clamp_pct(100.0 - deduction)
}

/// Round to the nearest integer and clamp to 0..=100.
pub(crate) fn clamp_pct(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}
