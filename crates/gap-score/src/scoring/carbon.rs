use chrono::{Datelike, Utc};
use serde::Serialize;

use super::domain::{AnswerSet, CarbonFigures};

const DEFAULT_TARGET_YEAR: i32 = 2050;
const EARLIEST_BASELINE_YEAR: f64 = 1990.0;
const PROXY_REDUCTION_PERCENT: f64 = 4.2;
const PROXY_MESSAGE: &str =
    "Provide a baseline to calculate tonnage. Proxy: ~4.2% absolute Scope 1+2 reduction per year.";

const CARBON_PLAN: &str = "crp_ppn";
const EVIDENCE_FLAGS: [&str; 3] = [CARBON_PLAN, "scope12_reporting", "carbon_targets"];
/// Sub-score by number of evidence flags set, when baseline data is present.
const DATA_MODE_SCORES: [u8; 4] = [45, 55, 62, 75];
const INDICATIVE_WITH_PLAN: u8 = 60;
const INDICATIVE_WITHOUT_PLAN: u8 = 45;

/// Source of "this year" for defaulting the carbon current year.
pub trait Clock: Send + Sync {
    fn current_year(&self) -> i32;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_year(&self) -> i32 {
        Utc::now().year()
    }
}

/// Pinned year, for tests and reproducible offline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i32);

impl Clock for FixedClock {
    fn current_year(&self) -> i32 {
        self.0
    }
}

/// Reduction trajectory returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum CarbonAdvice {
    Data {
        #[serde(rename = "baselineYear")]
        baseline_year: i32,
        #[serde(rename = "baselineTCO2e")]
        baseline_tco2e: f64,
        #[serde(rename = "currentYear")]
        current_year: i32,
        #[serde(rename = "currentTCO2e")]
        current_tco2e: f64,
        #[serde(rename = "targetYear")]
        target_year: i32,
        #[serde(rename = "suggestedAnnualReduction_tCO2e")]
        annual_reduction_tco2e: f64,
        #[serde(rename = "suggestedAnnualReduction_percentOfCurrent")]
        annual_reduction_pct_of_current: f64,
    },
    Indicative {
        message: &'static str,
        #[serde(rename = "suggestedAnnualReduction_percent")]
        annual_reduction_pct: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CarbonOutcome {
    pub advice: CarbonAdvice,
    pub carbon_pct: u8,
}

/// Suggests an annual emissions trajectory and scores carbon-reporting maturity.
#[derive(Debug, Clone, Copy, Default)]
pub struct CarbonAdvisor;

impl CarbonAdvisor {
    pub fn advise(&self, figures: &CarbonFigures, answers: &AnswerSet, current_year: i32) -> CarbonOutcome {
        match (figures.baseline_tco2e, figures.baseline_year) {
            (Some(baseline), Some(year)) if year > EARLIEST_BASELINE_YEAR => {
                self.data_mode(figures, baseline, year, answers, current_year)
            }
            _ => Self::indicative(answers),
        }
    }

    fn data_mode(
        &self,
        figures: &CarbonFigures,
        baseline: f64,
        baseline_year: f64,
        answers: &AnswerSet,
        clock_year: i32,
    ) -> CarbonOutcome {
        let target_year = year_or(figures.target_year, DEFAULT_TARGET_YEAR);
        let current_year = year_or(figures.current_year, clock_year);
        let current = figures.current_tco2e.unwrap_or(baseline);

        let years_left = (i64::from(target_year) - i64::from(current_year)).max(1);
        let annual_drop = current / years_left as f64;
        let pct_drop = if current > 0.0 {
            annual_drop / current * 100.0
        } else {
            0.0
        };

        let evidence = EVIDENCE_FLAGS
            .iter()
            .filter(|flag| answers.has(flag))
            .count();

        CarbonOutcome {
            advice: CarbonAdvice::Data {
                baseline_year: baseline_year.trunc() as i32,
                baseline_tco2e: baseline,
                current_year,
                current_tco2e: current,
                target_year,
                annual_reduction_tco2e: round1(annual_drop),
                annual_reduction_pct_of_current: round1(pct_drop),
            },
            carbon_pct: DATA_MODE_SCORES[evidence],
        }
    }

    fn indicative(answers: &AnswerSet) -> CarbonOutcome {
        let carbon_pct = if answers.has(CARBON_PLAN) {
            INDICATIVE_WITH_PLAN
        } else {
            INDICATIVE_WITHOUT_PLAN
        };

        CarbonOutcome {
            advice: CarbonAdvice::Indicative {
                message: PROXY_MESSAGE,
                annual_reduction_pct: PROXY_REDUCTION_PERCENT,
            },
            carbon_pct,
        }
    }
}

/// Zero counts as unset, matching how blank form fields arrive.
fn year_or(value: Option<f64>, fallback: i32) -> i32 {
    value
        .map(f64::trunc)
        .filter(|year| *year != 0.0 && year.abs() < f64::from(i32::MAX))
        .map(|year| year as i32)
        .unwrap_or(fallback)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
