use serde::{Deserialize, Serialize};

use super::compliance::clamp_pct;

/// Blend of sub-scores into the overall percentage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompositeWeights {
    pub compliance: f64,
    pub perception: f64,
    pub carbon: f64,
}

impl CompositeWeights {
    /// Compliance, perception and carbon.
    pub const fn three_factor() -> Self {
        Self {
            compliance: 0.45,
            perception: 0.35,
            carbon: 0.20,
        }
    }

    /// Carbon out of scope.
    pub const fn two_factor() -> Self {
        Self {
            compliance: 0.60,
            perception: 0.40,
            carbon: 0.0,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "three_factor" | "with_carbon" => Some(Self::three_factor()),
            "two_factor" | "without_carbon" => Some(Self::two_factor()),
            _ => None,
        }
    }

    pub fn includes_carbon(&self) -> bool {
        self.carbon > 0.0
    }

    pub fn overall_pct(&self, compliance_pct: u8, perception_pct: u8, carbon_pct: u8) -> u8 {
        let carbon = if self.includes_carbon() {
            self.carbon * f64::from(carbon_pct)
        } else {
            0.0
        };
        clamp_pct(
            self.compliance * f64::from(compliance_pct)
                + self.perception * f64::from(perception_pct)
                + carbon,
        )
    }
}

impl Default for CompositeWeights {
    fn default() -> Self {
        Self::three_factor()
    }
}

/// Qualitative label for the overall percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    PublicSectorReady,
    NearlyThere,
    Emerging,
    EarlyStage,
}

impl Band {
    pub fn for_pct(pct: u8) -> Self {
        match pct {
            80.. => Self::PublicSectorReady,
            60..=79 => Self::NearlyThere,
            40..=59 => Self::Emerging,
            _ => Self::EarlyStage,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::PublicSectorReady => "Public-sector ready (indicative)",
            Self::NearlyThere => "Nearly there — a few gaps",
            Self::Emerging => "Emerging — quick wins available",
            Self::EarlyStage => "Early stage — start with foundations",
        }
    }
}
