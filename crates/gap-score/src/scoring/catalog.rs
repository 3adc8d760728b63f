use serde::Serialize;

/// Severity class of a questionnaire signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalTier {
    /// Absence is a blocking gap.
    Mandatory,
    /// Absence is a moderate gap, penalized only when the key was submitted.
    Expected,
    /// Bonus only.
    Optional,
}

impl SignalTier {
    pub const fn ordered() -> [SignalTier; 3] {
        [Self::Mandatory, Self::Expected, Self::Optional]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Mandatory => "Mandatory",
            Self::Expected => "Expected",
            Self::Optional => "Optional",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalDefinition {
    pub key: &'static str,
    pub label: &'static str,
    pub tier: SignalTier,
    pub weight: u16,
    /// A stronger signal whose presence satisfies this one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub superseded_by: Option<&'static str>,
}

impl SignalDefinition {
    const fn new(key: &'static str, label: &'static str, tier: SignalTier, weight: u16) -> Self {
        Self {
            key,
            label,
            tier,
            weight,
            superseded_by: None,
        }
    }

    const fn superseded_by(mut self, key: &'static str) -> Self {
        self.superseded_by = Some(key);
        self
    }
}

/// Versioned rule table for questionnaire signals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalCatalog {
    pub version: &'static str,
    signals: Vec<SignalDefinition>,
    disqualifiers: Vec<&'static str>,
}

impl SignalCatalog {
    pub fn new(
        version: &'static str,
        signals: Vec<SignalDefinition>,
        disqualifiers: Vec<&'static str>,
    ) -> Self {
        Self {
            version,
            signals,
            disqualifiers,
        }
    }

    /// The current UK public-sector rule set.
    pub fn standard() -> Self {
        use SignalTier::{Expected, Mandatory, Optional};

        let signals = vec![
            SignalDefinition::new("insolvency_clear", "Not insolvent or in administration", Mandatory, 12),
            SignalDefinition::new("tax_clear", "Tax affairs up to date", Mandatory, 10),
            SignalDefinition::new("no_convictions", "No disqualifying convictions", Mandatory, 8),
            SignalDefinition::new("insurance_pl", "Public Liability insurance", Mandatory, 3),
            SignalDefinition::new("insurance_el", "Employer's Liability insurance", Mandatory, 3),
            SignalDefinition::new("dp_ukgdpr", "UK GDPR / DPA 2018 policy", Mandatory, 8),
            SignalDefinition::new("h_and_s", "Health & Safety policy", Mandatory, 4),
            SignalDefinition::new("insurance_pi", "Professional Indemnity insurance", Expected, 3),
            SignalDefinition::new("iso_9001", "ISO 9001 quality management", Expected, 6),
            SignalDefinition::new("iso_27001", "ISO 27001 information security", Expected, 8),
            SignalDefinition::new("iso_14001", "ISO 14001 environmental management", Expected, 4),
            SignalDefinition::new("iso_20000", "ISO 20000 IT service management", Expected, 5),
            SignalDefinition::new("ce_plus", "Cyber Essentials Plus", Expected, 6),
            SignalDefinition::new("ce_basic", "Cyber Essentials", Expected, 3)
                .superseded_by("ce_plus"),
            SignalDefinition::new("csa_star", "CSA STAR cloud assurance", Expected, 4),
            SignalDefinition::new("bpss", "BPSS staff vetting", Expected, 5),
            SignalDefinition::new("modern_slavery", "Modern Slavery statement", Expected, 6),
            SignalDefinition::new("edi", "Equality, diversity & inclusion policy", Expected, 4),
            SignalDefinition::new("whistleblowing", "Whistleblowing policy", Expected, 2),
            SignalDefinition::new("anti_bribery", "Anti-bribery policy", Expected, 4),
            SignalDefinition::new("bcp_dr", "Business continuity & disaster recovery", Expected, 5),
            SignalDefinition::new("supplier_mgmt", "Supplier management process", Expected, 2),
            SignalDefinition::new("crp_ppn", "Carbon Reduction Plan (PPN 06/21)", Expected, 6),
            SignalDefinition::new("scope12_reporting", "Scope 1 & 2 emissions reporting", Expected, 3),
            SignalDefinition::new("carbon_targets", "Published carbon targets", Expected, 2),
            SignalDefinition::new("ps_experience_some", "Public-sector delivery experience", Expected, 5),
            SignalDefinition::new("case_studies_2plus", "Two or more case studies", Expected, 3),
            SignalDefinition::new("financial_stability", "Evidence of financial stability", Expected, 6),
            SignalDefinition::new("portals_registered", "Registered on tender portals", Expected, 3),
            SignalDefinition::new("bid_process", "Documented bid process", Expected, 3),
            SignalDefinition::new("insurance_pl_10m_bonus", "Public Liability cover of £10m+", Optional, 1),
            SignalDefinition::new("sc_or_dv", "SC or DV cleared staff", Optional, 3),
            SignalDefinition::new("iso_50001", "ISO 50001 energy management", Optional, 1),
            SignalDefinition::new("sbti", "Science Based Targets commitment", Optional, 1),
            SignalDefinition::new("carbon_trust", "Carbon Trust certification", Optional, 1),
            SignalDefinition::new("ps_experience_strong", "Strong public-sector track record", Optional, 7),
            SignalDefinition::new("prev_framework_award", "Previous framework award", Optional, 2),
            SignalDefinition::new("sv_local_employment", "Social value: local employment", Optional, 1),
            SignalDefinition::new("sv_apprenticeships", "Social value: apprenticeships", Optional, 1),
            SignalDefinition::new("sv_sme_supply_chain", "Social value: SME supply chain", Optional, 1),
            SignalDefinition::new("sv_environment", "Social value: environmental initiatives", Optional, 1),
        ];

        Self::new(
            "2025.1",
            signals,
            vec!["insolvency_clear", "tax_clear", "no_convictions"],
        )
    }

    pub fn get(&self, key: &str) -> Option<&SignalDefinition> {
        self.signals.iter().find(|signal| signal.key == key)
    }

    pub fn tier_of(&self, key: &str) -> Option<SignalTier> {
        self.get(key).map(|signal| signal.tier)
    }

    pub fn weight_of(&self, key: &str) -> Option<u16> {
        self.get(key).map(|signal| signal.weight)
    }

    pub fn label_of(&self, key: &str) -> Option<&'static str> {
        self.get(key).map(|signal| signal.label)
    }

    /// All signals in declaration order.
    pub fn signals(&self) -> &[SignalDefinition] {
        &self.signals
    }

    /// Signals of one tier, in declaration order.
    pub fn in_tier(&self, tier: SignalTier) -> impl Iterator<Item = &SignalDefinition> {
        self.signals.iter().filter(move |signal| signal.tier == tier)
    }

    /// Keys whose absence makes further scoring moot.
    pub fn disqualifiers(&self) -> &[&'static str] {
        &self.disqualifiers
    }
}

impl Default for SignalCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
