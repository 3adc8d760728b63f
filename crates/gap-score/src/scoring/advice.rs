use super::domain::Severity;
use super::issues::IssueAggregator;

pub const MAX_BULLETS: usize = 3;

const FOOTER_HYGIENE: &str = "Tidy footer hygiene and clarify outcomes.";
const SOLID_BASELINE: &str =
    "Solid baseline: keep evidence current and tailor each bid to the buyer's outcomes.";

enum Trigger {
    /// Any of the keys is an outstanding Red issue.
    AnyRed(&'static [&'static str]),
    /// Any of the keys is an outstanding Amber issue.
    AnyAmber(&'static [&'static str]),
    /// Every key is an outstanding Amber issue.
    AllAmber(&'static [&'static str]),
    /// The website finding with this label is missing.
    WebsiteMissing(&'static str),
}

struct AdviceRule {
    trigger: Trigger,
    sentence: &'static str,
}

const RULES: &[AdviceRule] = &[
    AdviceRule {
        trigger: Trigger::AnyRed(&["insurance_pl", "insurance_el"]),
        sentence: "Put Public and Employer's Liability cover in place and keep current insurance certificates ready to upload.",
    },
    AdviceRule {
        trigger: Trigger::AnyRed(&["dp_ukgdpr"]),
        sentence: "Publish a UK GDPR + DPA 2018 policy with DPO/contact.",
    },
    AdviceRule {
        trigger: Trigger::AnyRed(&["h_and_s"]),
        sentence: "Adopt a written Health & Safety policy signed off by a director.",
    },
    AdviceRule {
        trigger: Trigger::AnyAmber(&["modern_slavery"]),
        sentence: "Publish a Modern Slavery statement and link it in the footer.",
    },
    AdviceRule {
        trigger: Trigger::AllAmber(&["iso_27001", "ce_plus"]),
        sentence: "Strengthen information security assurance (CE+ or ISO 27001).",
    },
    AdviceRule {
        trigger: Trigger::AnyAmber(&["bcp_dr"]),
        sentence: "Document Business Continuity & Disaster Recovery basics.",
    },
    AdviceRule {
        trigger: Trigger::AnyAmber(&["crp_ppn"]),
        sentence: "Publish a Carbon Reduction Plan in the PPN 06/21 format.",
    },
    AdviceRule {
        trigger: Trigger::AnyAmber(&["ps_experience_some", "case_studies_2plus"]),
        sentence: "Write up two public-sector-relevant case studies with measurable outcomes.",
    },
    AdviceRule {
        trigger: Trigger::WebsiteMissing("Case studies or reviews"),
        sentence: "Add 2–3 outcome-led case studies or link to reviews.",
    },
    AdviceRule {
        trigger: Trigger::WebsiteMissing("Privacy policy"),
        sentence: "Ensure a visible Privacy page in the footer.",
    },
    AdviceRule {
        trigger: Trigger::WebsiteMissing("Company number"),
        sentence: "Display registered company info to reassure public buyers.",
    },
    AdviceRule {
        trigger: Trigger::WebsiteMissing("Accessibility statement"),
        sentence: "Publish an accessibility statement that references WCAG 2.2 AA.",
    },
];

/// Maps outstanding issues to a short list of recommended actions.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdviceGenerator;

impl AdviceGenerator {
    /// At least one and at most [`MAX_BULLETS`] sentences, in rule order.
    pub fn bullets(&self, issues: &IssueAggregator, website_missing: &[&str]) -> Vec<String> {
        let red: Vec<&str> = issues.keys_with(Severity::Red).collect();
        let amber: Vec<&str> = issues.keys_with(Severity::Amber).collect();

        let mut bullets: Vec<String> = Vec::new();
        for rule in RULES {
            if bullets.len() == MAX_BULLETS {
                break;
            }
            let fired = match rule.trigger {
                Trigger::AnyRed(keys) => keys.iter().any(|key| red.contains(key)),
                Trigger::AnyAmber(keys) => keys.iter().any(|key| amber.contains(key)),
                Trigger::AllAmber(keys) => keys.iter().all(|key| amber.contains(key)),
                Trigger::WebsiteMissing(label) => website_missing.contains(&label),
            };
            if fired && !bullets.iter().any(|bullet| bullet == rule.sentence) {
                bullets.push(rule.sentence.to_string());
            }
        }

        if bullets.is_empty() {
            let fallback = if website_missing.is_empty() {
                SOLID_BASELINE
            } else {
                FOOTER_HYGIENE
            };
            bullets.push(fallback.to_string());
        }

        bullets
    }
}
