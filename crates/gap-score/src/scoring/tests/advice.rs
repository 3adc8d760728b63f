use super::common::*;
use crate::scoring::advice::MAX_BULLETS;
use crate::scoring::{AdviceGenerator, AnswerSet, ComplianceModel, IssueAggregator};

fn aggregate(answers: &AnswerSet) -> IssueAggregator {
    let outcome = evaluator(ComplianceModel::default()).evaluate(answers);
    IssueAggregator::merge(outcome.issues, Vec::new())
}

#[test]
fn red_gaps_lead_the_advice() {
    let answers = mandatory_answers()
        .with("insurance_pl", false)
        .with("bcp_dr", false)
        .with("h_and_s", false);

    let bullets = AdviceGenerator.bullets(&aggregate(&answers), &["Privacy policy"]);

    assert_eq!(bullets.len(), MAX_BULLETS);
    assert!(bullets[0].contains("insurance certificates"));
    assert!(bullets[1].contains("Health & Safety"));
    assert!(bullets[2].contains("Business Continuity"));
}

#[test]
fn insurance_advice_is_not_duplicated() {
    let answers = mandatory_answers()
        .with("insurance_pl", false)
        .with("insurance_el", false);

    let bullets = AdviceGenerator.bullets(&aggregate(&answers), &[]);

    assert_eq!(bullets.len(), 1);
    assert!(bullets[0].contains("Employer's Liability"));
}

#[test]
fn security_assurance_needs_both_gaps() {
    let only_iso = mandatory_answers().with("iso_27001", false);
    let bullets = AdviceGenerator.bullets(&aggregate(&only_iso), &[]);
    assert!(!bullets.iter().any(|bullet| bullet.contains("security assurance")));

    let both = only_iso.with("ce_plus", false);
    let bullets = AdviceGenerator.bullets(&aggregate(&both), &[]);
    assert_eq!(
        bullets,
        vec!["Strengthen information security assurance (CE+ or ISO 27001).".to_string()]
    );
}

#[test]
fn website_gaps_follow_compliance_gaps() {
    let answers = mandatory_answers().with("crp_ppn", false);

    let bullets = AdviceGenerator.bullets(
        &aggregate(&answers),
        &["Case studies or reviews", "Company number"],
    );

    assert_eq!(bullets.len(), 3);
    assert!(bullets[0].contains("Carbon Reduction Plan"));
    assert!(bullets[1].contains("case studies"));
    assert!(bullets[2].contains("registered company"));
}

#[test]
fn unmatched_website_gaps_fall_back_to_footer_hygiene() {
    let bullets = AdviceGenerator.bullets(&aggregate(&mandatory_answers()), &["Cookie notice"]);

    assert_eq!(bullets, vec!["Tidy footer hygiene and clarify outcomes.".to_string()]);
}

#[test]
fn nothing_outstanding_still_yields_one_bullet() {
    let bullets = AdviceGenerator.bullets(&aggregate(&mandatory_answers()), &[]);

    assert_eq!(bullets.len(), 1);
    assert!(bullets[0].starts_with("Solid baseline"));
}

#[test]
fn bullets_are_always_between_one_and_three() {
    let cases = [
        AnswerSet::default(),
        mandatory_answers(),
        mandatory_answers()
            .with("modern_slavery", false)
            .with("iso_27001", false)
            .with("ce_plus", false)
            .with("bcp_dr", false)
            .with("crp_ppn", false),
    ];
    let website = [
        "Privacy policy",
        "Company number",
        "Accessibility statement",
        "Case studies or reviews",
    ];

    for answers in &cases {
        for missing in [&website[..], &[][..]] {
            let bullets = AdviceGenerator.bullets(&aggregate(answers), missing);
            assert!((1..=MAX_BULLETS).contains(&bullets.len()));
        }
    }
}
