use super::common::*;
use crate::scoring::compliance::PenaltySchedule;
use crate::scoring::{
    AnswerSet, ComplianceBand, ComplianceModel, IssueSource, Severity, SignalTier,
};

fn penalty() -> ComplianceModel {
    ComplianceModel::Penalty(PenaltySchedule::default())
}

#[test]
fn all_mandatory_and_nothing_else_scores_full_marks() {
    let outcome = evaluator(penalty()).evaluate(&mandatory_answers());

    assert!(outcome.issues.is_empty());
    assert_eq!(outcome.compliance_pct, 100);
    assert_eq!(outcome.band, ComplianceBand::Strong);
}

#[test]
fn missing_mandatory_signals_raise_red_issues() {
    let answers = mandatory_answers()
        .with("insurance_el", false)
        .with("dp_ukgdpr", false);

    let outcome = evaluator(penalty()).evaluate(&answers);

    let keys: Vec<_> = outcome.issues.iter().map(|issue| issue.key.as_str()).collect();
    assert_eq!(keys, vec!["insurance_el", "dp_ukgdpr"]);
    assert!(outcome
        .issues
        .iter()
        .all(|issue| issue.severity == Severity::Red && issue.source == IssueSource::Compliance));
    assert_eq!(outcome.compliance_pct, 60);
}

#[test]
fn unsent_expected_keys_are_not_penalized() {
    let answers = mandatory_answers().with("iso_9001", false);

    let outcome = evaluator(penalty()).evaluate(&answers);

    assert_eq!(outcome.issues.len(), 1);
    assert_eq!(outcome.issues[0].key, "iso_9001");
    assert_eq!(outcome.issues[0].severity, Severity::Amber);
    assert_eq!(outcome.compliance_pct, 92);
}

#[test]
fn optional_keys_never_raise_issues() {
    let answers = mandatory_answers()
        .with("sbti", false)
        .with("sv_apprenticeships", false)
        .with("ps_experience_strong", false);

    let outcome = evaluator(penalty()).evaluate(&answers);

    assert!(outcome.issues.is_empty());
    assert_eq!(outcome.compliance_pct, 100);
}

#[test]
fn cyber_essentials_plus_supersedes_basic() {
    let answers = mandatory_answers()
        .with("ce_plus", true)
        .with("ce_basic", false);
    let outcome = evaluator(penalty()).evaluate(&answers);
    assert!(outcome.issues.is_empty());

    let answers = mandatory_answers()
        .with("ce_plus", false)
        .with("ce_basic", false);
    let outcome = evaluator(penalty()).evaluate(&answers);
    let keys: Vec<_> = outcome.issues.iter().map(|issue| issue.key.as_str()).collect();
    assert_eq!(keys, vec!["ce_plus", "ce_basic"]);
}

#[test]
fn public_sector_target_escalates_modern_slavery_gap() {
    let answers = mandatory_answers().with("targets_public_sector", true);

    let outcome = evaluator(penalty()).evaluate(&answers);

    assert_eq!(outcome.issues.len(), 1);
    assert_eq!(outcome.issues[0].key, "modern_slavery");
    assert_eq!(outcome.issues[0].severity, Severity::Amber);

    let answers = answers.with("modern_slavery", true);
    assert!(evaluator(penalty()).evaluate(&answers).issues.is_empty());
}

#[test]
fn compliance_rises_as_submitted_expected_keys_become_true() {
    let expected = ["iso_9001", "iso_27001", "bcp_dr", "edi", "bpss"];
    let evaluator = evaluator(penalty());

    let mut previous = None;
    for satisfied in 0..=expected.len() {
        let answers = expected
            .iter()
            .enumerate()
            .fold(mandatory_answers(), |answers, (index, key)| {
                answers.with(*key, index < satisfied)
            });
        let pct = evaluator.evaluate(&answers).compliance_pct;
        assert!(pct <= 100);
        if let Some(previous) = previous {
            assert!(pct > previous, "{pct} should exceed {previous}");
        }
        previous = Some(pct);
    }
    assert_eq!(previous, Some(100));
}

#[test]
fn penalty_model_clamps_at_zero() {
    let outcome = evaluator(penalty()).evaluate(&AnswerSet::default());

    assert_eq!(outcome.issues.len(), MANDATORY_KEYS.len());
    assert_eq!(outcome.compliance_pct, 0);
    assert_eq!(outcome.band, ComplianceBand::Low);
}

#[test]
fn ratio_model_scores_satisfied_weight() {
    // 48 mandatory plus 6 for CE Plus, out of 143 once CE basic drops out.
    let answers = mandatory_answers().with("ce_plus", true);

    let outcome = evaluator(ComplianceModel::Ratio).evaluate(&answers);

    assert_eq!(outcome.compliance_pct, 38);
    assert_eq!(outcome.band, ComplianceBand::Low);
}

#[test]
fn ratio_model_treats_optional_weight_as_bonus() {
    let base = evaluator(ComplianceModel::Ratio)
        .evaluate(&mandatory_answers())
        .compliance_pct;
    let boosted = evaluator(ComplianceModel::Ratio)
        .evaluate(&mandatory_answers().with("ps_experience_strong", true))
        .compliance_pct;

    assert!(boosted > base);
}

#[test]
fn ratio_model_deducts_for_public_sector_modern_slavery_gap() {
    let plain = evaluator(ComplianceModel::Ratio)
        .evaluate(&mandatory_answers())
        .compliance_pct;
    let flagged = evaluator(ComplianceModel::Ratio)
        .evaluate(&mandatory_answers().with("targets_public_sector", true))
        .compliance_pct;

    assert_eq!(plain, 33);
    assert_eq!(flagged, 31);
}

#[test]
fn gate_reports_failed_disqualifiers() {
    let evaluator = evaluator(penalty());
    let answers = mandatory_answers().with("tax_clear", false);

    assert_eq!(evaluator.failed_disqualifiers(&answers), vec!["tax_clear"]);
    assert!(evaluator.is_disqualified(&answers));
    assert!(!evaluator.is_disqualified(&mandatory_answers()));
    assert_eq!(
        evaluator.failed_disqualifiers(&AnswerSet::default()),
        vec!["insolvency_clear", "tax_clear", "no_convictions"]
    );
}

#[test]
fn penalty_model_saturates_after_twelve_submitted_gaps() {
    let catalog = catalog();
    let expected: Vec<&str> = catalog
        .in_tier(SignalTier::Expected)
        .map(|signal| signal.key)
        .take(13)
        .collect();
    let evaluator = evaluator(penalty());
    let submitted = |gaps: usize| {
        expected
            .iter()
            .enumerate()
            .fold(mandatory_answers(), |answers, (index, key)| {
                answers.with(*key, index >= gaps)
            })
    };

    // 12 amber gaps at 8 points each leave 4; the thirteenth reaches the floor.
    assert_eq!(evaluator.evaluate(&submitted(12)).compliance_pct, 4);
    assert_eq!(evaluator.evaluate(&submitted(13)).compliance_pct, 0);
}
