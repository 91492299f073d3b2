use super::common::*;
use crate::workflows::questionnaire::{
    evaluate, AnswerSet, Severity, StatusTier, CORPORATE_RULES, PERSONAL_RULES,
};

#[test]
fn contractor_gaps_produce_red_status_in_table_order() {
    let assessment = evaluate(&contractor_answers(), CORPORATE_RULES);

    assert_eq!(assessment.tier, StatusTier::Red);
    assert_eq!(assessment.findings.len(), 2);
    assert_eq!(assessment.findings[0].severity, Severity::Medium);
    assert_eq!(assessment.findings[0].message, "Missing W-9s for contractors.");
    assert_eq!(assessment.findings[1].severity, Severity::High);
    assert!(assessment.findings[1].message.contains("1099-NEC"));
}

#[test]
fn empty_answers_are_green() {
    let assessment = evaluate(&AnswerSet::new(), CORPORATE_RULES);
    assert_eq!(assessment.tier, StatusTier::Green);
    assert!(assessment.findings.is_empty());

    let personal = evaluate(&AnswerSet::new(), PERSONAL_RULES);
    assert_eq!(personal.tier, StatusTier::Green);
}

#[test]
fn medium_only_findings_are_yellow() {
    let answers = AnswerSet::new().with_text("foreign_revenue", "Yes");
    let assessment = evaluate(&answers, CORPORATE_RULES);

    assert_eq!(assessment.tier, StatusTier::Yellow);
    assert_eq!(assessment.findings.len(), 1);
    assert_eq!(assessment.high_count(), 0);
}

#[test]
fn unanswered_contractor_questions_do_not_fire() {
    let answers = AnswerSet::new().with_text("use_contractors", "Yes");
    let assessment = evaluate(&answers, CORPORATE_RULES);
    assert_eq!(assessment.tier, StatusTier::Green);
}

#[test]
fn evaluation_is_idempotent() {
    let answers = contractor_answers()
        .with_text("entity_type", "S-Corporation")
        .with_text("audits", "yes");
    let first = evaluate(&answers, CORPORATE_RULES);
    let second = evaluate(&answers, CORPORATE_RULES);
    assert_eq!(first, second);
    assert_eq!(first.high_count(), 3);
}

#[test]
fn personal_rules_read_lowercase_radio_values() {
    let answers = AnswerSet::new()
        .with_text("for_fbar", "yes")
        .with_text("for_crypto", "no")
        .with_text("health_marketplace", "yes")
        .with_text("health_covered", "no");
    let assessment = evaluate(&answers, PERSONAL_RULES);

    let ids: Vec<_> = assessment
        .findings
        .iter()
        .map(|finding| finding.rule_id.as_str())
        .collect();
    assert_eq!(ids, vec!["foreign_accounts", "marketplace_reconciliation"]);
    assert_eq!(assessment.tier, StatusTier::Yellow);
}
