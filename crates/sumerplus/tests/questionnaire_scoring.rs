use serde_json::json;
use sumerplus::workflows::questionnaire::{
    evaluate, render_report, rules_for, AnswerSet, QuestionnaireKind, Severity, StatusTier,
};

fn answers(value: serde_json::Value) -> AnswerSet {
    serde_json::from_value(value).expect("answers decode")
}

#[test]
fn corporate_submission_with_contractor_gaps_is_red() {
    let submitted = answers(json!({
        "entity_type": "S-Corporation",
        "officer_comp": "",
        "use_contractors": "Yes",
        "w9_collected": "No",
        "1099_filed": "No",
        "foreign_revenue": null,
    }));

    let assessment = evaluate(&submitted, rules_for(QuestionnaireKind::Corporate));
    let ids: Vec<&str> = assessment
        .findings
        .iter()
        .map(|finding| finding.rule_id.as_str())
        .collect();
    assert_eq!(
        ids,
        vec![
            "contractor_w9_missing",
            "contractor_1099_late",
            "s_corp_reasonable_compensation",
        ]
    );
    assert_eq!(assessment.tier, StatusTier::Red);
    assert_eq!(assessment.high_count(), 2);
}

#[test]
fn medium_findings_alone_are_yellow_and_clean_answers_are_green() {
    let submitted = answers(json!({ "foreign_contractors": true }));
    let assessment = evaluate(&submitted, rules_for(QuestionnaireKind::Corporate));
    assert_eq!(assessment.tier, StatusTier::Yellow);
    assert!(assessment
        .findings
        .iter()
        .all(|finding| finding.severity == Severity::Medium));

    let assessment = evaluate(&AnswerSet::new(), rules_for(QuestionnaireKind::Personal));
    assert_eq!(assessment.tier, StatusTier::Green);
    assert!(assessment.findings.is_empty());
}

#[test]
fn report_states_the_risk_status_and_writes_a_pdf() {
    let submitted = answers(json!({ "audits": "Yes" }));
    let assessment = evaluate(&submitted, rules_for(QuestionnaireKind::Corporate));

    let document = render_report(QuestionnaireKind::Corporate, &submitted, &assessment);
    assert_eq!(
        document.field("Risk Status"),
        Some("RED - Immediate attention required")
    );
    assert!(document.page_count() >= 1);
    let bytes = document.to_pdf().expect("pdf renders");
    assert!(bytes.starts_with(b"%PDF"));
}
