use super::common::*;
use crate::render::Block;
use crate::workflows::questionnaire::schema::corporate_schema;
use crate::workflows::questionnaire::{
    display_value, evaluate, render_report, report::render_html_summary, section_views,
    AnswerSet, QuestionnaireKind, CORPORATE_RULES,
};

fn field(key: &str) -> &'static crate::workflows::questionnaire::FieldSpec {
    corporate_schema()
        .iter()
        .flat_map(|section| section.fields.iter())
        .find(|field| field.key == key)
        .expect("field exists")
}

#[test]
fn yes_no_answers_render_tri_state() {
    let answers = AnswerSet::new()
        .with_text("audits", "Yes")
        .with_text("penalties", "No");

    assert_eq!(display_value(field("audits"), &answers), "[X] Yes");
    assert_eq!(display_value(field("penalties"), &answers), "[ ] No");
    assert_eq!(
        display_value(field("outstanding_liabilities"), &answers),
        "[?] Not answered"
    );
}

#[test]
fn checkbox_select_and_text_values() {
    let answers = AnswerSet::new()
        .with_flag("info_accurate", true)
        .with_text("entity_type", "s-corporation")
        .with_text("accounting_method", "Modified cash");

    assert_eq!(display_value(field("info_accurate"), &answers), "[X]");
    assert_eq!(display_value(field("income_reported"), &answers), "[ ]");
    assert_eq!(display_value(field("entity_type"), &answers), "S-Corporation");
    assert_eq!(
        display_value(field("accounting_method"), &answers),
        "Modified cash"
    );
    assert_eq!(display_value(field("legal_name"), &answers), "(Empty)");
}

#[test]
fn sections_follow_schema_order_and_hide_inapplicable_follow_ups() {
    let views = section_views(QuestionnaireKind::Corporate, &AnswerSet::new());
    assert_eq!(views.len(), 15);
    assert_eq!(views[0].title, "1. Company Information");
    assert!(views[0].lines.iter().all(|line| line.key != "llc_taxed_as"));

    let llc = AnswerSet::new().with_text("entity_type", "LLC");
    let views = section_views(QuestionnaireKind::Corporate, &llc);
    assert!(views[0].lines.iter().any(|line| line.key == "llc_taxed_as"));
}

#[test]
fn report_spans_pages_and_keeps_sections_in_order() {
    let answers = contractor_answers().with_text("legal_name", "Acme Consulting LLC");
    let assessment = evaluate(&answers, CORPORATE_RULES);
    let document = render_report(QuestionnaireKind::Corporate, &answers, &assessment);

    assert!(document.page_count() > 1);
    assert_eq!(document.field("Legal name of entity"), Some("Acme Consulting LLC"));
    assert_eq!(document.field("Were W-9s collected?"), Some("[ ] No"));
    assert!(document
        .field("Risk Status")
        .expect("status field")
        .starts_with("RED"));

    let headings: Vec<&str> = document
        .blocks()
        .filter_map(|block| match block {
            Block::Heading { text } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(headings[0], "Risk Findings");
    assert_eq!(headings[1], "1. Company Information");
    assert_eq!(headings.last().copied(), Some("15. Declarations"));

    for page in &document.pages {
        assert!(page.used_height() <= document.geometry.content_height() + f32::EPSILON);
        let footer = page.footer.as_deref().expect("footer");
        assert!(footer.starts_with(&format!("Page {} of", page.number)));
    }
}

#[test]
fn section_headings_never_end_a_page() {
    let answers = contractor_answers();
    let assessment = evaluate(&answers, CORPORATE_RULES);
    let document = render_report(QuestionnaireKind::Corporate, &answers, &assessment);

    for page in &document.pages {
        let last = page.blocks().last().expect("page has content");
        assert!(!matches!(last, Block::Heading { .. }));
    }
}

#[test]
fn html_summary_lists_answered_fields_only() {
    let answers = contractor_answers().with_text("legal_name", "R&D <Partners>");
    let assessment = evaluate(&answers, CORPORATE_RULES);
    let html = render_html_summary(QuestionnaireKind::Corporate, &answers, &assessment);

    assert!(html.contains("<h1>New Corporate Questionnaire Submission</h1>"));
    assert!(html.contains("R&amp;D &lt;Partners&gt;"));
    assert!(html.contains("<b>Were W-9s collected?:</b> [ ] No"));
    assert!(!html.contains("Fiscal year-end"));
}
