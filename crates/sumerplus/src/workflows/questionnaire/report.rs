use super::answers::{Answer, AnswerSet};
use super::schema::{schema_for, FieldKind, FieldSpec};
use super::scoring::RiskAssessment;
use super::QuestionnaireKind;
use crate::render::{Block, Document, LayoutCursor, PageGeometry};
use serde::Serialize;

pub const EMPTY_TEXT: &str = "(Empty)";

/// How a single answer is shown in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldLine {
    pub key: &'static str,
    pub label: &'static str,
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionView {
    pub title: &'static str,
    pub lines: Vec<FieldLine>,
}

/// Formats one answer according to its field kind. Yes/no questions stay tri-state so that an
/// unanswered question is never shown as "No".
pub fn display_value(field: &FieldSpec, answers: &AnswerSet) -> String {
    let answer = answers.answer(field.key);
    match field.kind {
        FieldKind::YesNo => match answer.as_yes_no() {
            Some(true) => "[X] Yes".to_string(),
            Some(false) => "[ ] No".to_string(),
            None if answer.is_blank() => "[?] Not answered".to_string(),
            None => raw_text(answer),
        },
        FieldKind::Checkbox => match answer.as_yes_no() {
            Some(true) => "[X]".to_string(),
            _ => "[ ]".to_string(),
        },
        FieldKind::Select(options) => {
            if answer.is_blank() {
                return EMPTY_TEXT.to_string();
            }
            let raw = raw_text(answer);
            options
                .iter()
                .find(|option| option.value.eq_ignore_ascii_case(raw.trim()))
                .map(|option| option.label.to_string())
                .unwrap_or(raw)
        }
        FieldKind::Text => {
            if answer.is_blank() {
                EMPTY_TEXT.to_string()
            } else {
                raw_text(answer)
            }
        }
    }
}

fn raw_text(answer: Answer<'_>) -> String {
    match answer {
        Answer::Text(text) => text.trim().to_string(),
        Answer::Flag(true) => "Yes".to_string(),
        Answer::Flag(false) => "No".to_string(),
        Answer::Unanswered => String::new(),
    }
}

/// Sections of the questionnaire in schema order, skipping follow-ups that do not apply.
pub fn section_views(kind: QuestionnaireKind, answers: &AnswerSet) -> Vec<SectionView> {
    schema_for(kind)
        .iter()
        .map(|section| SectionView {
            title: section.title,
            lines: section
                .fields
                .iter()
                .filter(|field| field.is_visible(answers))
                .map(|field| FieldLine {
                    key: field.key,
                    label: field.label,
                    display: display_value(field, answers),
                })
                .collect(),
        })
        .collect()
}

/// Lays out the full questionnaire report. Each section heading is kept on the same page as its
/// first answer.
pub fn render_report(
    kind: QuestionnaireKind,
    answers: &AnswerSet,
    assessment: &RiskAssessment,
) -> Document {
    let mut cursor = LayoutCursor::new(PageGeometry::LETTER);
    cursor.place(Block::banner(kind.title()));
    cursor.place(Block::field(
        "Risk Status",
        format!(
            "{} - {}",
            assessment.tier.label().to_ascii_uppercase(),
            assessment.tier.headline()
        ),
    ));

    if !assessment.findings.is_empty() {
        cursor.place(Block::spacer(2.0));
        cursor.place(Block::heading("Risk Findings"));
        for finding in &assessment.findings {
            cursor.place(Block::paragraph(&format!(
                "[{}] {}",
                finding.severity.label().to_ascii_uppercase(),
                finding.message
            )));
        }
    }

    for section in section_views(kind, answers) {
        cursor.place(Block::spacer(3.0));
        let mut lines = section.lines.into_iter();
        let mut group = vec![Block::heading(section.title)];
        if let Some(first) = lines.next() {
            group.push(Block::field(first.label, first.display));
        }
        cursor.place_group(group);
        for line in lines {
            cursor.place(Block::field(line.label, line.display));
        }
    }

    let mut document = cursor.finish(kind.title());
    let label = kind.label();
    document.number_pages(|_| Some(format!("{label} questionnaire")));
    document
}

/// HTML body for the notification email.
pub fn render_html_summary(
    kind: QuestionnaireKind,
    answers: &AnswerSet,
    assessment: &RiskAssessment,
) -> String {
    let mut html = String::new();
    html.push_str(&format!("<h1>New {} Questionnaire Submission</h1>\n", kind.label()));
    html.push_str("<p>A new form has been submitted.</p>\n");
    html.push_str(&format!(
        "<p><b>Risk status:</b> {} ({})</p>\n",
        assessment.tier.label(),
        escape_html(assessment.tier.headline())
    ));
    if !assessment.findings.is_empty() {
        html.push_str("<ul>\n");
        for finding in &assessment.findings {
            html.push_str(&format!(
                "<li>[{}] {}</li>\n",
                finding.severity.label(),
                escape_html(&finding.message)
            ));
        }
        html.push_str("</ul>\n");
    }

    html.push_str("<div style=\"background-color: #f9f9f9; padding: 20px; border-radius: 5px;\">\n");
    for section in section_views(kind, answers) {
        let answered: Vec<_> = section
            .lines
            .iter()
            .filter(|line| answers.answer(line.key) != Answer::Unanswered)
            .collect();
        if answered.is_empty() {
            continue;
        }
        html.push_str(&format!("<h3>{}</h3>\n", escape_html(section.title)));
        for line in answered {
            html.push_str(&format!(
                "<b>{}:</b> {}<br>\n",
                escape_html(line.label),
                escape_html(&line.display)
            ));
        }
    }
    html.push_str("</div>\n");
    html
}

/// Plain-text digest used by the CLI and logs.
pub fn render_text_summary(kind: QuestionnaireKind, assessment: &RiskAssessment) -> String {
    let mut text = format!(
        "{} questionnaire: {} ({})",
        kind.label(),
        assessment.tier.label(),
        assessment.tier.headline()
    );
    for finding in &assessment.findings {
        text.push_str(&format!(
            "\n  - [{}] {}",
            finding.severity.label(),
            finding.message
        ));
    }
    text
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}
