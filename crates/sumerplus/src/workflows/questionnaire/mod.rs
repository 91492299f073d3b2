//! Tax questionnaire intake: answer normalization, rule-table risk scoring, report rendering,
//! and delivery to the firm's inbox.

pub mod answers;
pub mod report;
pub mod router;
pub mod rules;
pub mod schema;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

pub use answers::{Answer, AnswerSet, AnswerValue};
pub use report::{display_value, render_report, section_views};
pub use router::questionnaire_router;
pub use rules::{rules_for, Rule, CORPORATE_RULES, PERSONAL_RULES};
pub use schema::{schema_for, FieldKind, FieldSpec, Section, SelectOption};
pub use scoring::{evaluate, Finding, RiskAssessment, Severity, StatusTier};
pub use service::{
    Notification, Notifier, NotifyError, QuestionnaireService, QuestionnaireServiceError,
    SubmissionReceipt,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionnaireKind {
    Corporate,
    Personal,
}

impl QuestionnaireKind {
    pub const fn label(self) -> &'static str {
        match self {
            QuestionnaireKind::Corporate => "Corporate",
            QuestionnaireKind::Personal => "Personal",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            QuestionnaireKind::Corporate => "Corporate Tax Questionnaire",
            QuestionnaireKind::Personal => "Personal Tax Questionnaire",
        }
    }

    pub fn email_subject(self) -> String {
        format!("New {} Questionnaire Submission", self.label())
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "corporate" | "corp" => Some(Self::Corporate),
            "personal" | "individual" => Some(Self::Personal),
            _ => None,
        }
    }
}

/// Payload posted by the questionnaire forms: `{ "type": "Corporate", "data": { ... } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionnaireSubmission {
    #[serde(rename = "type")]
    pub kind: QuestionnaireKind,
    pub data: AnswerSet,
}
