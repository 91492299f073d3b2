use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::report::{render_html_summary, render_report};
use super::rules::rules_for;
use super::scoring::{evaluate, Finding, StatusTier};
use super::{QuestionnaireKind, QuestionnaireSubmission};
use crate::render::RenderError;

/// Outbound delivery hook (e-mail or other transport) for completed questionnaires.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification) -> Result<(), NotifyError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub html_body: String,
    pub attachment_name: String,
    pub attachment: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Returned to the submitter once the questionnaire has been scored and delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub kind: QuestionnaireKind,
    pub tier: StatusTier,
    pub findings: Vec<Finding>,
    pub answered_fields: usize,
    pub message: String,
}

pub struct QuestionnaireService<N> {
    notifier: Arc<N>,
}

impl<N> QuestionnaireService<N>
where
    N: Notifier + 'static,
{
    pub fn new(notifier: Arc<N>) -> Self {
        Self { notifier }
    }

    /// Scores the answers, renders the report, and hands both to the notifier.
    pub fn submit(
        &self,
        submission: QuestionnaireSubmission,
    ) -> Result<SubmissionReceipt, QuestionnaireServiceError> {
        let QuestionnaireSubmission { kind, data } = submission;
        let assessment = evaluate(&data, rules_for(kind));

        let document = render_report(kind, &data, &assessment);
        let attachment = document.to_pdf()?;

        let notification = Notification {
            subject: kind.email_subject(),
            html_body: render_html_summary(kind, &data, &assessment),
            attachment_name: format!("{}_questionnaire.pdf", kind.label().to_ascii_lowercase()),
            attachment,
        };

        if let Err(error) = self.notifier.notify(notification) {
            warn!(kind = kind.label(), %error, "questionnaire notification failed");
            return Err(error.into());
        }

        info!(
            kind = kind.label(),
            tier = assessment.tier.label(),
            findings = assessment.findings.len(),
            pages = document.page_count(),
            "questionnaire submitted"
        );

        Ok(SubmissionReceipt {
            kind,
            tier: assessment.tier,
            findings: assessment.findings,
            answered_fields: data.len(),
            message: "Email sent successfully".to_string(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum QuestionnaireServiceError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}
