use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::questionnaire::{
    AnswerSet, Notification, Notifier, NotifyError, QuestionnaireKind, QuestionnaireService,
    QuestionnaireSubmission,
};

pub(super) fn contractor_answers() -> AnswerSet {
    AnswerSet::new()
        .with_text("use_contractors", "Yes")
        .with_text("w9_collected", "No")
        .with_text("filed_1099", "No")
}

pub(super) fn corporate_submission(data: AnswerSet) -> QuestionnaireSubmission {
    QuestionnaireSubmission {
        kind: QuestionnaireKind::Corporate,
        data,
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
}

impl MemoryNotifier {
    pub(super) fn sent(&self) -> Vec<Notification> {
        self.sent.lock().expect("notifier mutex poisoned").clone()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: Notification) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .expect("notifier mutex poisoned")
            .push(notification);
        Ok(())
    }
}

pub(super) struct OfflineNotifier;

impl Notifier for OfflineNotifier {
    fn notify(&self, _notification: Notification) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("smtp offline".to_string()))
    }
}

pub(super) fn build_service() -> (QuestionnaireService<MemoryNotifier>, Arc<MemoryNotifier>) {
    let notifier = Arc::new(MemoryNotifier::default());
    (QuestionnaireService::new(notifier.clone()), notifier)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
