use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::service::{Notifier, QuestionnaireService, QuestionnaireServiceError};
use super::QuestionnaireSubmission;

/// Router exposing questionnaire intake.
pub fn questionnaire_router<N>(service: Arc<QuestionnaireService<N>>) -> Router
where
    N: Notifier + 'static,
{
    Router::new()
        .route("/api/v1/questionnaires", post(submit_handler::<N>))
        .with_state(service)
}

pub(crate) async fn submit_handler<N>(
    State(service): State<Arc<QuestionnaireService<N>>>,
    axum::Json(submission): axum::Json<QuestionnaireSubmission>,
) -> Response
where
    N: Notifier + 'static,
{
    match service.submit(submission) {
        Ok(receipt) => (StatusCode::OK, axum::Json(receipt)).into_response(),
        Err(QuestionnaireServiceError::Notify(error)) => {
            let payload = json!({
                "message": "Failed to send email",
                "error": error.to_string(),
            });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "message": "Failed to render questionnaire",
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
