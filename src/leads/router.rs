use super::domain::LeadSubmission;
use super::service::{LeadIntakeService, SubmissionError};
use super::sink::LeadSink;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;

/// `POST /api/leads`: 202 with a receipt, 422 with per-field errors, 502 when
/// the sink is down (the client shows a generic failure notice, no retry).
pub fn leads_router<S>(service: Arc<LeadIntakeService<S>>) -> Router
where
    S: LeadSink + 'static,
{
    Router::new()
        .route("/api/leads", post(submit_lead_handler::<S>))
        .with_state(service)
}

pub(crate) async fn submit_lead_handler<S>(
    State(service): State<Arc<LeadIntakeService<S>>>,
    Json(submission): Json<LeadSubmission>,
) -> Response
where
    S: LeadSink + 'static,
{
    match service.submit(&submission) {
        Ok(receipt) => (StatusCode::ACCEPTED, Json(receipt)).into_response(),
        Err(SubmissionError::Invalid(violations)) => {
            let payload = json!({ "errors": violations });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        Err(SubmissionError::Sink(error)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::BAD_GATEWAY, Json(payload)).into_response()
        }
    }
}
