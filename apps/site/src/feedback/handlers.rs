use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Html,
    Form, Json,
};
use chrono::Local;
use serde::Serialize;

use crate::errors::AppError;
use crate::feedback::pipeline::{submit_feedback, SubmissionOutcome, SubmissionPhase};
use crate::models::feedback::{FeedbackForm, FeedbackRecord};
use crate::render::{notices_for, render_page};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub status: SubmissionPhase,
    pub record: FeedbackRecord,
}

async fn run_pipeline(state: &AppState, form: &FeedbackForm) -> SubmissionOutcome {
    submit_feedback(state.store.as_ref(), form, Local::now().naive_local()).await
}

/// POST /feedback
///
/// Form-encoded submission from the page. Always answers with the full page:
/// the outcome is shown above a fresh, empty form.
pub async fn handle_submit_form(
    State(state): State<AppState>,
    Form(form): Form<FeedbackForm>,
) -> (StatusCode, Html<String>) {
    let outcome = run_pipeline(&state, &form).await;
    let status = match &outcome {
        SubmissionOutcome::Succeeded(_) => StatusCode::OK,
        SubmissionOutcome::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SubmissionOutcome::StoreFailed(_) => StatusCode::BAD_GATEWAY,
    };
    (status, Html(render_page(&state.profile, &notices_for(&outcome))))
}

/// POST /api/v1/feedback
///
/// A body axum cannot decode (bad JSON, wrong content type) is reported as a
/// validation error in the usual JSON envelope.
pub async fn handle_submit_json(
    State(state): State<AppState>,
    payload: Result<Json<FeedbackForm>, JsonRejection>,
) -> Result<(StatusCode, Json<FeedbackResponse>), AppError> {
    let Json(form) =
        payload.map_err(|rejection| AppError::Validation(vec![rejection.body_text()]))?;

    match run_pipeline(&state, &form).await {
        SubmissionOutcome::Succeeded(record) => Ok((
            StatusCode::CREATED,
            Json(FeedbackResponse {
                status: SubmissionPhase::Succeeded,
                record,
            }),
        )),
        SubmissionOutcome::Invalid(errors) => Err(AppError::Validation(errors)),
        SubmissionOutcome::StoreFailed(detail) => Err(AppError::Store(detail)),
    }
}
