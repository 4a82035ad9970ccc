//! Submission pipeline: Idle → Validating → Appending → {Succeeded | Failed}.
//!
//! Independent of HTTP so it can be driven directly. Every call starts from
//! `Idle`; nothing carries over between submissions.

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::feedback::validation::validate_submission;
use crate::models::feedback::{FeedbackForm, FeedbackRecord};
use crate::sheets::SheetStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionPhase {
    Idle,
    Validating,
    Appending,
    Succeeded,
    Failed,
}

/// Terminal result of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The record was appended to the sheet.
    Succeeded(FeedbackRecord),
    /// One or more fields failed validation; nothing was written.
    Invalid(Vec<String>),
    /// The store rejected the append. Carries the fault detail.
    StoreFailed(String),
}

impl SubmissionOutcome {
    pub fn phase(&self) -> SubmissionPhase {
        match self {
            SubmissionOutcome::Succeeded(_) => SubmissionPhase::Succeeded,
            SubmissionOutcome::Invalid(_) | SubmissionOutcome::StoreFailed(_) => {
                SubmissionPhase::Failed
            }
        }
    }
}

fn transition(from: SubmissionPhase, to: SubmissionPhase) {
    debug!(?from, ?to, "submission phase");
}

/// Validates `form` and, if every field passes, appends it to `store` as a
/// record stamped with `submitted_at`.
///
/// Store faults are logged and returned as `StoreFailed`, never propagated.
pub async fn submit_feedback(
    store: &dyn SheetStore,
    form: &FeedbackForm,
    submitted_at: NaiveDateTime,
) -> SubmissionOutcome {
    transition(SubmissionPhase::Idle, SubmissionPhase::Validating);

    let validation = validate_submission(
        form.name.as_deref(),
        form.email.as_deref(),
        form.message.as_deref(),
    );
    if !validation.passed {
        warn!(
            "Rejected feedback submission: {} validation error(s)",
            validation.errors.len()
        );
        transition(SubmissionPhase::Validating, SubmissionPhase::Failed);
        return SubmissionOutcome::Invalid(validation.errors);
    }

    transition(SubmissionPhase::Validating, SubmissionPhase::Appending);
    let record = FeedbackRecord::normalized(form, submitted_at);

    match store.append_row(&record.to_row()).await {
        Ok(()) => {
            info!("Feedback recorded at {}", record.timestamp);
            transition(SubmissionPhase::Appending, SubmissionPhase::Succeeded);
            SubmissionOutcome::Succeeded(record)
        }
        Err(e) => {
            error!("Failed to append feedback row: {e}");
            transition(SubmissionPhase::Appending, SubmissionPhase::Failed);
            SubmissionOutcome::StoreFailed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::validation::{INVALID_EMAIL, INVALID_MESSAGE, INVALID_NAME};
    use crate::sheets::MemorySheet;
    use chrono::NaiveDate;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap()
    }

    fn form(name: &str, email: &str, message: &str) -> FeedbackForm {
        FeedbackForm {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            message: Some(message.to_string()),
        }
    }

    #[tokio::test]
    async fn test_valid_submission_appends_one_row() {
        let sheet = MemorySheet::new();
        let outcome = submit_feedback(
            &sheet,
            &form("Jo Doe", "jo@example.com", "Hello there, loved your work!"),
            at(),
        )
        .await;

        assert_eq!(outcome.phase(), SubmissionPhase::Succeeded);
        assert_eq!(
            sheet.rows(),
            vec![vec![
                "2024-06-01 14:30:00",
                "Jo Doe",
                "jo@example.com",
                "Hello there, loved your work!"
            ]]
        );
    }

    #[tokio::test]
    async fn test_email_is_lowercased_before_append() {
        let sheet = MemorySheet::new();
        let outcome = submit_feedback(
            &sheet,
            &form(" Jo Doe ", "Jo@Example.com", "  Hello there, loved your work!  "),
            at(),
        )
        .await;

        let SubmissionOutcome::Succeeded(record) = outcome else {
            panic!("expected success, got {outcome:?}");
        };
        assert_eq!(record.name, "Jo Doe");
        assert_eq!(record.email, "jo@example.com");
        assert_eq!(record.message, "Hello there, loved your work!");
        assert_eq!(sheet.rows()[0], record.to_row());
    }

    #[tokio::test]
    async fn test_email_trailing_newline_is_stripped_on_append() {
        let sheet = MemorySheet::new();
        let outcome = submit_feedback(
            &sheet,
            &form("Jo Doe", "jo@example.com\n", "Hello there, loved your work!"),
            at(),
        )
        .await;

        assert_eq!(outcome.phase(), SubmissionPhase::Succeeded);
        assert_eq!(sheet.rows()[0][2], "jo@example.com");
    }

    #[tokio::test]
    async fn test_invalid_submission_appends_nothing() {
        let sheet = MemorySheet::new();
        let outcome = submit_feedback(&sheet, &form("J", "bad", "hi"), at()).await;

        assert_eq!(
            outcome,
            SubmissionOutcome::Invalid(vec![
                INVALID_NAME.to_string(),
                INVALID_EMAIL.to_string(),
                INVALID_MESSAGE.to_string()
            ])
        );
        assert_eq!(outcome.phase(), SubmissionPhase::Failed);
        assert!(sheet.rows().is_empty());
    }

    #[tokio::test]
    async fn test_missing_fields_are_invalid() {
        let sheet = MemorySheet::new();
        let outcome = submit_feedback(&sheet, &FeedbackForm::default(), at()).await;

        let SubmissionOutcome::Invalid(errors) = outcome else {
            panic!("expected validation failure");
        };
        assert_eq!(errors.len(), 3);
        assert!(sheet.rows().is_empty());
    }

    #[tokio::test]
    async fn test_store_fault_becomes_outcome() {
        let sheet = MemorySheet::failing("The caller does not have permission");
        let outcome = submit_feedback(
            &sheet,
            &form("Jo Doe", "jo@example.com", "Hello there, loved your work!"),
            at(),
        )
        .await;

        let SubmissionOutcome::StoreFailed(detail) = &outcome else {
            panic!("expected store failure, got {outcome:?}");
        };
        assert!(detail.contains("The caller does not have permission"));
        assert_eq!(outcome.phase(), SubmissionPhase::Failed);
    }
}
