use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Format of the server-generated timestamp column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Raw contact-form input. Any field may be missing from the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedbackForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

/// One validated, normalized submission. Persisted as one sheet row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackRecord {
    pub timestamp: String,
    pub name: String,
    pub email: String,
    pub message: String,
}

impl FeedbackRecord {
    /// Builds the record from a form that already passed validation.
    /// Name and message are trimmed; email is trimmed and lower-cased.
    pub fn normalized(form: &FeedbackForm, submitted_at: NaiveDateTime) -> Self {
        Self {
            timestamp: submitted_at.format(TIMESTAMP_FORMAT).to_string(),
            name: form.name.as_deref().unwrap_or_default().trim().to_string(),
            email: form
                .email
                .as_deref()
                .unwrap_or_default()
                .trim()
                .to_lowercase(),
            message: form.message.as_deref().unwrap_or_default().trim().to_string(),
        }
    }

    /// Column order matches the header row: Timestamp, Name, Email, Message.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.timestamp.clone(),
            self.name.clone(),
            self.email.clone(),
            self.message.clone(),
        ]
    }
}
