/// Google Sheets v4 client, the only place the service talks to the remote sheet.
///
/// One worksheet of one spreadsheet. No retries and no client-side timeout:
/// a fault is returned to the caller on the first failure.
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::sheets::auth::Credentials;
use crate::sheets::{SheetStore, StoreError};

pub const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com";

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    error: GoogleErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    message: String,
}

pub struct GoogleSheetsClient {
    client: Client,
    api_base: Url,
    spreadsheet_id: String,
    worksheet: String,
    credentials: Credentials,
}

impl GoogleSheetsClient {
    pub fn new(
        api_base: &str,
        spreadsheet_id: String,
        worksheet: String,
        credentials: Credentials,
    ) -> Result<Self, StoreError> {
        let api_base = Url::parse(api_base)
            .map_err(|e| StoreError::Endpoint(format!("{api_base}: {e}")))?;
        Ok(Self {
            client: Client::new(),
            api_base,
            spreadsheet_id,
            worksheet,
            credentials,
        })
    }

    /// `{base}/v4/spreadsheets/{id}/values/{range}{suffix}` with every segment percent-encoded.
    fn values_url(&self, range: &str, suffix: &str) -> Result<Url, StoreError> {
        let last = format!("{range}{suffix}");
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::Endpoint(self.api_base.to_string()))?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                self.spreadsheet_id.as_str(),
                "values",
                last.as_str(),
            ]);
        Ok(url)
    }

    fn quoted_worksheet(&self) -> String {
        format!("'{}'", self.worksheet.replace('\'', "''"))
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Api {
            status: status.as_u16(),
            message: api_error_message(&body),
        })
    }
}

#[async_trait]
impl SheetStore for GoogleSheetsClient {
    async fn first_row(&self) -> Result<Option<Vec<String>>, StoreError> {
        let url = self.values_url(&format!("{}!1:1", self.quoted_worksheet()), "")?;
        let token = self.credentials.access_token(&self.client).await?;

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .query(&[("majorDimension", "ROWS")])
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let range: ValueRange = serde_json::from_str(&response.text().await?)?;
        Ok(first_row_of(range))
    }

    async fn append_row(&self, row: &[String]) -> Result<(), StoreError> {
        let url = self.values_url(&format!("{}!A1", self.quoted_worksheet()), ":append")?;
        let token = self.credentials.access_token(&self.client).await?;

        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .query(&[
                ("valueInputOption", "RAW"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&append_body(row))
            .send()
            .await?;
        Self::check_status(response).await?;

        debug!("Appended {} cells to worksheet '{}'", row.len(), self.worksheet);
        Ok(())
    }
}

fn append_body(row: &[String]) -> Value {
    json!({
        "majorDimension": "ROWS",
        "values": [row],
    })
}

/// The API omits `values` entirely for an empty range.
fn first_row_of(range: ValueRange) -> Option<Vec<String>> {
    let row = range.values.into_iter().next()?;
    let cells: Vec<String> = row
        .into_iter()
        .map(|cell| match cell {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        })
        .collect();
    if cells.is_empty() {
        None
    } else {
        Some(cells)
    }
}

/// Extracts `error.message` from a Google error envelope, falling back to the raw body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<GoogleError>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}
