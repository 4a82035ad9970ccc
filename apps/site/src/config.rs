use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::sheets::google::DEFAULT_API_BASE;
use crate::sheets::headers::DEFAULT_HEADERS;

/// How the service authenticates against the Sheets API.
#[derive(Clone)]
pub enum SheetCredentials {
    AccessToken(String),
    ServiceAccountFile(PathBuf),
}

impl std::fmt::Debug for SheetCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetCredentials::AccessToken(_) => f.write_str("AccessToken(<redacted>)"),
            SheetCredentials::ServiceAccountFile(path) => {
                f.debug_tuple("ServiceAccountFile").field(path).finish()
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub worksheet: String,
    pub api_base: String,
    pub credentials: SheetCredentials,
}

#[derive(Debug, Clone)]
pub enum StoreConfig {
    Sheets(SheetsConfig),
    Memory,
}

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreConfig,
    pub expected_headers: Vec<String>,
    pub profile_path: Option<PathBuf>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| {
            get(key).with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        let store = match get("FEEDBACK_STORE").as_deref().unwrap_or("sheets") {
            "sheets" => {
                let credentials = if let Some(token) = get("GOOGLE_ACCESS_TOKEN") {
                    SheetCredentials::AccessToken(token)
                } else if let Some(path) = get("GOOGLE_APPLICATION_CREDENTIALS") {
                    SheetCredentials::ServiceAccountFile(PathBuf::from(path))
                } else {
                    bail!(
                        "Either GOOGLE_ACCESS_TOKEN or GOOGLE_APPLICATION_CREDENTIALS must be set"
                    );
                };
                StoreConfig::Sheets(SheetsConfig {
                    spreadsheet_id: require("SPREADSHEET_ID")?,
                    worksheet: get("WORKSHEET_NAME").unwrap_or_else(|| "Sheet1".to_string()),
                    api_base: get("SHEETS_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
                    credentials,
                })
            }
            "memory" => StoreConfig::Memory,
            other => bail!("FEEDBACK_STORE must be 'sheets' or 'memory', got '{other}'"),
        };

        let expected_headers = match get("FEEDBACK_HEADERS") {
            Some(raw) => parse_headers(&raw)?,
            None => DEFAULT_HEADERS.iter().map(|h| h.to_string()).collect(),
        };

        Ok(Config {
            store,
            expected_headers,
            profile_path: get("PROFILE_PATH").map(PathBuf::from),
            port: get("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

/// Comma-separated header names, one per record column; surrounding
/// whitespace is dropped.
fn parse_headers(raw: &str) -> Result<Vec<String>> {
    let headers: Vec<String> = raw
        .split(',')
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .collect();
    if headers.len() != DEFAULT_HEADERS.len() {
        bail!(
            "FEEDBACK_HEADERS must name exactly {} columns (timestamp, name, email, message), got {}",
            DEFAULT_HEADERS.len(),
            headers.len()
        );
    }
    Ok(headers)
}
