//! Access tokens for the Sheets API.
//!
//! Either a pre-issued bearer token, or a service-account key exchanged for
//! short-lived tokens through the OAuth2 JWT-bearer grant.

use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::sheets::StoreError;

pub const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/spreadsheets",
    "https://www.googleapis.com/auth/drive",
];
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Tokens are refreshed this long before Google says they expire.
const REFRESH_MARGIN_SECS: i64 = 60;

/// The fields of a Google service-account JSON key this service needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read service account key {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Invalid service account key {}", path.display()))
    }
}

#[derive(Debug, Serialize, PartialEq)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: String,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(REFRESH_MARGIN_SECS) < self.expires_at
    }
}

pub enum Credentials {
    AccessToken(String),
    ServiceAccount {
        key: ServiceAccountKey,
        cache: Mutex<Option<CachedToken>>,
    },
}

impl Credentials {
    pub fn service_account(key: ServiceAccountKey) -> Self {
        Credentials::ServiceAccount {
            key,
            cache: Mutex::new(None),
        }
    }

    /// Returns a bearer token, exchanging a fresh assertion when the cached
    /// one is missing or about to expire.
    pub async fn access_token(&self, http: &Client) -> Result<String, StoreError> {
        match self {
            Credentials::AccessToken(token) => Ok(token.clone()),
            Credentials::ServiceAccount { key, cache } => {
                let mut cached = cache.lock().await;
                let now = Utc::now();
                if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(now)) {
                    return Ok(token.value.clone());
                }

                let token = exchange_assertion(http, key, now).await?;
                let value = token.value.clone();
                *cached = Some(token);
                Ok(value)
            }
        }
    }
}

async fn exchange_assertion(
    http: &Client,
    key: &ServiceAccountKey,
    now: DateTime<Utc>,
) -> Result<CachedToken, StoreError> {
    let assertion = sign_assertion(key, now)?;
    let token = request_token(http, &key.token_uri, &assertion, now).await?;
    debug!(
        "Obtained access token for {} (valid until {})",
        key.client_email, token.expires_at
    );
    Ok(token)
}

/// Trades a signed assertion for an access token at `token_uri`.
async fn request_token(
    http: &Client,
    token_uri: &str,
    assertion: &str,
    now: DateTime<Utc>,
) -> Result<CachedToken, StoreError> {
    let response = http
        .post(token_uri)
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion)])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(StoreError::Auth(format!(
            "token exchange failed with status {}: {}",
            status.as_u16(),
            body
        )));
    }

    let token: TokenResponse = serde_json::from_str(&response.text().await?)?;
    let expires_at = Duration::try_seconds(token.expires_in)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or_else(|| {
            StoreError::Auth(format!(
                "token endpoint returned an invalid expires_in: {}",
                token.expires_in
            ))
        })?;

    Ok(CachedToken {
        value: token.access_token,
        expires_at,
    })
}

fn assertion_claims(key: &ServiceAccountKey, now: DateTime<Utc>) -> AssertionClaims<'_> {
    let iat = now.timestamp();
    AssertionClaims {
        iss: &key.client_email,
        scope: SCOPES.join(" "),
        aud: &key.token_uri,
        iat,
        exp: iat + ASSERTION_LIFETIME_SECS,
    }
}

fn sign_assertion(key: &ServiceAccountKey, now: DateTime<Utc>) -> Result<String, StoreError> {
    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(|e| StoreError::Auth(format!("invalid private key: {e}")))?;
    jsonwebtoken::encode(
        &Header::new(Algorithm::RS256),
        &assertion_claims(key, now),
        &encoding_key,
    )
    .map_err(|e| StoreError::Auth(format!("failed to sign assertion: {e}")))
}
