mod config;
mod errors;
mod feedback;
mod models;
mod render;
mod routes;
mod sheets;
mod state;

use anyhow::{bail, Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, SheetCredentials, StoreConfig};
use crate::models::profile::Profile;
use crate::routes::build_router;
use crate::sheets::auth::{Credentials, ServiceAccountKey};
use crate::sheets::{ensure_headers, GoogleSheetsClient, HeaderCheck, MemorySheet, SheetStore};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume site v{}", env!("CARGO_PKG_VERSION"));

    let profile = Profile::load(config.profile_path.as_deref())?;
    info!("Profile ready: {}", profile.name);

    let store = build_store(&config.store)?;

    // Header mismatch is fatal: refuse to serve the form rather than guess the layout.
    match ensure_headers(store.as_ref(), &config.expected_headers)
        .await
        .context("Failed to check sheet headers")?
    {
        HeaderCheck::Created => info!("Header row created"),
        HeaderCheck::Matched => info!("Header row verified"),
        HeaderCheck::Mismatch { difference } => {
            error!("Sheet headers don't match expected format: {:?}", difference);
            bail!("Sheet headers don't match expected format (difference: {difference:?})");
        }
    }

    let state = AppState {
        store,
        profile: Arc::new(profile),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs the backing sheet selected by `FEEDBACK_STORE`.
fn build_store(store: &StoreConfig) -> Result<Arc<dyn SheetStore>> {
    match store {
        StoreConfig::Memory => {
            info!("Using in-memory feedback store; rows are lost on restart");
            Ok(Arc::new(MemorySheet::new()))
        }
        StoreConfig::Sheets(sheets) => {
            let credentials = match &sheets.credentials {
                SheetCredentials::AccessToken(token) => Credentials::AccessToken(token.clone()),
                SheetCredentials::ServiceAccountFile(path) => {
                    let key = ServiceAccountKey::from_file(path)?;
                    info!("Using service account {}", key.client_email);
                    Credentials::service_account(key)
                }
            };
            let client = GoogleSheetsClient::new(
                &sheets.api_base,
                sheets.spreadsheet_id.clone(),
                sheets.worksheet.clone(),
                credentials,
            )?;
            info!(
                "Google Sheets client initialized (spreadsheet: {}, worksheet: {})",
                sheets.spreadsheet_id, sheets.worksheet
            );
            Ok(Arc::new(client))
        }
    }
}
