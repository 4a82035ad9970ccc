use std::sync::Arc;

use crate::models::profile::Profile;
use crate::sheets::SheetStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Backing sheet. Google Sheets in production, in-memory for local runs.
    pub store: Arc<dyn SheetStore>,
    pub profile: Arc<Profile>,
}
