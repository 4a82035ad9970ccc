use axum::{extract::State, response::Html};

use crate::render::render_page;
use crate::state::AppState;

/// GET /
pub async fn handle_index(State(state): State<AppState>) -> Html<String> {
    Html(render_page(&state.profile, &[]))
}
