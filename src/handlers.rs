use crate::errors::AppError;
use crate::fetcher::fetch_raw;
use crate::models::{ClientRecord, ClientStatusResponse};
use crate::normalize::normalize;
use crate::state::AppState;
use crate::ui::{render_error, render_status};
use axum::{extract::State, response::Html, Json};
use tracing::error;

/// Runs one fetch-normalize cycle and renders the status page. Any cycle
/// failure replaces the whole content area with the error panel and its
/// reload control; the page is never left half-rendered.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    match run_cycle(&state).await {
        Ok(record) => Html(render_status(&record)),
        Err(err) => {
            error!("status cycle failed: {}", err.message);
            Html(render_error(&err.message))
        }
    }
}

pub async fn client_status(
    State(state): State<AppState>,
) -> Result<Json<ClientStatusResponse>, AppError> {
    let record = run_cycle(&state).await?;
    Ok(Json(record.into()))
}

pub async fn healthz() -> &'static str {
    "ok"
}

// Each cycle owns its raw response and record; overlapping cycles never
// share state, the last one to finish wins the display.
async fn run_cycle(state: &AppState) -> Result<ClientRecord, AppError> {
    let raw = fetch_raw(&state.http, &state.config).await?;
    let record = normalize(&raw)?;
    Ok(record)
}
