use crate::config::FetchConfig;
use crate::errors::FetchError;
use chrono::Utc;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// Issues one GET to the proxy for the configured sheet and returns the
/// parsed body as opaque JSON for the normalizer. No retries; callers decide
/// when to run another cycle.
pub async fn fetch_raw(client: &Client, config: &FetchConfig) -> Result<Value, FetchError> {
    let query = build_query(config, Utc::now().timestamp_millis());
    debug!("fetching sheet {:?} from {}", config.sheet_name, config.endpoint_base);

    let response = client
        .get(&config.endpoint_base)
        .query(&query)
        .send()
        .await
        .map_err(FetchError::Transport)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Http(status));
    }

    let body = response.text().await.map_err(FetchError::Transport)?;
    serde_json::from_str(&body).map_err(FetchError::Parse)
}

// The trailing `_` parameter defeats intermediary caching, as the browser
// widget this replaces did.
fn build_query(config: &FetchConfig, cache_buster: i64) -> Vec<(&'static str, String)> {
    let mut query = Vec::with_capacity(3);
    if let Some(sheet_id) = &config.sheet_id {
        query.push(("sheetId", sheet_id.clone()));
    }
    query.push(("sheetName", config.sheet_name.clone()));
    query.push(("_", cache_buster.to_string()));
    query
}
