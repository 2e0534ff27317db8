use std::env;

/// Where the client's sheet lives, resolved once at startup and passed
/// explicitly to the fetcher.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub endpoint_base: String,
    pub sheet_id: Option<String>,
    pub sheet_name: String,
}

const DEFAULT_ENDPOINT: &str = "https://bikerent-proxy.ddradle.workers.dev/";
const DEFAULT_SHEET_NAME: &str = "Client1";

impl FetchConfig {
    pub fn from_env() -> Self {
        let endpoint_base =
            env::var("STATUS_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        let sheet_id = env::var("STATUS_SHEET_ID")
            .ok()
            .filter(|value| !value.trim().is_empty());
        let sheet_name =
            env::var("STATUS_SHEET_NAME").unwrap_or_else(|_| DEFAULT_SHEET_NAME.to_string());

        Self {
            endpoint_base,
            sheet_id,
            sheet_name,
        }
    }
}
