use crate::config::FetchConfig;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<FetchConfig>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: FetchConfig) -> Self {
        Self {
            config: Arc::new(config),
            http: reqwest::Client::new(),
        }
    }
}
