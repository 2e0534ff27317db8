pub mod app;
pub mod config;
pub mod dates;
pub mod errors;
pub mod fetcher;
pub mod handlers;
pub mod models;
pub mod normalize;
pub mod state;
pub mod ui;

pub use app::router;
pub use config::FetchConfig;
pub use state::AppState;
