use axum::http::StatusCode;
use std::fmt;

/// A fetch cycle failed before the normalizer could run.
#[derive(Debug)]
pub enum FetchError {
    /// The proxy answered with a non-2xx status.
    Http(StatusCode),
    /// The request never completed.
    Transport(reqwest::Error),
    /// The body was not valid JSON.
    Parse(serde_json::Error),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(status) => write!(f, "proxy returned HTTP {status}"),
            Self::Transport(err) => write!(f, "request failed: {err}"),
            Self::Parse(err) => write!(f, "response body is not valid JSON: {err}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// The raw response could not be turned into a `ClientRecord`.
#[derive(Debug, PartialEq, Eq)]
pub enum NormalizeError {
    /// None of the known response shapes matched.
    UnknownShape,
    /// The sheet holds fewer than two rows, so there is no attribute row.
    InsufficientData,
}

impl fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownShape => write!(f, "unrecognized response shape"),
            Self::InsufficientData => write!(f, "sheet holds fewer than two rows"),
        }
    }
}

impl std::error::Error for NormalizeError {}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_gateway(err: impl fmt::Display) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: err.to_string(),
        }
    }
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        Self::bad_gateway(err)
    }
}

impl From<NormalizeError> for AppError {
    fn from(err: NormalizeError) -> Self {
        Self::bad_gateway(err)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
