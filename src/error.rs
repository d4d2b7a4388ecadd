use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("{}", api_message(.status, .detail))]
    Api {
        status: StatusCode,
        detail: Option<String>,
    },
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("{0}")]
    Precondition(String),
}

impl AppError {
    /// Best-effort message for the user: the backend's `detail` when the API
    /// sent one, otherwise the error's own description.
    pub fn user_detail(&self) -> String {
        match self {
            AppError::Api {
                detail: Some(detail),
                ..
            } => detail.clone(),
            other => other.to_string(),
        }
    }
}

fn api_message(status: &StatusCode, detail: &Option<String>) -> String {
    match detail {
        Some(detail) => format!("API responded with {status}: {detail}"),
        None => format!("API responded with {status}"),
    }
}

pub type AppResult<T> = Result<T, AppError>;
