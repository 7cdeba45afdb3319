use axum::http::StatusCode;
use std::fmt;

/// A required data source failed to fetch or parse. Fatal to the owning
/// view's initialization; rendered as an inline error panel, never a partial
/// dashboard.
#[derive(Debug)]
pub struct LoadError {
    pub source_name: String,
    pub message: String,
}

impl LoadError {
    pub fn new(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    pub fn fetch(source_name: impl Into<String>, err: &reqwest::Error) -> Self {
        Self::new(source_name, err.to_string())
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to load {}: {}", self.source_name, self.message)
    }
}

impl std::error::Error for LoadError {}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<LoadError> for AppError {
    fn from(err: LoadError) -> Self {
        Self::internal(err)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
