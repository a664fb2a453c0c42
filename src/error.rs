use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No file selected, or the selection is empty/unreadable. No request is sent.
    Validation,
    /// Transport failure or a non-2xx status from the analysis service.
    Request,
    /// The service answered 2xx but the body does not match the report shape.
    Parse,
    /// The scan was abandoned because a newer submission superseded it.
    Cancelled,
}

#[derive(Debug, Serialize)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError {
            kind: ErrorKind::Validation,
            message: message.into(),
        }
    }

    pub fn request(message: impl Into<String>) -> Self {
        AppError {
            kind: ErrorKind::Request,
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        AppError {
            kind: ErrorKind::Parse,
            message: message.into(),
        }
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        AppError {
            kind: ErrorKind::Cancelled,
            message: message.into(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::request(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::parse(err.to_string())
    }
}
