use std::path::PathBuf;

use thiserror::Error;

/// Errors turning a raw request into a template.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing or unreadable request line")]
    MissingRequestLine,

    #[error("malformed request line: {0:?}")]
    MalformedRequestLine(String),

    #[error("missing Host header for a relative request path")]
    MissingHostHeader,

    /// Header line (1-based, counting the request line) is not valid UTF-8.
    #[error("unreadable header on line {0}")]
    HeaderReadFailure(usize),
}

/// Errors loading the template set. All of them abort startup.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no {prefix}*.{extension} files found in {}", .dir.display())]
    NoTemplatesFound {
        dir: PathBuf,
        prefix: String,
        extension: String,
    },

    #[error("failed to read template {}", .path.display())]
    FileReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse template {}", .path.display())]
    ParseFailure {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

/// Errors from a single send. Logged by the sender and never propagated.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("failed to build request: {0}")]
    BuildFailed(String),

    #[error("request failed: {0}")]
    TransportFailed(#[source] reqwest::Error),

    #[error("failed to read response: {0}")]
    ResponseReadFailed(#[source] reqwest::Error),
}

impl From<reqwest::header::InvalidHeaderName> for SendError {
    fn from(err: reqwest::header::InvalidHeaderName) -> Self {
        SendError::BuildFailed(err.to_string())
    }
}

impl From<reqwest::header::InvalidHeaderValue> for SendError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        SendError::BuildFailed(err.to_string())
    }
}

impl From<reqwest::Error> for SendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            SendError::BuildFailed(err.to_string())
        } else {
            SendError::TransportFailed(err)
        }
    }
}
