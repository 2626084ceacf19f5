use std::convert::Infallible;
use std::io;

use http::StatusCode;
use thiserror::Error;

use crate::response::{ApiResponse, DecodedBody};

/// Error types for Gremlin API transport operations
#[derive(Debug, Error)]
pub enum ClientError {
    /// No usable credential could be turned into an `Authorization` header.
    #[error("bad header: {0}")]
    BadHeader(String),

    /// The selected transport cannot perform calls in this environment.
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// The API answered with a status code >= 400.
    #[error("HTTP error: status={}", .response.status())]
    Http {
        response: Box<ApiResponse>,
        body: DecodedBody,
    },

    #[error("unknown HTTP method: {0}")]
    UnknownMethod(String),

    #[error("a JSON body requires a headers map in the request options")]
    MissingHeaders,

    #[error("invalid URI: {0}")]
    InvalidUri(String),

    #[error("blocking call made from inside an async runtime, use `api_call` instead")]
    BlockingInAsyncContext,

    #[error("timeout: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("connection error: {0}")]
    Connection(#[source] reqwest::Error),

    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ClientError {
    /// Status code of an [`ClientError::Http`] error.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { response, .. } => Some(response.status()),
            _ => None,
        }
    }

    /// Decoded body of an [`ClientError::Http`] error.
    #[must_use]
    pub fn body(&self) -> Option<&DecodedBody> {
        match self {
            Self::Http { body, .. } => Some(body),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err)
        } else if err.is_connect() {
            Self::Connection(err)
        } else {
            Self::Transport(err)
        }
    }
}

impl From<Infallible> for ClientError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

impl From<figment::Error> for ClientError {
    fn from(err: figment::Error) -> Self {
        Self::Config(err.to_string())
    }
}
