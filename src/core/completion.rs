//! The completion service contract the controller relies on.
//!
//! A completion takes one prompt plus an optional prior answer and settles
//! exactly once, with either the answer text or a [`CompletionError`].

use std::error::Error as StdError;
use std::fmt;

use async_trait::async_trait;

#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn generate(&self, prompt: &str, context: Option<&str>) -> Result<String, CompletionError>;
}

#[derive(Debug)]
pub enum CompletionError {
    /// The configured API key environment variable is not set.
    MissingApiKey { env_var: String },
    /// The request never produced an HTTP response.
    Transport(reqwest::Error),
    /// The service answered with a non-success status or an error payload.
    Api { status: Option<u16>, message: String },
    /// The response body could not be read to completion.
    Stream(String),
    /// The service finished without producing any answer text.
    EmptyAnswer,
}

impl fmt::Display for CompletionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionError::MissingApiKey { env_var } => {
                write!(f, "{env_var} environment variable not set")
            }
            CompletionError::Transport(err) => write!(f, "request failed: {err}"),
            CompletionError::Api {
                status: Some(status),
                message,
            } => write!(f, "service returned {status}: {message}"),
            CompletionError::Api {
                status: None,
                message,
            } => write!(f, "service error: {message}"),
            CompletionError::Stream(message) => write!(f, "response stream failed: {message}"),
            CompletionError::EmptyAnswer => write!(f, "service returned an empty answer"),
        }
    }
}

impl StdError for CompletionError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            CompletionError::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        CompletionError::Transport(err)
    }
}
