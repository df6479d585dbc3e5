#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! HTTP fetch layer for the two upstream collaborators: the UCR
//! prediction service and the FBI Crime Data Explorer.
//!
//! Every outbound call carries a bounded 30-second timeout and is issued
//! exactly once; there is no retry policy. Failures are classified into
//! the three kinds callers need to distinguish (timeout, HTTP status,
//! connection) plus a decode kind for malformed bodies.

pub mod fbi;
pub mod predict;

use std::time::Duration;

pub use fbi::CrimeDataClient;
pub use predict::{OffenseFetch, PredictionClient, fetch_offense_data};

/// Bound on every outbound request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur while fetching from an upstream API.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request exceeded [`REQUEST_TIMEOUT`].
    #[error("request timed out")]
    Timeout,

    /// The upstream returned a non-success status code.
    #[error("HTTP {status}: {body}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The response body, for error context.
        body: String,
    },

    /// The request could not be sent or the connection dropped.
    #[error("connection error: {message}")]
    Connection {
        /// Description of what went wrong.
        message: String,
    },

    /// The response body was not valid JSON.
    #[error("response decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Connection {
                message: err.to_string(),
            }
        }
    }
}

impl FetchError {
    /// Short per-row description used by the compare tool's error lines.
    #[must_use]
    pub fn brief(&self) -> String {
        match self {
            Self::Timeout => "Request timed out".to_string(),
            Self::Status { status, .. } => format!("API error: {status}"),
            Self::Connection { message } => format!("Connection error: {message}"),
            Self::Decode(err) => format!("Unexpected response: {err}"),
        }
    }
}

/// Checks the response status and decodes the body as JSON.
pub(crate) async fn read_json(resp: reqwest::Response) -> Result<serde_json::Value, FetchError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(FetchError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let body = resp.text().await?;
    Ok(serde_json::from_str(&body)?)
}
