#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! UCR forecast tool endpoints.
//!
//! Each public async function in the tool modules corresponds to one
//! callable tool: it validates and normalizes user-supplied parameters,
//! issues the upstream HTTP calls, computes derived metrics, and formats
//! the result as prose (`summary`) or structured JSON (`detailed`).
//! [`registry::execute_tool`] dispatches a tool invocation by name from
//! raw JSON parameters.

pub mod compare;
pub mod forecast;
pub mod format;
pub mod history;
pub mod info;
pub mod metrics;
pub mod registry;

pub use registry::{Toolbox, execute_tool};

use ucr_forecast_taxonomy::NormalizeError;

/// Errors surfaced to the caller of a tool.
///
/// Every variant carries a human-readable explanation and, where
/// applicable, remediation hints. Nothing here is fatal to a host
/// process; each failure is scoped to a single tool invocation.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// User-correctable input problem (bad offense/state/format/year/count).
    #[error("{message}")]
    Validation {
        /// Explanation including valid options and suggestions.
        message: String,
    },

    /// An upstream service did not respond in time.
    #[error("{message}")]
    Timeout {
        /// Explanation of which service timed out.
        message: String,
    },

    /// An upstream service responded with an error status.
    #[error("{message}")]
    Http {
        /// The HTTP status code.
        status: u16,
        /// Tailored explanation (404 "model not found", 5xx "service issues").
        message: String,
    },

    /// An upstream service could not be reached.
    #[error("{message}")]
    Connection {
        /// Explanation including the connection failure detail.
        message: String,
    },

    /// Every offense's fetch failed in the compare tool.
    #[error("{message}")]
    AllSourcesFailed {
        /// Explanation with likely causes.
        message: String,
    },

    /// Non-taxonomy failure (e.g. a malformed upstream response body).
    #[error("Unexpected error: {message}")]
    Unexpected {
        /// Description of what went wrong.
        message: String,
    },

    /// Tool parameters could not be decoded.
    #[error("Invalid tool parameters: {0}")]
    Params(#[from] serde_json::Error),
}

impl From<NormalizeError> for ToolError {
    fn from(err: NormalizeError) -> Self {
        Self::Validation {
            message: err.to_string(),
        }
    }
}

/// Validates the forecast horizon shared by the forecast and compare tools.
pub(crate) fn validate_months_ahead(months_ahead: u32) -> Result<(), ToolError> {
    if (1..=12).contains(&months_ahead) {
        Ok(())
    } else {
        Err(ToolError::Validation {
            message: format!(
                "months_ahead must be between 1 and 12, got {months_ahead}. \
                 For forecasts beyond 12 months, accuracy decreases significantly."
            ),
        })
    }
}
