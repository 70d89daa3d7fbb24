//! Error types for backend requests.
//!
//! Neither error ever reaches the presentation layer: the store and the
//! orchestrator turn them into a banner message and a terminal state.

use thiserror::Error;

/// A result fetch (`/vehicles` or `/industries`) failed.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("failed to decode {endpoint} payload: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The recomputation request (`POST /run-analysis`) failed.
#[derive(Error, Debug)]
pub enum RunRequestError {
    #[error("run-analysis request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("run-analysis returned HTTP {status}")]
    Status { status: u16 },
}
