// Error types shared by the fetch, extraction and aggregation layers.

use thiserror::Error;

/// A request against the league API failed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("malformed response from {url}: {source}")]
    MalformedResponse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A lookup between two API payloads found nothing. These indicate stale or
/// inconsistent data and abort the run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotFoundError {
    #[error("manager {0} not found in league standings")]
    Manager(u64),

    #[error("player {0} not found in player index")]
    Player(u32),

    #[error("league standings have no AVERAGE row")]
    AverageRow,

    #[error("fixture side `{0}` has no entry id")]
    FixtureEntry(String),
}

/// Failure while building a manager summary or a match report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),
}
