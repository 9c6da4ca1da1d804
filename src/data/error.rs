use thiserror::Error;

/// Transport-level failure while downloading the dataset.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to create HTTP client: {0}")]
    Client(String),
    #[error("request timed out fetching {0}")]
    Timeout(String),
    #[error("failed to connect to {0}")]
    Connect(String),
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

/// No (encoding, separator) candidate produced a usable table.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("no encoding/separator combination produced a usable table: {0}")]
    Exhausted(String),
}

/// Terminal failures of the load pipeline. Each aborts the current render
/// cycle: the UI reports the message and waits for a manual re-trigger.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("download failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("unreadable CSV: {0}")]
    Decode(#[from] DecodeError),
    #[error("the dataset contains no rows")]
    EmptyDataset,
}
