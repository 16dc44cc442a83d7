use reqwest::StatusCode;

/// Everything that can go wrong while fetching a url.
///
/// Callers of the binding never see this type directly: every variant is
/// collapsed into its display message and stored in the `error` field of
/// [`FetchState`](crate::FetchState).
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A non-success status, containing the response text.
    #[error("Request failed with status code {}", .0.as_u16())]
    APIError(StatusCode, String),
    #[error("{0}")]
    Network(#[from] reqwest::Error),
    /// The body arrived but did not match the expected payload shape.
    #[error("{0}")]
    Decode(#[from] serde_json::Error),
    /// Failure reported by a transport that is not backed by reqwest.
    #[error("{0}")]
    Transport(String),
    #[error("Request cancelled")]
    Cancelled,
}
