use thiserror::Error;

#[derive(Error, Debug)]
pub enum VectorServiceError {
    /// The input was rejected before a request was made (e.g. empty text for
    /// an add or an empty query for a search). The service would answer the
    /// same request with a 400.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The request to the service failed or the parsing of the response
    /// failed.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The request returned a non-success status code.
    #[error("Status error: {1} (Status {0})")]
    StatusCode(reqwest::StatusCode, String),
    /// The response from the service violated the wire contract (e.g. a
    /// success status paired with a failure body).
    #[error("Invariant: {0}")]
    Invariant(String),
}

pub type VectorServiceResult<T> = Result<T, VectorServiceError>;
