use reqwest::StatusCode;
use thiserror::Error;

/// Failures surfaced by the catalog client. The variants are deliberately
/// distinct so callers can decide what is worth retrying: only `Transport`
/// is; everything else is either fatal to the session or a data problem.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Bad credentials, a login response without a token, or an
    /// authenticated call issued before `login` succeeded.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The token was accepted but the user identity could not be resolved.
    #[error("could not resolve session user: {0}")]
    SessionResolution(String),

    /// Connectivity or timeout failure before a response was read.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server returned {status} for {path}: {detail}")]
    Server {
        status: StatusCode,
        path: String,
        detail: String,
    },

    /// A success status whose body was absent or undecodable.
    #[error("empty or undecodable response from {path}")]
    EmptyResponse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Missing or malformed construction input (environment, base URL).
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;
