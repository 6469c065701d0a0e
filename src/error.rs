use crate::api::ApiError;
use std::path::PathBuf;

/// Everything that can go wrong while talking to Tistory.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The HTTP call itself failed, or came back with a non-2xx status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered, but its embedded status was not 200.
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("missing access token")]
    MissingAccessToken,

    #[error("format needs to be either xml or json, got: {0}")]
    UnsupportedFormat(String),

    /// The OAuth provider answered with something we could not find our value in.
    #[error("OAuth response not understood: {0}")]
    UnexpectedResponse(&'static str),

    #[error("malformed response body: {0}")]
    MalformedResponse(String),

    #[error("unable to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("upload path has no file name: {}", .0.display())]
    InvalidUploadPath(PathBuf),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
