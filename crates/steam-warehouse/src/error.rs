use reqwest::StatusCode;
use thiserror::Error;

/// Failures of a single price lookup; any of these ends the sync run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request URL is {len} bytes, over the {max} byte limit")]
    UrlTooLong { len: usize, max: usize },

    #[error("{url} responded with {status}")]
    Status { status: StatusCode, url: String },

    #[error("unrecognised app ID {0:?} in response")]
    BadKey(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
