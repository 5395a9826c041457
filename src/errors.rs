use reqwest::StatusCode;

/// Failures of the HTTP call itself.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: StatusCode, body: String },
    #[error("response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

impl TransportError {
    /// Whether the HTTP layer should try the same request again.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(err) => err.is_timeout() || err.is_connect(),
            Self::HttpStatus { status, .. } => status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS,
            Self::Decode(_) => false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Failed to fetch data from graph at {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: TransportError,
    },
    #[error("Unexpected request response. No {entity} data received after fetching {received} {entity}.")]
    NoData { entity: String, received: usize },
}

pub type FetchResult<T> = Result<T, FetchError>;
