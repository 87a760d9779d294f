use thiserror::Error;

/// Errors raised by an `HttpClient` while performing a request
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP request failed for {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Invalid header value for {name}")]
    InvalidHeader { name: &'static str },
}

/// Errors that can occur during a podcast lookup
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Failed to decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors that can occur when building the default HTTP client
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("API credentials are required")]
    MissingCredentials,

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
