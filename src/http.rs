// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use url::Url;

use crate::auth::Credentials;
use crate::error::{BuildError, TransportError};
use crate::query::LookupRequest;

/// Default base URL for the PodcastIndex API
pub const DEFAULT_BASE_URL: &str = "https://api.podcastindex.org/api/1.0/";

/// Default User-Agent, named after the crate
pub const DEFAULT_USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// HTTP client abstraction for testability
///
/// Implementations own base URL, authentication and connection handling.
/// Callers only supply the API path and query.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform a GET for the request and return the full response body
    async fn get_bytes(&self, request: &LookupRequest) -> Result<Bytes, TransportError>;
}

/// Default HTTP client implementation using reqwest
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
}

/// Builder for `ReqwestClient`
#[derive(Debug, Default)]
pub struct ReqwestClientBuilder {
    base_url: Option<Url>,
    credentials: Option<Credentials>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl ReqwestClientBuilder {
    /// Override the API base URL (e.g. for a local mock server)
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Set the API credentials (required)
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Overall per-request timeout enforced by reqwest
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<ReqwestClient, BuildError> {
        let credentials = self.credentials.ok_or(BuildError::MissingCredentials)?;

        let mut base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL)?,
        };
        // `Url::join` replaces the last segment unless the path ends in a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(ReqwestClient {
            client: builder.build()?,
            base_url,
            credentials,
        })
    }
}

impl ReqwestClient {
    pub fn builder() -> ReqwestClientBuilder {
        ReqwestClientBuilder::default()
    }

    /// Create a client for the public API with default settings
    pub fn new(credentials: Credentials) -> Result<Self, BuildError> {
        Self::builder().credentials(credentials).build()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve the request against the base URL and apply its query string verbatim
    fn request_url(&self, request: &LookupRequest) -> Result<Url, TransportError> {
        let mut url = self.base_url.join(request.path().trim_start_matches('/'))?;
        url.set_query(request.query_string().as_deref());
        Ok(url)
    }

    fn auth_headers(&self) -> Result<HeaderMap, TransportError> {
        let signed = self.credentials.sign(Utc::now().timestamp());

        let mut headers = HeaderMap::new();
        headers.insert("x-auth-key", header_value("X-Auth-Key", &signed.api_key)?);
        headers.insert("x-auth-date", header_value("X-Auth-Date", &signed.date)?);
        headers.insert(
            AUTHORIZATION,
            header_value("Authorization", &signed.authorization)?,
        );
        Ok(headers)
    }
}

fn header_value(name: &'static str, value: &str) -> Result<HeaderValue, TransportError> {
    HeaderValue::from_str(value).map_err(|_| TransportError::InvalidHeader { name })
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get_bytes(&self, request: &LookupRequest) -> Result<Bytes, TransportError> {
        let url = self.request_url(request)?;
        tracing::debug!(url = %url, "PodcastIndex API request");

        let response = self
            .client
            .get(url.clone())
            .headers(self.auth_headers()?)
            .send()
            .await
            .map_err(|e| TransportError::Request {
                url: url.to_string(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                url = %url,
                status = status.as_u16(),
                "PodcastIndex API returned an error status"
            );
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.bytes().await.map_err(|e| TransportError::Request {
            url: url.to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryParam;

    fn credentials() -> Credentials {
        Credentials::new("key", "secret")
    }

    #[test]
    fn builder_requires_credentials() {
        let result = ReqwestClient::builder().build();
        assert!(matches!(result, Err(BuildError::MissingCredentials)));
    }

    #[test]
    fn builder_uses_default_base_url() {
        let client = ReqwestClient::new(credentials()).unwrap();
        assert_eq!(client.base_url().as_str(), DEFAULT_BASE_URL);
    }

    #[test]
    fn builder_accepts_custom_base_url() {
        let custom = Url::parse("http://localhost:8080/api/1.0/").unwrap();
        let client = ReqwestClient::builder()
            .credentials(credentials())
            .base_url(custom.clone())
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        assert_eq!(client.base_url(), &custom);
    }

    #[test]
    fn builder_appends_missing_trailing_slash() {
        let client = ReqwestClient::builder()
            .credentials(credentials())
            .base_url(Url::parse("https://api.podcastindex.org/api/1.0").unwrap())
            .build()
            .unwrap();
        let request = LookupRequest::new("/podcasts/byfeedid", vec![QueryParam::value("id", 1)]);

        let url = client.request_url(&request).unwrap();

        assert_eq!(client.base_url().as_str(), DEFAULT_BASE_URL);
        assert_eq!(
            url.as_str(),
            "https://api.podcastindex.org/api/1.0/podcasts/byfeedid?id=1"
        );
    }

    #[test]
    fn request_url_joins_path_below_base() {
        let client = ReqwestClient::new(credentials()).unwrap();
        let request = LookupRequest::new(
            "/podcasts/byfeedid",
            vec![QueryParam::value("id", 920666), QueryParam::flag("pretty")],
        );

        let url = client.request_url(&request).unwrap();

        assert_eq!(
            url.as_str(),
            "https://api.podcastindex.org/api/1.0/podcasts/byfeedid?id=920666&pretty"
        );
    }

    #[test]
    fn request_url_omits_empty_query() {
        let client = ReqwestClient::new(credentials()).unwrap();
        let request = LookupRequest::new("/podcasts/dead", vec![]);

        let url = client.request_url(&request).unwrap();

        assert_eq!(url.query(), None);
        assert_eq!(url.path(), "/api/1.0/podcasts/dead");
    }

    #[test]
    fn auth_headers_are_attached() {
        let client = ReqwestClient::new(credentials()).unwrap();
        let headers = client.auth_headers().unwrap();

        assert_eq!(headers["x-auth-key"], "key");
        assert!(headers.contains_key("x-auth-date"));
        assert_eq!(headers[AUTHORIZATION].len(), 40);
    }

    #[test]
    fn reqwest_client_can_be_cloned() {
        let client = ReqwestClient::new(credentials()).unwrap();
        let _cloned = client.clone();
    }
}
