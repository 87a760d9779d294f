// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::error::LookupError;
use crate::http::HttpClient;
use crate::query::{LookupRequest, QueryParam};

use super::types::{PodcastArrayResult, PodcastResult};

/// Path prefix shared by every endpoint in the podcasts group
const PODCASTS_PATH: &str = "/podcasts";

/// Optional filters for the trending listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrendingParams {
    pub max: Option<u32>,
    /// Epoch seconds, or a negative offset meaning "seconds before now".
    /// Sent exactly as given.
    pub since: Option<i64>,
    pub lang: Option<String>,
    pub cat: Option<String>,
    pub notcat: Option<String>,
    pub pretty: bool,
}

impl TrendingParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max(mut self, max: u32) -> Self {
        self.max = Some(max);
        self
    }

    pub fn since(mut self, since: i64) -> Self {
        self.since = Some(since);
        self
    }

    /// Restrict to feeds trending within the given window before now
    pub fn since_seconds_ago(self, window: Duration) -> Self {
        let seconds = i64::try_from(window.as_secs()).unwrap_or(i64::MAX);
        self.since(-seconds)
    }

    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    /// Comma separated category ids or names to include
    pub fn cat(mut self, cat: impl Into<String>) -> Self {
        self.cat = Some(cat.into());
        self
    }

    /// Comma separated category ids or names to exclude
    pub fn notcat(mut self, notcat: impl Into<String>) -> Self {
        self.notcat = Some(notcat.into());
        self
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

/// Typed access to the `/podcasts` endpoint group.
///
/// Every call issues exactly one GET through the shared transport. Errors
/// from the transport or from decoding are returned as they are; nothing is
/// retried.
pub struct PodcastLookupClient<C: HttpClient> {
    client: Arc<C>,
}

impl<C: HttpClient> Clone for PodcastLookupClient<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<C: HttpClient> PodcastLookupClient<C> {
    pub fn new(client: C) -> Self {
        Self::with_shared(Arc::new(client))
    }

    /// Use a transport that is shared with other API clients
    pub fn with_shared(client: Arc<C>) -> Self {
        Self { client }
    }

    /// `/podcasts/byfeedid`
    #[instrument(skip_all)]
    pub async fn lookup_by_feed_id(
        &self,
        id: u64,
        pretty: bool,
    ) -> Result<PodcastResult, LookupError> {
        self.lookup_single("byfeedid", QueryParam::value("id", id), pretty)
            .await
    }

    /// `/podcasts/byfeedurl`
    #[instrument(skip_all)]
    pub async fn lookup_by_feed_url(
        &self,
        url: &str,
        pretty: bool,
    ) -> Result<PodcastResult, LookupError> {
        self.lookup_single("byfeedurl", QueryParam::value("url", url), pretty)
            .await
    }

    /// `/podcasts/byguid`, using the podcast namespace GUID
    #[instrument(skip_all)]
    pub async fn lookup_by_guid(
        &self,
        guid: &str,
        pretty: bool,
    ) -> Result<PodcastResult, LookupError> {
        self.lookup_single("byguid", QueryParam::value("guid", guid), pretty)
            .await
    }

    /// `/podcasts/byitunesid`
    #[instrument(skip_all)]
    pub async fn lookup_by_itunes_id(
        &self,
        id: u64,
        pretty: bool,
    ) -> Result<PodcastResult, LookupError> {
        self.lookup_single("byitunesid", QueryParam::value("id", id), pretty)
            .await
    }

    /// `/podcasts/bytag`, listing feeds carrying a `<podcast:value>` tag.
    ///
    /// `start_at` is the `next_start_at` token of a previous page.
    #[instrument(skip_all)]
    pub async fn lookup_by_tag(
        &self,
        max: Option<u32>,
        start_at: Option<&str>,
        pretty: bool,
    ) -> Result<PodcastArrayResult, LookupError> {
        self.lookup_many(
            "bytag",
            QueryParam::flag("podcast-value"),
            max,
            start_at,
            pretty,
        )
        .await
    }

    /// `/podcasts/bymedium`, e.g. `music`, `audiobook` or `film`
    #[instrument(skip_all)]
    pub async fn lookup_by_medium(
        &self,
        medium: &str,
        max: Option<u32>,
        pretty: bool,
    ) -> Result<PodcastArrayResult, LookupError> {
        self.lookup_many(
            "bymedium",
            QueryParam::value("medium", medium),
            max,
            None,
            pretty,
        )
        .await
    }

    /// `/podcasts/trending`
    #[instrument(skip_all)]
    pub async fn trending_podcasts(
        &self,
        params: &TrendingParams,
    ) -> Result<PodcastArrayResult, LookupError> {
        let mut query = Vec::new();
        if let Some(max) = params.max {
            query.push(QueryParam::value("max", max));
        }
        if params.pretty {
            query.push(QueryParam::flag("pretty"));
        }
        if let Some(since) = params.since {
            query.push(QueryParam::value("since", since));
        }
        if let Some(lang) = &params.lang {
            query.push(QueryParam::value("lang", lang));
        }
        if let Some(cat) = &params.cat {
            query.push(QueryParam::value("cat", cat));
        }
        if let Some(notcat) = &params.notcat {
            query.push(QueryParam::value("notcat", notcat));
        }

        self.get(LookupRequest::new(endpoint("trending"), query))
            .await
    }

    /// `/podcasts/dead`
    #[instrument(skip_all)]
    pub async fn dead_podcasts(&self, pretty: bool) -> Result<PodcastArrayResult, LookupError> {
        let mut query = Vec::new();
        if pretty {
            query.push(QueryParam::flag("pretty"));
        }

        self.get(LookupRequest::new(endpoint("dead"), query)).await
    }

    /// One required key, answered with a single feed
    async fn lookup_single(
        &self,
        sub_path: &str,
        required: QueryParam,
        pretty: bool,
    ) -> Result<PodcastResult, LookupError> {
        let mut query = vec![required];
        if pretty {
            query.push(QueryParam::flag("pretty"));
        }

        self.get(LookupRequest::new(endpoint(sub_path), query))
            .await
    }

    /// One required key plus paging options, answered with a feed list
    async fn lookup_many(
        &self,
        sub_path: &str,
        required: QueryParam,
        max: Option<u32>,
        start_at: Option<&str>,
        pretty: bool,
    ) -> Result<PodcastArrayResult, LookupError> {
        let mut query = vec![required];
        if let Some(max) = max {
            query.push(QueryParam::value("max", max));
        }
        if pretty {
            query.push(QueryParam::flag("pretty"));
        }
        if let Some(start_at) = start_at {
            query.push(QueryParam::value("start_at", start_at));
        }

        self.get(LookupRequest::new(endpoint(sub_path), query))
            .await
    }

    async fn get<T: DeserializeOwned>(&self, request: LookupRequest) -> Result<T, LookupError> {
        tracing::debug!(request = %request, "Podcast lookup");

        let body = self.client.get_bytes(&request).await?;

        serde_json::from_slice(&body).map_err(|e| LookupError::Decode {
            path: request.path().to_string(),
            source: e,
        })
    }
}

fn endpoint(sub_path: &str) -> String {
    format!("{PODCASTS_PATH}/{sub_path}")
}
