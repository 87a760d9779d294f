// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use futures::Stream;
use futures::stream;

use crate::error::LookupError;
use crate::http::HttpClient;

use super::lookup::PodcastLookupClient;
use super::types::PodcastArrayResult;

enum Cursor {
    First,
    Next(String),
    Done,
}

impl<C: HttpClient> PodcastLookupClient<C> {
    /// Walk every `bytag` page, following `next_start_at` tokens.
    ///
    /// Ends after a page without a token or without feeds, and after the
    /// first error.
    pub fn tag_pages(
        &self,
        max: Option<u32>,
        pretty: bool,
    ) -> impl Stream<Item = Result<PodcastArrayResult, LookupError>> + '_ {
        stream::unfold(Cursor::First, move |cursor| async move {
            let start_at = match cursor {
                Cursor::First => None,
                Cursor::Next(token) => Some(token),
                Cursor::Done => return None,
            };

            match self.lookup_by_tag(max, start_at.as_deref(), pretty).await {
                Ok(page) => {
                    let next = match &page.next_start_at {
                        Some(token) if !page.feeds.is_empty() => Cursor::Next(token.clone()),
                        _ => Cursor::Done,
                    };
                    tracing::debug!(feeds = page.feeds.len(), "Fetched tag page");
                    Some((Ok(page), next))
                }
                Err(e) => Some((Err(e), Cursor::Done)),
            }
        })
    }
}
