// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Metadata for a single podcast feed as returned by the directory.
///
/// Endpoints return different subsets of these fields, so everything except
/// the id is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodcastFeed {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub podcast_guid: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artwork: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_crawl_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_parse_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_good_http_status_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_http_status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub itunes_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explicit: Option<bool>,
    /// 0 = RSS, 1 = Atom
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub feed_type: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dead: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crawl_errors: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_errors: Option<u64>,
    /// Category id to category name
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub categories: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url_hash: Option<u64>,
    #[serde(
        default,
        alias = "newestItemPubdate",
        skip_serializing_if = "Option::is_none"
    )]
    pub newest_item_publish_time: Option<i64>,
    /// Only present on trending results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend_score: Option<u64>,
    /// Only present on dead feed results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate_of: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funding: Option<Funding>,
    /// Podcast namespace `<podcast:value>` block, kept as raw JSON
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// Podcast namespace `<podcast:funding>` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Funding {
    pub url: String,
    #[serde(default)]
    pub message: String,
}

impl PodcastFeed {
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_update_time.and_then(from_unix)
    }

    pub fn newest_item_published(&self) -> Option<DateTime<Utc>> {
        self.newest_item_publish_time.and_then(from_unix)
    }

    pub fn is_dead(&self) -> bool {
        self.dead.is_some_and(|dead| dead != 0)
    }
}

fn from_unix(seconds: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0)
}

/// Response carrying at most one feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodcastResult {
    #[serde(deserialize_with = "status_flag")]
    pub status: bool,
    #[serde(default)]
    pub description: String,
    /// The query as echoed back by the API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<Value>,
    /// `None` when nothing matched (the API sends an empty array)
    #[serde(default, deserialize_with = "empty_as_none")]
    pub feed: Option<PodcastFeed>,
}

/// Response carrying a list of feeds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodcastArrayResult {
    #[serde(deserialize_with = "status_flag")]
    pub status: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub feeds: Vec<PodcastFeed>,
    #[serde(default)]
    pub count: u64,
    #[serde(
        default,
        deserialize_with = "loose_integer",
        skip_serializing_if = "Option::is_none"
    )]
    pub max: Option<i64>,
    #[serde(
        default,
        deserialize_with = "loose_integer",
        skip_serializing_if = "Option::is_none"
    )]
    pub since: Option<i64>,
    /// Opaque continuation token for tag listings
    #[serde(
        default,
        deserialize_with = "opaque_token",
        skip_serializing_if = "Option::is_none"
    )]
    pub next_start_at: Option<String>,
}

/// Accept `true`/`false` as JSON booleans or strings
fn status_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Bool(flag) => Ok(flag),
        Value::String(s) => match s.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(D::Error::custom(format!("invalid status '{other}'"))),
        },
        other => Err(D::Error::custom(format!("invalid status {other}"))),
    }
}

/// Treat `null`, `[]` and `{}` as absent
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let empty = match &value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        _ => false,
    };
    if empty {
        return Ok(None);
    }
    serde_json::from_value(value).map(Some).map_err(D::Error::custom)
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Integers sometimes arrive as strings
fn loose_integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("integer out of range: {n}"))),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => s.parse().map(Some).map_err(D::Error::custom),
        other => Err(D::Error::custom(format!("expected integer, got {other}"))),
    }
}

fn opaque_token<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(D::Error::custom(format!("invalid continuation token {other}"))),
    }
}
