// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;

use sha1::{Digest, Sha1};

/// PodcastIndex API key and secret
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Compute the headers that authenticate a request issued at `timestamp`
    /// (Unix seconds).
    pub fn sign(&self, timestamp: i64) -> AuthHeaders {
        let date = timestamp.to_string();

        let mut hasher = Sha1::new();
        hasher.update(self.api_key.as_bytes());
        hasher.update(self.api_secret.as_bytes());
        hasher.update(date.as_bytes());
        let authorization = format!("{:x}", hasher.finalize());

        AuthHeaders {
            api_key: self.api_key.clone(),
            date,
            authorization,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Values for the `X-Auth-Key`, `X-Auth-Date` and `Authorization` headers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeaders {
    pub api_key: String,
    pub date: String,
    pub authorization: String,
}
