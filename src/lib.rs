pub mod auth;
pub mod error;
pub mod http;
pub mod podcasts;
pub mod query;

// Re-export main types for convenience
pub use auth::{AuthHeaders, Credentials};
pub use error::{BuildError, LookupError, TransportError};
pub use http::{HttpClient, ReqwestClient, ReqwestClientBuilder};
pub use podcasts::{
    Funding, PodcastArrayResult, PodcastFeed, PodcastLookupClient, PodcastResult, TrendingParams,
};
pub use query::{LookupRequest, QueryParam};
