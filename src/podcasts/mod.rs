mod lookup;
mod pages;
mod types;

pub use lookup::{PodcastLookupClient, TrendingParams};
pub use types::{Funding, PodcastArrayResult, PodcastFeed, PodcastResult};
