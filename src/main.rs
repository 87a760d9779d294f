use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use futures::StreamExt;
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use url::Url;

use podindex::{
    Credentials, PodcastArrayResult, PodcastFeed, PodcastLookupClient, PodcastResult,
    ReqwestClient, TrendingParams,
};

/// Look up podcasts in the PodcastIndex directory
#[derive(Parser, Debug)]
#[command(name = "podindex")]
#[command(about = "Look up podcasts in the PodcastIndex directory")]
#[command(version)]
struct Args {
    /// PodcastIndex API key
    #[arg(long, env = "PODCASTINDEX_API_KEY", hide_env_values = true)]
    api_key: String,

    /// PodcastIndex API secret
    #[arg(long, env = "PODCASTINDEX_API_SECRET", hide_env_values = true)]
    api_secret: String,

    /// Override the API base URL
    #[arg(long, env = "PODCASTINDEX_BASE_URL")]
    base_url: Option<Url>,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,

    /// Ask the API for pretty-printed JSON
    #[arg(long, global = true)]
    pretty: bool,

    /// Print the decoded response as JSON instead of a summary
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Look up a feed by its PodcastIndex id
    FeedId { id: u64 },

    /// Look up a feed by its URL
    FeedUrl { url: String },

    /// Look up a feed by its podcast namespace GUID
    Guid { guid: String },

    /// Look up a feed by its iTunes id
    ItunesId { id: u64 },

    /// List feeds carrying a <podcast:value> tag
    Tag {
        #[arg(short, long)]
        max: Option<u32>,

        /// Continuation token from a previous page
        #[arg(long)]
        start_at: Option<String>,

        /// Follow continuation tokens until the listing is exhausted
        #[arg(long, conflicts_with = "start_at")]
        all: bool,
    },

    /// List feeds with the given medium (music, audiobook, film, ...)
    Medium {
        medium: String,

        #[arg(short, long)]
        max: Option<u32>,
    },

    /// List currently trending feeds
    Trending {
        #[arg(short, long)]
        max: Option<u32>,

        /// Epoch seconds, or a negative number of seconds before now
        #[arg(long, allow_hyphen_values = true)]
        since: Option<i64>,

        #[arg(long)]
        lang: Option<String>,

        /// Comma separated categories to include
        #[arg(long)]
        cat: Option<String>,

        /// Comma separated categories to exclude
        #[arg(long)]
        notcat: Option<String>,
    },

    /// List feeds marked as dead
    Dead,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_feed(feed: &PodcastFeed) {
    let updated = feed
        .last_updated()
        .map(|at| at.format("%Y-%m-%d").to_string())
        .unwrap_or_default();

    println!(
        "{} {} {} {}",
        feed.id.to_string().cyan(),
        feed.title.bold(),
        feed.url.dimmed(),
        updated.yellow()
    );
}

fn print_single(result: &PodcastResult, json: bool) -> Result<()> {
    if json {
        return print_json(result);
    }

    match &result.feed {
        Some(feed) => print_feed(feed),
        None => println!("{}", result.description.yellow()),
    }
    Ok(())
}

fn print_list(result: &PodcastArrayResult, json: bool) -> Result<()> {
    if json {
        return print_json(result);
    }

    for feed in &result.feeds {
        print_feed(feed);
    }
    println!(
        "{} {}",
        result.count.to_string().green().bold(),
        result.description.dimmed()
    );
    if let Some(token) = &result.next_start_at {
        println!("Next page: --start-at {}", token.cyan());
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize response")?;
    println!("{json}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut builder = ReqwestClient::builder()
        .credentials(Credentials::new(&args.api_key, &args.api_secret))
        .timeout(Duration::from_secs(args.timeout));
    if let Some(base_url) = args.base_url {
        builder = builder.base_url(base_url);
    }
    let client = builder.build().context("Failed to create HTTP client")?;
    let lookup = PodcastLookupClient::new(client);

    let pretty = args.pretty;
    match args.command {
        Command::FeedId { id } => {
            let result = lookup.lookup_by_feed_id(id, pretty).await;
            print_single(&result.context("Lookup by feed id failed")?, args.json)?;
        }
        Command::FeedUrl { url } => {
            let result = lookup.lookup_by_feed_url(&url, pretty).await;
            print_single(&result.context("Lookup by feed URL failed")?, args.json)?;
        }
        Command::Guid { guid } => {
            let result = lookup.lookup_by_guid(&guid, pretty).await;
            print_single(&result.context("Lookup by GUID failed")?, args.json)?;
        }
        Command::ItunesId { id } => {
            let result = lookup.lookup_by_itunes_id(id, pretty).await;
            print_single(&result.context("Lookup by iTunes id failed")?, args.json)?;
        }
        Command::Tag { max, all: true, .. } => {
            let mut pages = Box::pin(lookup.tag_pages(max, pretty));
            while let Some(page) = pages.next().await {
                print_list(&page.context("Lookup by tag failed")?, args.json)?;
            }
        }
        Command::Tag { max, start_at, .. } => {
            let result = lookup.lookup_by_tag(max, start_at.as_deref(), pretty).await;
            print_list(&result.context("Lookup by tag failed")?, args.json)?;
        }
        Command::Medium { medium, max } => {
            let result = lookup.lookup_by_medium(&medium, max, pretty).await;
            print_list(&result.context("Lookup by medium failed")?, args.json)?;
        }
        Command::Trending {
            max,
            since,
            lang,
            cat,
            notcat,
        } => {
            let params = TrendingParams {
                max,
                since,
                lang,
                cat,
                notcat,
                pretty,
            };
            let result = lookup.trending_podcasts(&params).await;
            print_list(&result.context("Trending lookup failed")?, args.json)?;
        }
        Command::Dead => {
            let result = lookup.dead_podcasts(pretty).await;
            print_list(&result.context("Dead feed lookup failed")?, args.json)?;
        }
    }

    Ok(())
}
