use std::time::Duration;

use podindex::{
    Credentials, LookupError, PodcastLookupClient, ReqwestClient, TransportError, TrendingParams,
};
use url::Url;
use wiremock::matchers::{header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FEED_BODY: &str = include_str!("../fixtures/byfeedid_920666.json");
const TAG_BODY: &str = include_str!("../fixtures/bytag_podcast_value.json");
const DEAD_BODY: &str = include_str!("../fixtures/dead.json");

fn lookup_for(server: &MockServer) -> PodcastLookupClient<ReqwestClient> {
    let base_url = Url::parse(&format!("{}/api/1.0/", server.uri())).unwrap();
    let client = ReqwestClient::builder()
        .base_url(base_url)
        .credentials(Credentials::new("test-key", "test-secret"))
        .user_agent("podindex-test/0.0.0")
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    PodcastLookupClient::new(client)
}

async fn last_query(server: &MockServer) -> Option<String> {
    let requests = server.received_requests().await.unwrap();
    requests.last().unwrap().url.query().map(String::from)
}

#[tokio::test]
async fn lookup_by_feed_id_sends_signed_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/1.0/podcasts/byfeedid"))
        .and(query_param("id", "920666"))
        .and(header("X-Auth-Key", "test-key"))
        .and(header_exists("X-Auth-Date"))
        .and(header_exists("Authorization"))
        .and(header("User-Agent", "podindex-test/0.0.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FEED_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let result = lookup_for(&server)
        .lookup_by_feed_id(920666, false)
        .await
        .unwrap();

    assert_eq!(result.feed.unwrap().title, "Podcasting 2.0");
    assert_eq!(last_query(&server).await.as_deref(), Some("id=920666"));
}

#[tokio::test]
async fn lookup_by_tag_keeps_flag_parameters_bare() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/1.0/podcasts/bytag"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TAG_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let result = lookup_for(&server)
        .lookup_by_tag(Some(20), Some("100"), true)
        .await
        .unwrap();

    assert_eq!(result.next_start_at.as_deref(), Some("41505"));
    assert_eq!(
        last_query(&server).await.as_deref(),
        Some("podcast-value&max=20&pretty&start_at=100")
    );
}

#[tokio::test]
async fn trending_sends_only_supplied_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/1.0/podcasts/trending"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(include_str!("../fixtures/trending.json")),
        )
        .expect(1)
        .mount(&server)
        .await;

    lookup_for(&server)
        .trending_podcasts(&TrendingParams::new().max(10).lang("en"))
        .await
        .unwrap();

    assert_eq!(last_query(&server).await.as_deref(), Some("max=10&lang=en"));
}

#[tokio::test]
async fn dead_podcasts_sends_no_query_string() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/1.0/podcasts/dead"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DEAD_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let result = lookup_for(&server).dead_podcasts(false).await.unwrap();

    assert_eq!(result.feeds.len(), 2);
    assert_eq!(last_query(&server).await, None);
}

#[tokio::test]
async fn server_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/1.0/podcasts/byguid"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/1.0/podcasts/byfeedid"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FEED_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let lookup = lookup_for(&server);

    let failed = lookup.lookup_by_guid("missing", false).await;
    assert!(matches!(
        failed,
        Err(LookupError::Transport(TransportError::Status { status: 500, .. }))
    ));

    let next = lookup.lookup_by_feed_id(920666, false).await;
    assert!(next.is_ok());
}

#[tokio::test]
async fn unexpected_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = lookup_for(&server).lookup_by_medium("music", None, false).await;

    assert!(matches!(result, Err(LookupError::Decode { .. })));
}
