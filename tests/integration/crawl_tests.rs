//! End-to-end crawl tests
//!
//! Each test mounts a small site on a wiremock server and crawls it from the
//! root, then checks the classified links and the requests the server saw.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use sumi_linkcheck::config::Config;
use sumi_linkcheck::crawler::{crawl, CancelFlag, Coordinator, CrawlObserver, CrawlProgress};
use sumi_linkcheck::state::{LinkRecord, StatusOutcome};
use sumi_linkcheck::url::{DomainPattern, Scope};
use sumi_linkcheck::LinkcheckError;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Serves `body` as an HTML page
fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html")
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

async fn mount_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Number of requests the server received for `route`
async fn hits(server: &MockServer, route: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == route)
        .count()
}

fn urls(records: &[LinkRecord]) -> BTreeSet<String> {
    records.iter().map(|record| record.url.clone()).collect()
}

fn test_config(max_depth: u32, concurrency: u32) -> Config {
    let mut config = Config::default();
    config.crawler.max_depth = max_depth;
    config.crawler.max_concurrency = concurrency;
    config.crawler.request_timeout = 5;
    config.user_agent.crawler_name = "TestBot".to_string();
    config
}

#[tokio::test]
async fn test_crawl_classifies_links_and_drops_offscope() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r#"<html><head><title>Home</title></head><body>
            <a href="/b">Page B</a>
            <a href="/c">Page C</a>
            <a href="http://offsite.invalid/d">Elsewhere</a>
        </body></html>"#,
    )
    .await;
    mount_page(&server, "/b", "<html><title>B</title><p>No links</p></html>").await;
    mount_status(&server, "/c", 404).await;

    let result = crawl(&format!("{}/", base), 1, 5).await.unwrap();

    assert_eq!(
        urls(&result.successes),
        BTreeSet::from([format!("{}/", base), format!("{}/b", base)])
    );
    assert_eq!(urls(&result.errors), BTreeSet::from([format!("{}/c", base)]));
    assert!(result.find("http://offsite.invalid/d").is_none());

    let c = result.find(&format!("{}/c", base)).unwrap();
    assert_eq!(c.status, StatusOutcome::HttpError(404));
    assert_eq!(c.anchor_text, "Page C");
    assert_eq!(c.source_url, format!("{}/", base));
    assert_eq!(c.source_title, "Home");

    let seed = result.find(&format!("{}/", base)).unwrap();
    assert_eq!(seed.source_title, "Root Page");
    assert_eq!(seed.status, StatusOutcome::Success(200));
}

#[tokio::test]
async fn test_cycle_terminates_and_fetches_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<title>A</title><a href="/b">to B</a>"#).await;
    mount_page(&server, "/b", r#"<title>B</title><a href="/">back to A</a>"#).await;

    let result = crawl(&format!("{}/", base), 5, 5).await.unwrap();

    assert_eq!(result.total(), 2);
    assert!(!result.has_errors());
    assert_eq!(hits(&server, "/").await, 1);
    assert_eq!(hits(&server, "/b").await, 1);
}

#[tokio::test]
async fn test_shared_links_dispatched_at_most_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r#"<a href="/x">X</a><a href="/y">Y</a><a href="/shared">Shared</a>"#,
    )
    .await;
    mount_page(&server, "/x", r#"<a href="/shared">again</a><a href="/y">Y</a>"#).await;
    mount_page(&server, "/y", r#"<a href="/shared">and again</a><a href="/x">X</a>"#).await;
    mount_page(&server, "/shared", r#"<a href="/">home</a>"#).await;

    let result = crawl(&format!("{}/", base), 3, 10).await.unwrap();

    assert_eq!(result.total(), 4);
    for route in ["/", "/x", "/y", "/shared"] {
        assert_eq!(hits(&server, route).await, 1, "{} fetched more than once", route);
    }

    // The first page to link it wins
    let shared = result.find(&format!("{}/shared", base)).unwrap();
    assert_eq!(shared.anchor_text, "Shared");
}

#[tokio::test]
async fn test_depth_zero_classifies_outlinks_only() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/b">B</a><a href="/gone">Gone</a>"#).await;
    mount_page(&server, "/b", r#"<a href="/c">C</a>"#).await;
    mount_status(&server, "/gone", 410).await;
    mount_page(&server, "/c", "<p>never reached</p>").await;

    let result = crawl(&format!("{}/", base), 0, 5).await.unwrap();

    assert_eq!(result.successes.len(), 2);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].status, StatusOutcome::HttpError(410));
    assert_eq!(hits(&server, "/b").await, 1);
    assert_eq!(hits(&server, "/c").await, 0);
    assert_eq!(result.summary.pages_expanded, 1);
}

#[tokio::test]
async fn test_concurrency_does_not_change_results() {
    let server = MockServer::start().await;
    let base = server.uri();

    let links: String = (0..10)
        .map(|i| format!(r#"<a href="/p{}">Page {}</a>"#, i, i))
        .collect();
    mount_page(&server, "/", &links).await;
    for i in 0..10 {
        if i % 3 == 0 {
            mount_status(&server, &format!("/p{}", i), 500).await;
        } else {
            let next = format!(r#"<a href="/p{}">next</a>"#, (i + 1) % 10);
            mount_page(&server, &format!("/p{}", i), &next).await;
        }
    }

    let seed = format!("{}/", base);
    let serial = crawl(&seed, 2, 1).await.unwrap();
    let parallel = crawl(&seed, 2, 10).await.unwrap();

    assert_eq!(urls(&serial.successes), urls(&parallel.successes));
    assert_eq!(urls(&serial.errors), urls(&parallel.errors));
    assert_eq!(serial.errors.len(), 4);
    assert_eq!(serial.successes.len(), 7);
    assert!(serial.summary.rounds > parallel.summary.rounds);
}

#[tokio::test]
async fn test_unreachable_seed_yields_error_record() {
    // Nothing listens on port 1
    let result = crawl("http://127.0.0.1:1/", 2, 5).await.unwrap();

    assert!(result.successes.is_empty());
    assert_eq!(result.errors.len(), 1);
    assert!(matches!(result.errors[0].status, StatusOutcome::NetworkError(_)));
    assert_eq!(result.errors[0].anchor_text, "Root Page");
}

#[tokio::test]
async fn test_errors_are_leaves() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/broken">Broken</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(
            ResponseTemplate::new(500).set_body_raw(r#"<a href="/hidden">x</a>"#, "text/html"),
        )
        .mount(&server)
        .await;
    mount_page(&server, "/hidden", "<p>hidden</p>").await;

    let result = crawl(&format!("{}/", base), 3, 5).await.unwrap();

    assert_eq!(urls(&result.errors), BTreeSet::from([format!("{}/broken", base)]));
    assert_eq!(hits(&server, "/hidden").await, 0);
}

#[tokio::test]
async fn test_redirected_page_uses_final_url_as_base() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/docs">Docs</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/docs"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/docs/"))
        .mount(&server)
        .await;
    mount_page(&server, "/docs/", r#"<a href="intro">Intro</a>"#).await;
    mount_page(&server, "/docs/intro", "<p>intro</p>").await;

    let result = crawl(&format!("{}/", base), 1, 5).await.unwrap();

    // Recorded under the URL as linked, not the redirect target
    let docs = result.find(&format!("{}/docs", base)).unwrap();
    assert_eq!(docs.status, StatusOutcome::Success(200));
    assert!(result.find(&format!("{}/docs/intro", base)).is_some());
    assert_eq!(hits(&server, "/docs/intro").await, 1);
}

#[tokio::test]
async fn test_non_html_page_is_not_expanded() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"<a href="/b">B</a>"#))
        .mount(&server)
        .await;
    mount_page(&server, "/b", "<p>b</p>").await;

    let result = crawl(&format!("{}/", base), 2, 5).await.unwrap();

    assert_eq!(result.total(), 1);
    assert_eq!(result.summary.pages_expanded, 0);
    assert_eq!(hits(&server, "/b").await, 0);
}

#[tokio::test]
async fn test_retry_recovers_from_503() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/flaky">Flaky</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_page(&server, "/flaky", "<p>ok now</p>").await;

    let mut config = test_config(1, 5);
    config.retry.max_attempts = 3;
    config.retry.delay_ms = 10;

    let result = Coordinator::new(&config)
        .unwrap()
        .crawl(&format!("{}/", base))
        .await
        .unwrap();

    let flaky = result.find(&format!("{}/flaky", base)).unwrap();
    assert_eq!(flaky.status, StatusOutcome::Success(200));
    assert_eq!(hits(&server, "/flaky").await, 2);
}

#[derive(Clone, Default)]
struct RecordingObserver {
    rounds: Arc<Mutex<Vec<CrawlProgress>>>,
    errors: Arc<Mutex<Vec<String>>>,
}

impl CrawlObserver for RecordingObserver {
    fn on_round(&self, progress: &CrawlProgress) {
        self.rounds.lock().unwrap().push(progress.clone());
    }

    fn on_error(&self, record: &LinkRecord) {
        self.errors.lock().unwrap().push(record.url.clone());
    }
}

#[tokio::test]
async fn test_observer_sees_rounds_and_errors() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/ok">OK</a><a href="/missing">Missing</a>"#).await;
    mount_page(&server, "/ok", "<p>fine</p>").await;
    mount_status(&server, "/missing", 404).await;

    let observer = RecordingObserver::default();
    let coordinator = Coordinator::new(&test_config(1, 5))
        .unwrap()
        .with_observer(observer.clone());
    let result = coordinator.crawl(&format!("{}/", base)).await.unwrap();

    let rounds = observer.rounds.lock().unwrap();
    assert_eq!(rounds.len() as u64, result.summary.rounds);
    assert_eq!(rounds.len(), 2);
    assert_eq!(rounds[0].urls_processed, 1);
    assert_eq!(rounds[0].urls_discovered_total, 3);
    assert_eq!(rounds[1].urls_processed, 3);

    let errors = observer.errors.lock().unwrap();
    assert_eq!(*errors, vec![format!("{}/missing", base)]);
}

#[tokio::test]
async fn test_cancelled_crawl_returns_partial_result() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "<p>home</p>").await;

    let cancel = CancelFlag::new();
    cancel.cancel();

    let coordinator = Coordinator::new(&test_config(1, 5))
        .unwrap()
        .with_cancel_flag(cancel);
    let result = coordinator.crawl(&format!("{}/", server.uri())).await.unwrap();

    assert!(result.summary.cancelled);
    assert_eq!(result.total(), 0);
    assert_eq!(hits(&server, "/").await, 0);
}

#[tokio::test]
async fn test_invalid_arguments_fail_before_fetching() {
    assert!(matches!(
        crawl("https://example.com/", 1, 0).await,
        Err(LinkcheckError::InvalidArgument(_))
    ));
    assert!(matches!(
        crawl("not a url", 1, 5).await,
        Err(LinkcheckError::Url(_))
    ));
    assert!(matches!(
        crawl("mailto:someone@example.com", 1, 5).await,
        Err(LinkcheckError::Url(_))
    ));
}

#[tokio::test]
async fn test_library_crawl_has_no_concurrency_cap() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/b">B</a>"#).await;
    mount_page(&server, "/b", "<p>b</p>").await;

    let result = crawl(&format!("{}/", base), 1, 200).await.unwrap();

    assert_eq!(result.total(), 2);
    assert_eq!(result.summary.concurrency_limit, 200);
}

/// Responds after a fixed delay and logs when each request arrived
#[derive(Clone)]
struct SlowResponder {
    delay: Duration,
    arrivals: Arc<Mutex<Vec<Instant>>>,
}

impl Respond for SlowResponder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.arrivals.lock().unwrap().push(Instant::now());
        html("<p>leaf</p>").set_delay(self.delay)
    }
}

/// Largest number of requests whose delay windows overlap
fn peak_in_flight(arrivals: &[Instant], delay: Duration) -> usize {
    arrivals
        .iter()
        .map(|&t| {
            arrivals
                .iter()
                .filter(|&&s| s <= t && t.duration_since(s) < delay)
                .count()
        })
        .max()
        .unwrap_or(0)
}

#[tokio::test]
async fn test_in_flight_fetches_bounded_by_limit() {
    let server = MockServer::start().await;
    let base = server.uri();
    let delay = Duration::from_millis(300);
    let responder = SlowResponder {
        delay,
        arrivals: Arc::new(Mutex::new(Vec::new())),
    };

    let links: String = (0..7)
        .map(|i| format!(r#"<a href="/slow/{}">Slow {}</a>"#, i, i))
        .collect();
    mount_page(&server, "/", &links).await;
    Mock::given(method("GET"))
        .and(path_regex("^/slow/"))
        .respond_with(responder.clone())
        .mount(&server)
        .await;

    let started = Instant::now();
    let result = crawl(&format!("{}/", base), 1, 2).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(result.successes.len(), 8);

    let arrivals = responder.arrivals.lock().unwrap();
    assert_eq!(arrivals.len(), 7);
    assert!(peak_in_flight(&arrivals, delay) <= 2);

    // Seven slow links, two at a time
    assert!(elapsed >= delay * 4, "finished in {:?}", elapsed);
}

#[tokio::test]
async fn test_custom_scope_replaces_seed_domain() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r#"<a href="/same-site">Same site</a>
           <a href="http://docs.site.invalid/guide">Docs</a>"#,
    )
    .await;
    mount_page(&server, "/same-site", "<p>same</p>").await;

    let scope = Scope::Patterns(vec![DomainPattern::Exact("docs.site.invalid".to_string())]);
    let coordinator = Coordinator::new(&test_config(1, 5))
        .unwrap()
        .with_scope(scope);
    let result = coordinator.crawl(&format!("{}/", base)).await.unwrap();

    // The seed is always dispatched; the same-host link is not in the pattern list
    assert!(result.find(&format!("{}/", base)).is_some());
    assert!(result.find(&format!("{}/same-site", base)).is_none());
    assert_eq!(hits(&server, "/same-site").await, 0);

    let docs = result.find("http://docs.site.invalid/guide").unwrap();
    assert!(!docs.status.is_success());
    assert_eq!(result.total(), 2);
}

#[tokio::test]
async fn test_cancel_flag_handle_stops_crawl() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<a href="/b">B</a>"#).await;

    let coordinator = Coordinator::new(&test_config(1, 5)).unwrap();
    coordinator.cancel_flag().cancel();
    let result = coordinator.crawl(&format!("{}/", server.uri())).await.unwrap();

    assert!(result.summary.cancelled);
    assert_eq!(hits(&server, "/").await, 0);
}
