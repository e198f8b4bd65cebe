//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end over HTTP.

use sitewalk::config::{Config, CrawlerConfig, HttpConfig, OutputConfig};
use sitewalk::crawler::{crawl, LinkFinderError};
use sitewalk::output::{CrawlStatistics, CrawlSummary, ResultSink, SqliteSink};
use sitewalk::storage::{RunStatus, SqliteStorage, Storage};
use sitewalk::{Link, VisitResult};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration without rate limiting
fn create_test_config(workers: usize) -> Config {
    Config {
        crawler: CrawlerConfig {
            workers,
            ..CrawlerConfig::default()
        },
        http: HttpConfig {
            requests_per_second: 0,
            timeout_secs: 5,
            user_agent: "sitewalk-test/1.0".to_string(),
        },
        output: OutputConfig::default(),
    }
}

/// Builds an HTML page containing one anchor per href
fn html_page(hrefs: &[&str]) -> String {
    let anchors: String = hrefs
        .iter()
        .map(|href| format!("<a href=\"{}\">link</a>\n", href))
        .collect();
    format!(
        "<html><head><title>Test</title></head><body>{}</body></html>",
        anchors
    )
}

/// Serves an HTML page with the given links at `route`
async fn serve_page(server: &MockServer, route: &str, hrefs: &[&str]) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html_page(hrefs), "text/html"))
        .mount(server)
        .await;
}

async fn crawl_site(server: &MockServer, start: &str, workers: usize) -> Vec<VisitResult> {
    let start = Link::parse(&format!("{}{}", server.uri(), start)).expect("Invalid start URL");
    let stream = crawl(&create_test_config(workers), start, CancellationToken::new())
        .expect("Failed to start crawl");

    tokio::time::timeout(Duration::from_secs(30), stream.collect())
        .await
        .expect("Crawl did not finish")
}

/// Maps each visited page to its sorted links, so links compare as multisets
fn site_map(results: &[VisitResult]) -> BTreeMap<String, Vec<String>> {
    results
        .iter()
        .map(|result| {
            let mut links: Vec<String> = result
                .links()
                .iter()
                .map(|link| link.as_str().to_string())
                .collect();
            links.sort();
            (result.page().as_str().to_string(), links)
        })
        .collect()
}

/// Builds the expected site map; hrefs starting with `/` are relative to the server
fn expected_map(server: &MockServer, pages: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
    let base = server.uri();
    pages
        .iter()
        .map(|(page, links)| {
            let mut links: Vec<String> = links
                .iter()
                .map(|link| {
                    if link.starts_with('/') {
                        format!("{}{}", base, link)
                    } else {
                        link.to_string()
                    }
                })
                .collect();
            links.sort();
            (format!("{}{}", base, page), links)
        })
        .collect()
}

/// Counts GET requests received per path
async fn requests_by_path(server: &MockServer) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for request in server.received_requests().await.unwrap_or_default() {
        *counts.entry(request.url.path().to_string()).or_insert(0) += 1;
    }
    counts
}

#[tokio::test]
async fn test_three_page_cycle() {
    let server = MockServer::start().await;
    serve_page(&server, "/home", &["/about", "/contact"]).await;
    serve_page(&server, "/about", &["/home", "/contact"]).await;
    serve_page(&server, "/contact", &["/home", "/about"]).await;

    let results = crawl_site(&server, "/home", 4).await;

    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| r.is_success()));
    assert_eq!(
        site_map(&results),
        expected_map(
            &server,
            &[
                ("/home", &["/about", "/contact"]),
                ("/about", &["/home", "/contact"]),
                ("/contact", &["/home", "/about"]),
            ]
        )
    );
}

#[tokio::test]
async fn test_same_domain_absolute_link_is_followed() {
    let server = MockServer::start().await;
    let absolute = format!("{}/about", server.uri());
    serve_page(&server, "/home", &[absolute.as_str()]).await;
    serve_page(&server, "/about", &[]).await;

    let results = crawl_site(&server, "/home", 2).await;

    assert_eq!(
        site_map(&results),
        expected_map(&server, &[("/home", &["/about"]), ("/about", &[])])
    );
}

#[tokio::test]
async fn test_other_domains_are_listed_but_not_visited() {
    let server = MockServer::start().await;
    serve_page(
        &server,
        "/home",
        &[
            "https://example.com/something",
            "http://subdomain.localhost/something",
        ],
    )
    .await;

    let results = crawl_site(&server, "/home", 4).await;

    assert_eq!(
        site_map(&results),
        expected_map(
            &server,
            &[(
                "/home",
                &[
                    "https://example.com/something",
                    "http://subdomain.localhost/something",
                ],
            )]
        )
    );
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_trailing_slash_is_listed_but_visited_once() {
    let server = MockServer::start().await;
    serve_page(&server, "/home", &["/home/", "/about"]).await;
    serve_page(&server, "/about", &["/home"]).await;

    let results = crawl_site(&server, "/home", 4).await;

    assert_eq!(
        site_map(&results),
        expected_map(
            &server,
            &[("/home", &["/home/", "/about"]), ("/about", &["/home"])]
        )
    );

    let requests = requests_by_path(&server).await;
    assert_eq!(requests.get("/home"), Some(&1));
    assert_eq!(requests.get("/home/"), None);
}

#[tokio::test]
async fn test_nav_and_footer_links_visit_each_page_once() {
    let server = MockServer::start().await;
    let nav = ["/home", "/about", "/blog"];
    let with_footer = |extra: &[&'static str]| -> Vec<&'static str> {
        nav.iter().chain(extra.iter()).chain(nav.iter()).copied().collect()
    };

    let home = with_footer(&["/blog/first"]);
    let about = with_footer(&[]);
    let blog = with_footer(&["/blog/first", "/blog/second"]);
    serve_page(&server, "/home", &home).await;
    serve_page(&server, "/about", &about).await;
    serve_page(&server, "/blog", &blog).await;
    serve_page(&server, "/blog/first", &nav).await;
    serve_page(&server, "/blog/second", &nav).await;

    let results = crawl_site(&server, "/home", 8).await;

    assert_eq!(results.len(), 5);
    assert_eq!(
        site_map(&results),
        expected_map(
            &server,
            &[
                ("/home", &home),
                ("/about", &about),
                ("/blog", &blog),
                ("/blog/first", &nav),
                ("/blog/second", &nav),
            ]
        )
    );

    let requests = requests_by_path(&server).await;
    assert_eq!(requests.len(), 5);
    assert!(requests.values().all(|count| *count == 1));
}

#[tokio::test]
async fn test_anchors_are_listed_and_pages_merged() {
    let server = MockServer::start().await;
    serve_page(&server, "/home", &["/about#contact", "/about/#contact"]).await;
    serve_page(&server, "/about", &["#team"]).await;

    let results = crawl_site(&server, "/home", 4).await;

    assert_eq!(
        site_map(&results),
        expected_map(
            &server,
            &[
                ("/home", &["/about#contact", "/about/#contact"]),
                ("/about", &["/about#team"]),
            ]
        )
    );
    assert_eq!(requests_by_path(&server).await.get("/about"), Some(&1));
}

#[tokio::test]
async fn test_excluded_extensions_are_listed_but_not_fetched() {
    let server = MockServer::start().await;
    serve_page(&server, "/home", &["/something.pdf", "/something.mp3"]).await;

    let results = crawl_site(&server, "/home", 4).await;

    assert_eq!(
        site_map(&results),
        expected_map(&server, &[("/home", &["/something.pdf", "/something.mp3"])])
    );

    let requests = requests_by_path(&server).await;
    assert_eq!(requests.len(), 1);
    assert!(requests.contains_key("/home"));
}

#[tokio::test]
async fn test_missing_page_is_a_failure_and_crawl_continues() {
    let server = MockServer::start().await;
    serve_page(&server, "/home", &["/missing", "/about"]).await;
    serve_page(&server, "/about", &["/home"]).await;

    let results = crawl_site(&server, "/home", 4).await;

    assert_eq!(results.len(), 3);

    let failures: Vec<_> = results.iter().filter_map(|r| r.failure()).collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].page.as_str(), format!("{}/missing", server.uri()));
    assert!(matches!(
        failures[0].error,
        LinkFinderError::UnexpectedStatus { status: 404, .. }
    ));
}

#[tokio::test]
async fn test_server_error_start_page_ends_crawl() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/home"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let results = crawl_site(&server, "/home", 4).await;

    assert_eq!(results.len(), 1);
    assert!(matches!(
        results[0].failure().map(|f| &f.error),
        Some(LinkFinderError::UnexpectedStatus { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_malformed_link_is_dropped() {
    let server = MockServer::start().await;
    serve_page(
        &server,
        "/home",
        &["/before", "http://  example.com/some-link", "/after"],
    )
    .await;
    serve_page(&server, "/before", &[]).await;
    serve_page(&server, "/after", &[]).await;

    let results = crawl_site(&server, "/home", 4).await;

    assert_eq!(
        site_map(&results),
        expected_map(
            &server,
            &[
                ("/home", &["/before", "/after"]),
                ("/before", &[]),
                ("/after", &[]),
            ]
        )
    );
}

#[tokio::test]
async fn test_non_html_page_has_no_links() {
    let server = MockServer::start().await;
    serve_page(&server, "/home", &["/data"]).await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"href": "/hidden"}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let results = crawl_site(&server, "/home", 2).await;

    assert_eq!(
        site_map(&results),
        expected_map(&server, &[("/home", &["/data"]), ("/data", &[])])
    );
    assert!(results.iter().all(|r| r.is_success()));
}

#[tokio::test]
async fn test_relative_links_resolve_against_redirect_target() {
    let server = MockServer::start().await;
    serve_page(&server, "/home", &["/old"]).await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/docs/intro"))
        .mount(&server)
        .await;
    serve_page(&server, "/docs/intro", &["next"]).await;
    serve_page(&server, "/docs/next", &[]).await;

    let results = crawl_site(&server, "/home", 2).await;

    assert_eq!(
        site_map(&results),
        expected_map(
            &server,
            &[
                ("/home", &["/old"]),
                ("/old", &["/docs/next"]),
                ("/docs/next", &[]),
            ]
        )
    );
}

#[tokio::test]
async fn test_pool_size_does_not_change_results() {
    let server = MockServer::start().await;
    serve_page(&server, "/home", &["/a", "/b", "/c", "https://example.com/"]).await;
    serve_page(&server, "/a", &["/a/1", "/a/2", "/home"]).await;
    serve_page(&server, "/b", &["/b/1", "/a", "/b/1#top"]).await;
    serve_page(&server, "/c", &["/c/1/", "/missing", "/c.pdf"]).await;
    serve_page(&server, "/a/1", &["/a/2"]).await;
    serve_page(&server, "/a/2", &["/a/1", "/home"]).await;
    serve_page(&server, "/b/1", &[]).await;
    serve_page(&server, "/c/1", &["/c"]).await;

    let single = crawl_site(&server, "/home", 1).await;
    let pooled = crawl_site(&server, "/home", 8).await;

    assert_eq!(single.len(), 9);
    assert_eq!(site_map(&single), site_map(&pooled));
}

#[tokio::test]
async fn test_cancelled_token_is_rejected() {
    let server = MockServer::start().await;
    let cancel = CancellationToken::new();
    cancel.cancel();

    let start = Link::parse(&format!("{}/home", server.uri())).unwrap();
    let result = crawl(&create_test_config(2), start, cancel);

    assert!(matches!(result, Err(sitewalk::SitewalkError::Cancelled)));
}

#[tokio::test]
async fn test_crawl_recorded_to_sqlite() {
    let server = MockServer::start().await;
    serve_page(&server, "/home", &["/about", "/missing"]).await;
    serve_page(&server, "/about", &["/home", "https://example.com/"]).await;

    let dir = tempfile::TempDir::new().unwrap();
    let db_path = dir.path().join("crawl.db");
    let start_url = format!("{}/home", server.uri());

    let mut sink = SqliteSink::open(&db_path, &start_url, Some("hash")).unwrap();
    let mut stats = CrawlStatistics::new();
    let started_at = chrono::Utc::now();
    for result in crawl_site(&server, "/home", 4).await {
        stats.record(&result);
        sink.record(&result).unwrap();
    }
    sink.finish(&CrawlSummary {
        start_url: start_url.clone(),
        started_at,
        finished_at: chrono::Utc::now(),
        cancelled: false,
        config_hash: Some("hash".to_string()),
        stats,
    })
    .unwrap();
    let run_id = sink.run_id();
    drop(sink);

    let storage = SqliteStorage::new(&db_path).unwrap();
    let run = storage.get_run(run_id).unwrap();
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.start_url, start_url);
    assert_eq!(storage.count_pages(run_id).unwrap(), 3);
    assert_eq!(storage.count_failed_pages(run_id).unwrap(), 1);
    assert_eq!(storage.count_links(run_id).unwrap(), 4);
}
