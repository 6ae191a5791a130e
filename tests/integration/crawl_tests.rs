//! Integration tests for the crawler and the crawl modes
//!
//! These tests use wiremock to serve small linked sites and check traversal
//! order, persistence across runs and robots.txt handling end-to-end.

use crate::common::{document_count, html_page, test_config, write_seeds};
use std::fs;
use tempfile::TempDir;
use uniscrape::config::Secrets;
use uniscrape::crawler::{CrawlStep, Crawler, Fetcher};
use uniscrape::{Mode, Pipeline, VisitedSet};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FILLER: &str = "Students may apply for the scholarship until the end of October.";

async fn request_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|request| request.url.path().to_string())
        .collect()
}

#[tokio::test]
async fn test_frontier_is_breadth_first() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html_page("A", FILLER, &[format!("{}/c", base)]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html_page("B", FILLER, &["/d".to_string()]))
        .mount(&server)
        .await;
    for page in ["/c", "/d"] {
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(html_page(page, FILLER, &[]))
            .mount(&server)
            .await;
    }

    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());
    let seeds = vec![
        url::Url::parse(&format!("{}/a", base)).unwrap(),
        url::Url::parse(&format!("{}/b", base)).unwrap(),
    ];

    let fetcher = Fetcher::new(&config).unwrap();
    let visited = VisitedSet::open(&config.paths.crawled_file).unwrap();
    let mut crawler = Crawler::new(&config, fetcher, visited, &seeds);

    let mut order = Vec::new();
    while let Some(step) = crawler.next_page().await {
        match step {
            CrawlStep::Page(page) => {
                order.push(page.entry.url.path().to_string());
                crawler.mark_visited(&page).unwrap();
            }
            CrawlStep::Failed { error, .. } => panic!("unexpected failure: {}", error),
        }
    }

    assert_eq!(order, vec!["/a", "/b", "/c", "/d"]);
    assert_eq!(request_paths(&server).await, vec!["/a", "/b", "/c", "/d"]);
    assert_eq!(crawler.stats().attempts, 4);
}

#[tokio::test]
async fn test_crawl_and_scrape_persists_and_resumes() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/a.html"))
        .respond_with(html_page("Page A", FILLER, &["b.html".to_string()]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b.html"))
        .respond_with(html_page("Page B", FILLER, &[]))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());
    write_seeds(&config, &[format!("{}/a.html", base)]);

    let pipeline = Pipeline::new(config.clone(), Secrets::default(), "test".into());
    let summary = pipeline.run(Mode::CrawlAndScrape).await.unwrap();

    assert_eq!(summary.fetched, 2);
    assert_eq!(summary.extracted, 2);
    assert_eq!(summary.discovered, Some(2));
    assert_eq!(document_count(&config), 2);

    let visited = VisitedSet::open(&config.paths.visited_file).unwrap();
    assert_eq!(visited.len(), 2);
    assert!(visited.contains(&format!("{}/b.html", base)));

    let requests_before = request_paths(&server).await.len();
    let again = pipeline.run(Mode::CrawlAndScrape).await.unwrap();
    assert_eq!(again.fetched, 0);
    assert_eq!(again.already_visited, 1);
    assert_eq!(request_paths(&server).await.len(), requests_before);
    assert_eq!(document_count(&config), 2);
}

#[tokio::test]
async fn test_crawl_writes_discovered_list_without_documents() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            "Home",
            FILLER,
            &["/news".to_string(), "mailto:office@example.edu".to_string()],
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/news"))
        .respond_with(html_page("News", FILLER, &[]))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());
    write_seeds(&config, &[format!("{}/", base)]);

    let pipeline = Pipeline::new(config.clone(), Secrets::default(), "test".into());
    let summary = pipeline.run(Mode::Crawl).await.unwrap();

    assert_eq!(summary.discovered, Some(2));
    assert_eq!(summary.extracted, 0);
    assert_eq!(document_count(&config), 0);

    let discovered = fs::read_to_string(&config.paths.discovered_file).unwrap();
    assert!(discovered.starts_with("url\n"));
    assert!(discovered.contains(&format!("{}/news", base)));

    // Crawling alone must not hide pages from a later scrape
    let scraped = VisitedSet::open(&config.paths.visited_file).unwrap();
    assert!(scraped.is_empty());
    let crawled = VisitedSet::open(&config.paths.crawled_file).unwrap();
    assert_eq!(crawled.len(), 2);
}

#[tokio::test]
async fn test_robots_txt_blocks_disallowed_paths() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/plain")
                .set_body_string("User-agent: *\nDisallow: /private\n"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            "Home",
            FILLER,
            &["/private/grades".to_string(), "/public".to_string()],
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/public"))
        .respond_with(html_page("Public", FILLER, &[]))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = test_config(dir.path());
    config.crawler.respect_robots_txt = true;
    write_seeds(&config, &[format!("{}/", base)]);

    let pipeline = Pipeline::new(config, Secrets::default(), "test".into());
    let summary = pipeline.run(Mode::Crawl).await.unwrap();

    assert_eq!(summary.fetched, 2);
    assert_eq!(summary.robots_blocked, 1);
    let paths = request_paths(&server).await;
    assert!(!paths.iter().any(|p| p.starts_with("/private")));
    assert_eq!(paths.iter().filter(|p| *p == "/robots.txt").count(), 1);
}

#[tokio::test]
async fn test_depth_and_domain_limits() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            "Home",
            FILLER,
            &[
                "/level1".to_string(),
                "https://elsewhere.example.org/".to_string(),
            ],
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/level1"))
        .respond_with(html_page("Level 1", FILLER, &["/level2".to_string()]))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = test_config(dir.path());
    config.crawler.max_depth = Some(1);
    write_seeds(&config, &[format!("{}/", base)]);

    let pipeline = Pipeline::new(config.clone(), Secrets::default(), "test".into());
    let summary = pipeline.run(Mode::Crawl).await.unwrap();

    assert_eq!(summary.fetched, 2);
    assert_eq!(request_paths(&server).await, vec!["/", "/level1"]);

    // The link past max-depth is recorded for a later scrape, the foreign one is not
    assert_eq!(summary.discovered, Some(3));
    let discovered = fs::read_to_string(&config.paths.discovered_file).unwrap();
    assert!(discovered.contains(&format!("{}/level2", base)));
    assert!(!discovered.contains("elsewhere.example.org"));
}

#[tokio::test]
async fn test_page_limit_counts_failed_attempts() {
    let server = MockServer::start().await;
    let base = server.uri();

    let links: Vec<String> = (1..=5).map(|n| format!("/p{}", n)).collect();
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page("Home", FILLER, &links))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/p1"))
        .respond_with(html_page("P1", FILLER, &[]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/p2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    for page in ["/p3", "/p4", "/p5"] {
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(html_page(page, FILLER, &[]))
            .expect(0)
            .mount(&server)
            .await;
    }

    let dir = TempDir::new().unwrap();
    let mut config = test_config(dir.path());
    config.crawler.max_pages = Some(3);
    write_seeds(&config, &[format!("{}/", base)]);

    let pipeline = Pipeline::new(config.clone(), Secrets::default(), "test".into());
    let summary = pipeline.run(Mode::Crawl).await.unwrap();

    assert_eq!(request_paths(&server).await, vec!["/", "/p1", "/p2"]);
    assert_eq!(summary.fetched, 2);
    assert_eq!(summary.fetch_failed, 1);

    // Fetched pages plus the queue the limit left behind; the failed page is retried later
    assert_eq!(summary.discovered, Some(5));
    let discovered = fs::read_to_string(&config.paths.discovered_file).unwrap();
    for page in ["/p1", "/p3", "/p4", "/p5"] {
        assert!(discovered.contains(&format!("{}{}\n", base, page)), "{}", page);
    }
    assert!(!discovered.contains("/p2"));
}

#[tokio::test]
async fn test_failed_page_does_not_stop_traversal() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            "Home",
            FILLER,
            &["/broken".to_string(), "/fine".to_string()],
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fine"))
        .respond_with(html_page("Fine", FILLER, &[]))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());
    write_seeds(&config, &[format!("{}/", base)]);

    let pipeline = Pipeline::new(config.clone(), Secrets::default(), "test".into());
    let summary = pipeline.run(Mode::CrawlAndScrape).await.unwrap();

    assert_eq!(summary.fetched, 2);
    assert_eq!(summary.fetch_failed, 1);
    assert_eq!(document_count(&config), 2);

    let log = fs::read_to_string(&config.paths.failure_log).unwrap();
    assert!(log.contains("/broken"));
    assert!(log.contains("transient"));
}
