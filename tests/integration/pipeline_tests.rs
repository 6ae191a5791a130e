//! Integration tests for the scrape and pdf modes and the document sinks

use crate::common::{document_count, html_page, sample_pdf, test_config, write_seeds};
use std::fs;
use tempfile::TempDir;
use uniscrape::config::{Secrets, SinkKind};
use uniscrape::extract::Document;
use uniscrape::pipeline::ensure_progress;
use uniscrape::storage::{DocumentSink, SqliteDocumentStore};
use uniscrape::{Mode, Pipeline, ScrapeError, VisitedSet};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEXT: &str = "The rector announced new admission rules for the coming academic year.";

fn read_documents(dir: &std::path::Path) -> Vec<Document> {
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| {
            let content = fs::read_to_string(entry.unwrap().path()).unwrap();
            serde_json::from_str(&content).unwrap()
        })
        .collect()
}

#[tokio::test]
async fn test_scrape_skips_malformed_seed_lines() {
    let server = MockServer::start().await;
    let base = server.uri();

    for page in ["/first", "/second"] {
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(html_page(page, TEXT, &["/never-followed".to_string()]))
            .mount(&server)
            .await;
    }

    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());
    write_seeds(
        &config,
        &[
            format!("{}/first", base),
            "definitely not a url".to_string(),
            format!("{}/second,News page", base),
        ],
    );

    let pipeline = Pipeline::new(config.clone(), Secrets::default(), "test".into());
    let summary = pipeline.run(Mode::Scrape).await.unwrap();

    assert_eq!(summary.inputs, 2);
    assert_eq!(summary.fetched, 2);
    assert_eq!(summary.extracted, 2);
    assert_eq!(summary.discovered, None);
    assert_eq!(document_count(&config), 2);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_scraped_document_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admissions"))
        .respond_with(html_page("Admissions 2026", TEXT, &[]))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());
    let seed = format!("{}/admissions", server.uri());
    write_seeds(&config, &[seed.clone()]);

    let pipeline = Pipeline::new(config.clone(), Secrets::default(), "test".into());
    pipeline.run(Mode::Scrape).await.unwrap();

    let documents = read_documents(&config.output.documents_dir);
    assert_eq!(documents.len(), 1);
    let document = &documents[0];
    assert_eq!(document.metadata.title, "Admissions 2026");
    assert_eq!(document.metadata.source, seed);
    assert_eq!(document.metadata.kind, "html");
    assert_eq!(document.metadata.language, "pl");
    assert_eq!(document.content, TEXT);
    assert_eq!(document.metadata.metrics.words, 11);
}

#[tokio::test]
async fn test_all_seeds_failing_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());
    write_seeds(
        &config,
        &[format!("{}/gone", server.uri()), format!("{}/also-gone", server.uri())],
    );

    let pipeline = Pipeline::new(config, Secrets::default(), "test".into());
    let summary = pipeline.run(Mode::Scrape).await.unwrap();

    assert_eq!(summary.fetch_failed, 2);
    assert!(matches!(
        ensure_progress(&summary),
        Err(ScrapeError::AllSeedsFailed { attempted: 2 })
    ));
}

#[tokio::test]
async fn test_pdf_mode_local_and_remote() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/statute.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/pdf")
                .set_body_bytes(sample_pdf(&["Statute of the university, chapter one"])),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());
    fs::create_dir_all(&config.paths.pdf_dir).unwrap();
    fs::write(
        config.paths.pdf_dir.join("calendar.pdf"),
        sample_pdf(&["Academic calendar", "Winter session starts in January"]),
    )
    .unwrap();
    fs::write(config.paths.pdf_dir.join("notes.txt"), "ignored").unwrap();

    let remote = format!("{}/files/statute.pdf", server.uri());
    write_seeds(
        &config,
        &[remote.clone(), format!("{}/index.html", server.uri())],
    );

    let pipeline = Pipeline::new(config.clone(), Secrets::default(), "test".into());
    let summary = pipeline.run(Mode::Pdf).await.unwrap();

    assert_eq!(summary.inputs, 2);
    assert_eq!(summary.extracted, 2);

    let documents = read_documents(&config.output.documents_dir);
    assert!(documents.iter().all(|d| d.metadata.kind == "pdf"));
    let calendar = documents
        .iter()
        .find(|d| d.content.contains("Winter session"))
        .unwrap();
    assert_eq!(calendar.metadata.title, "calendar");

    let visited = VisitedSet::open(&config.paths.visited_pdfs_file).unwrap();
    assert!(visited.contains("calendar.pdf"));
    assert!(visited.contains(&remote));

    let again = pipeline.run(Mode::Pdf).await.unwrap();
    assert_eq!(again.already_visited, 2);
    assert_eq!(again.fetched, 0);
}

#[tokio::test]
async fn test_corrupt_pdf_is_logged_and_skipped() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());
    fs::create_dir_all(&config.paths.pdf_dir).unwrap();
    fs::write(config.paths.pdf_dir.join("broken.pdf"), b"<html>not a pdf</html>").unwrap();

    let pipeline = Pipeline::new(config.clone(), Secrets::default(), "test".into());
    let summary = pipeline.run(Mode::Pdf).await.unwrap();

    assert_eq!(summary.fetched, 1);
    assert_eq!(summary.extract_failed, 1);
    assert_eq!(document_count(&config), 0);
    let log = fs::read_to_string(&config.paths.failure_log).unwrap();
    assert!(log.contains("broken.pdf"));
}

#[tokio::test]
async fn test_database_sink_upserts_by_source() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html_page("About", TEXT, &[]))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = test_config(dir.path());
    config.output.sink = SinkKind::Database;
    config.output.summary_path = Some(dir.path().join("reports/summary.md"));
    write_seeds(&config, &[format!("{}/about", server.uri())]);

    let db_path = dir.path().join("documents.sqlite3");
    let location = db_path.display().to_string();
    let secrets = Secrets::from_lookup(|key| {
        (key == "DOCUMENT_STORE_KEY").then(|| location.clone())
    });

    let pipeline = Pipeline::new(config.clone(), secrets.clone(), "test".into());
    let summary = pipeline.run(Mode::Scrape).await.unwrap();
    assert_eq!(summary.extracted, 1);
    assert!(summary.sink.unwrap().contains("SQLite"));

    // A fresh visited record forces a second fetch of the same source
    fs::remove_file(&config.paths.visited_file).unwrap();
    let pipeline = Pipeline::new(config.clone(), secrets, "test".into());
    let again = pipeline.run(Mode::Scrape).await.unwrap();
    assert_eq!(again.extracted, 1);
    assert_eq!(again.documents_total, Some(1));

    let store = SqliteDocumentStore::open(&db_path).unwrap();
    assert_eq!(store.count().unwrap(), 1);
    assert_eq!(document_count(&config), 0);

    let report = fs::read_to_string(dir.path().join("reports/summary.md")).unwrap();
    assert!(report.contains("# UniScrape Run Summary (scrape)"));
    assert!(report.contains("| Documents in sink | 1 |"));
}
