//! Shared fixtures for the integration tests

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::fs;
use std::path::Path;
use uniscrape::Config;
use wiremock::ResponseTemplate;

/// Configuration rooted in `dir`, with politeness delays and robots.txt off
pub fn test_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.crawler.request_delay = 0;
    config.crawler.respect_robots_txt = false;
    config.crawler.max_pages = Some(20);
    config.fetcher.max_retries = 0;
    config.fetcher.timeout = 5;
    config.user_agent.crawler_name = "TestBot".to_string();
    config.extraction.min_text_length = 20;
    config.paths.seed_file = dir.join("to_scrape/urls_to_scrape.csv");
    config.paths.pdf_dir = dir.join("to_scrape/pdfs");
    config.paths.visited_file = dir.join("visited/visited_urls.csv");
    config.paths.crawled_file = dir.join("visited/crawled_urls.csv");
    config.paths.visited_pdfs_file = dir.join("visited/visited_pdfs.csv");
    config.paths.discovered_file = dir.join("to_scrape/discovered_urls.csv");
    config.paths.failure_log = dir.join("logs/failed_urls.tsv");
    config.paths.log_file = dir.join("logs/app_log.log");
    config.output.documents_dir = dir.join("output/documents");
    config
}

/// Writes a seed file with a header row followed by `lines`
pub fn write_seeds(config: &Config, lines: &[String]) {
    let path = &config.paths.seed_file;
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, format!("url\n{}\n", lines.join("\n"))).unwrap();
}

/// An HTML page whose body is a paragraph of `text` plus links to `links`
pub fn html_page(title: &str, text: &str, links: &[String]) -> ResponseTemplate {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">next</a>"#, href))
        .collect();
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html; charset=utf-8")
        .set_body_string(format!(
            "<html><head><title>{}</title></head>\
             <body><article><p>{}</p>{}</article></body></html>",
            title, text, anchors
        ))
}

/// Number of JSON documents written by the file sink
pub fn document_count(config: &Config) -> usize {
    match fs::read_dir(&config.output.documents_dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map_or(false, |ext| ext == "json"))
            .count(),
        Err(_) => 0,
    }
}

/// A minimal PDF with one text line per page
pub fn sample_pdf(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let kids: Vec<Object> = pages
        .iter()
        .map(|text| {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 11.into()]),
                    Operation::new("Td", vec![50.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let stream = Stream::new(dictionary! {}, content.encode().unwrap());
            let content_id = doc.add_object(stream);
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
            })
            .into()
        })
        .collect();

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}
