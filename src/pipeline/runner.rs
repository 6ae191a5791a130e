//! The end-to-end pipeline behind each mode

use crate::config::{Config, Secrets};
use crate::crawler::{read_local_file, ContentKind, CrawlStep, Crawler, FetchError, Fetcher};
use crate::extract::{DocumentSource, Extraction, Extractor, TextRefiner};
use crate::output::{write_markdown_summary, RunSummary};
use crate::pipeline::Mode;
use crate::source::{append_url_list, list_local_pdfs, read_seed_file, PdfReference};
use crate::state::{FailureLog, VisitedSet};
use crate::storage::{open_sink, DocumentSink, StoreOutcome};
use crate::url::looks_like_pdf;
use crate::{Result, ScrapeError};
use std::fs;
use tracing::{debug, info, warn};

/// Runs one mode against a loaded configuration
pub struct Pipeline {
    config: Config,
    secrets: Secrets,
    config_hash: String,
}

/// Counters plus the failure log; shared by every mode
struct Ledger {
    summary: RunSummary,
    failures: FailureLog,
}

impl Ledger {
    fn fetch_failed(&mut self, error: &FetchError) -> Result<()> {
        self.summary.fetch_failed += 1;
        warn!("{}", error);
        self.failures
            .record(&error.url, &error.reason.to_string(), error.is_transient())?;
        Ok(())
    }
}

/// Extraction, optional refinement and storage of fetched content
struct Processor {
    extractor: Extractor,
    refiner: Option<TextRefiner>,
    sink: Box<dyn DocumentSink>,
}

impl Processor {
    /// Handles one fetched input
    ///
    /// Extraction failures are recorded and counted; only storage failures
    /// are returned as errors.
    async fn handle(
        &mut self,
        source: DocumentSource<'_>,
        kind: ContentKind,
        bytes: &[u8],
        ledger: &mut Ledger,
    ) -> Result<()> {
        let label = source.key();
        let (kind, mut extracted) = match self.extractor.extract_text(kind, bytes) {
            Ok(result) => result,
            Err(e) => {
                ledger.summary.extract_failed += 1;
                warn!("Could not extract text from {}: {}", label, e);
                ledger.failures.record(&label, &e.to_string(), false)?;
                return Ok(());
            }
        };

        if kind == ContentKind::Pdf {
            if let Some(refiner) = &self.refiner {
                match refiner.refine(&extracted.text).await {
                    Ok(refined) if !refined.is_empty() => extracted.text = refined,
                    Ok(_) => warn!(
                        "AI refinement of {} returned no text; keeping local text",
                        label
                    ),
                    Err(e) => warn!(
                        "AI refinement of {} failed: {}; keeping local text",
                        label, e
                    ),
                }
            }
        }

        match self.extractor.package(source, kind, extracted) {
            Extraction::Document(document) => {
                let outcome = self.sink.store(&document)?;
                ledger.summary.extracted += 1;
                info!(
                    "{} {} ({} words)",
                    match outcome {
                        StoreOutcome::Inserted => "Stored",
                        StoreOutcome::Replaced => "Replaced",
                    },
                    label,
                    document.metadata.metrics.words
                );
            }
            Extraction::TooShort { length } => {
                ledger.summary.skipped += 1;
                info!(
                    "Skipping {}: {} characters is below the minimum of {}",
                    label,
                    length,
                    self.extractor.min_text_length()
                );
            }
        }
        Ok(())
    }

    /// Records how many documents the sink holds once the mode is done
    fn record_total(&self, summary: &mut RunSummary) {
        match self.sink.count() {
            Ok(total) => summary.documents_total = Some(total),
            Err(e) => warn!("Could not count documents in {}: {}", self.sink.describe(), e),
        }
    }
}

impl Pipeline {
    pub fn new(config: Config, secrets: Secrets, config_hash: String) -> Self {
        Self {
            config,
            secrets,
            config_hash,
        }
    }

    /// Runs `mode` to completion and returns its summary
    ///
    /// Secrets the mode needs are checked before any network traffic. A run
    /// whose every fetch failed still returns its summary; see
    /// [`ensure_progress`].
    pub async fn run(&self, mode: Mode) -> Result<RunSummary> {
        let recipe = mode.recipe();
        self.prepare_directories()?;

        let mut ledger = Ledger {
            summary: RunSummary::new(mode, &self.config_hash),
            failures: FailureLog::open(&self.config.paths.failure_log)?,
        };

        let visited = VisitedSet::open(recipe.visited.path(&self.config.paths))?;
        info!(
            "Running {} ({} entries already in {})",
            mode,
            visited.len(),
            visited.path().display()
        );

        match mode {
            Mode::Scrape => {
                let mut processor = self.processor(&mut ledger.summary)?;
                self.scrape(visited, &mut processor, &mut ledger).await?;
                processor.record_total(&mut ledger.summary);
            }
            Mode::Pdf => {
                let mut processor = self.processor(&mut ledger.summary)?;
                self.scrape_pdfs(visited, &mut processor, &mut ledger).await?;
                processor.record_total(&mut ledger.summary);
            }
            Mode::Crawl => self.crawl(visited, None, &mut ledger).await?,
            Mode::CrawlAndScrape => {
                let mut processor = self.processor(&mut ledger.summary)?;
                self.crawl(visited, Some(&mut processor), &mut ledger).await?;
                processor.record_total(&mut ledger.summary);
            }
        }

        if ledger.failures.recorded() > 0 {
            info!(
                "{} failure(s) written to {}",
                ledger.failures.recorded(),
                self.config.paths.failure_log.display()
            );
        }

        let mut summary = ledger.summary;
        summary.finish();

        if let Some(path) = &self.config.output.summary_path {
            match write_markdown_summary(&summary, path) {
                Ok(()) => info!("Wrote run summary to {}", path.display()),
                Err(e) => warn!("Could not write run summary to {}: {}", path.display(), e),
            }
        }

        Ok(summary)
    }

    /// Opens the sink and, when enabled, the AI refiner
    fn processor(&self, summary: &mut RunSummary) -> Result<Processor> {
        let refiner = if self.config.ai.enabled {
            let key = self.secrets.require_ai_service()?;
            Some(TextRefiner::new(&self.config.ai, key)?)
        } else {
            None
        };
        let sink = open_sink(&self.config, &self.secrets)?;
        summary.sink = Some(sink.describe());

        Ok(Processor {
            extractor: Extractor::new(&self.config.extraction),
            refiner,
            sink,
        })
    }

    fn prepare_directories(&self) -> Result<()> {
        let paths = &self.config.paths;
        for dir in [paths.seed_file.parent(), Some(paths.pdf_dir.as_path())]
            .into_iter()
            .flatten()
            .filter(|dir| !dir.as_os_str().is_empty())
        {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    async fn scrape(
        &self,
        mut visited: VisitedSet,
        processor: &mut Processor,
        ledger: &mut Ledger,
    ) -> Result<()> {
        let seeds = read_seed_file(&self.config.paths.seed_file)?;
        ledger.summary.inputs = seeds.len();
        let fetcher = Fetcher::new(&self.config)?;

        for url in &seeds {
            if visited.contains(url.as_str()) {
                ledger.summary.already_visited += 1;
                debug!("Already scraped {}", url);
                continue;
            }

            match fetcher.fetch(url).await {
                Ok(content) => {
                    ledger.summary.fetched += 1;
                    processor
                        .handle(
                            DocumentSource::Url(url),
                            content.content_kind,
                            &content.bytes,
                            ledger,
                        )
                        .await?;
                    visited.insert(url.as_str())?;
                }
                Err(e) => ledger.fetch_failed(&e)?,
            }
        }
        Ok(())
    }

    async fn scrape_pdfs(
        &self,
        mut visited: VisitedSet,
        processor: &mut Processor,
        ledger: &mut Ledger,
    ) -> Result<()> {
        let references = self.pdf_references()?;
        ledger.summary.inputs = references.len();
        let fetcher = Fetcher::new(&self.config)?;

        for reference in &references {
            let key = reference.key();
            if visited.contains(&key) {
                ledger.summary.already_visited += 1;
                debug!("Already extracted {}", reference);
                continue;
            }

            let fetched = match reference {
                PdfReference::Local(path) => read_local_file(path).await,
                PdfReference::Remote(url) => fetcher.fetch(url).await.map(|content| content.bytes),
            };
            let bytes = match fetched {
                Ok(bytes) => bytes,
                Err(e) => {
                    ledger.fetch_failed(&e)?;
                    continue;
                }
            };

            ledger.summary.fetched += 1;
            let source = match reference {
                PdfReference::Local(path) => DocumentSource::File(path),
                PdfReference::Remote(url) => DocumentSource::Url(url),
            };
            processor
                .handle(source, ContentKind::Pdf, &bytes, ledger)
                .await?;
            visited.insert(&key)?;
        }
        Ok(())
    }

    /// Local PDFs in file-name order, then PDF seeds in file order
    ///
    /// The seed file is optional in this mode.
    fn pdf_references(&self) -> Result<Vec<PdfReference>> {
        let paths = &self.config.paths;
        let mut references: Vec<PdfReference> = list_local_pdfs(&paths.pdf_dir)?
            .into_iter()
            .map(PdfReference::Local)
            .collect();

        if paths.seed_file.exists() {
            references.extend(
                read_seed_file(&paths.seed_file)?
                    .into_iter()
                    .filter(looks_like_pdf)
                    .map(PdfReference::Remote),
            );
        }

        if references.is_empty() {
            warn!(
                "No PDFs found in {} or {}",
                paths.pdf_dir.display(),
                paths.seed_file.display()
            );
        }
        Ok(references)
    }

    /// Breadth-first crawl from the seeds
    ///
    /// With a processor every fetched page is extracted before it is marked
    /// visited. Without one, the fetched URLs and every discovered URL left
    /// unfetched (by the page limit or `max-depth`) are appended to the
    /// discovered list for a later scrape.
    async fn crawl(
        &self,
        visited: VisitedSet,
        mut processor: Option<&mut Processor>,
        ledger: &mut Ledger,
    ) -> Result<()> {
        let seeds = read_seed_file(&self.config.paths.seed_file)?;
        ledger.summary.inputs = seeds.len();

        let fetcher = Fetcher::new(&self.config)?;
        let mut crawler = Crawler::new(&self.config, fetcher, visited, &seeds);
        let mut discovered = Vec::new();

        while let Some(step) = crawler.next_page().await {
            match step {
                CrawlStep::Page(page) => {
                    ledger.summary.fetched += 1;
                    debug!(
                        "Crawled {} (depth {}, {} new links, {} queued)",
                        page.entry.url,
                        page.entry.depth,
                        page.new_links,
                        crawler.queued()
                    );
                    if let Some(processor) = processor.as_deref_mut() {
                        processor
                            .handle(
                                DocumentSource::Url(&page.entry.url),
                                page.content.content_kind,
                                &page.content.bytes,
                                ledger,
                            )
                            .await?;
                    }
                    crawler.mark_visited(&page)?;
                    discovered.push(page.entry.url);
                }
                CrawlStep::Failed { error, .. } => ledger.fetch_failed(&error)?,
            }
        }

        let unfetched = crawler.drain_frontier();
        let stats = crawler.stats();
        info!(
            "Crawl finished after {} attempt(s): {} link(s) queued, {} left unfetched",
            stats.attempts,
            stats.links_enqueued,
            unfetched.len()
        );
        if stats.beyond_depth > 0 {
            info!("{} link(s) lay past max-depth", stats.beyond_depth);
        }

        discovered.extend(unfetched);
        ledger.summary.already_visited = stats.seeds_skipped;
        ledger.summary.robots_blocked = stats.robots_blocked;
        ledger.summary.discovered = Some(discovered.len());

        if processor.is_none() {
            let path = &self.config.paths.discovered_file;
            let added = append_url_list(path, &discovered)?;
            info!("Added {} URL(s) to {}", added, path.display());
        }
        Ok(())
    }
}

/// Fails a run in which fetches were attempted and none succeeded
pub fn ensure_progress(summary: &RunSummary) -> Result<()> {
    let attempted = summary.attempted();
    if attempted > 0 && summary.fetched == 0 {
        return Err(ScrapeError::AllSeedsFailed { attempted });
    }
    Ok(())
}
