use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

use super::timing::{Clock, Sleeper, SystemClock, TokioSleeper};
use super::upsert::{UpsertEngine, UpsertOutcome};
use super::visited::VisitedSet;
use crate::classifier::{Classifier, ClassifierError, parse_classification};
use crate::config::Config;
use crate::crawler::Crawler;
use crate::extractor::extract;
use crate::fingerprint::fingerprint;
use crate::items::RecordSnapshot;
use crate::repositories::{EventStore, StoreError};

/// Characters of an unparseable classifier response kept in the log.
const LOGGED_RESPONSE_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestSettings {
    pub seeds: Vec<String>,
    pub max_page_bytes: usize,
    pub classify_delay: Duration,
    pub rescan_interval: Duration,
    pub call_timeout: Duration,
}

impl From<&Config> for IngestSettings {
    fn from(config: &Config) -> Self {
        Self {
            seeds: config.crawl().seeds.clone(),
            max_page_bytes: config.max_page_bytes(),
            classify_delay: config.classify_delay(),
            rescan_interval: config.rescan_interval(),
            call_timeout: config.call_timeout(),
        }
    }
}

/// What happened to a single crawled page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    SkippedVisited,
    Oversized,
    ExtractFailed,
    ClassifierFailed,
    Unparseable,
    Rejected,
    Created,
    Updated,
    StoreFailed,
}

/// Per-pass tally of page outcomes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PassReport {
    pub skipped_visited: usize,
    pub oversized: usize,
    pub extract_failed: usize,
    pub classifier_failed: usize,
    pub unparseable: usize,
    pub rejected: usize,
    pub created: usize,
    pub updated: usize,
    pub store_failed: usize,
}

impl PassReport {
    pub fn record(&mut self, outcome: PageOutcome) {
        let counter = match outcome {
            PageOutcome::SkippedVisited => &mut self.skipped_visited,
            PageOutcome::Oversized => &mut self.oversized,
            PageOutcome::ExtractFailed => &mut self.extract_failed,
            PageOutcome::ClassifierFailed => &mut self.classifier_failed,
            PageOutcome::Unparseable => &mut self.unparseable,
            PageOutcome::Rejected => &mut self.rejected,
            PageOutcome::Created => &mut self.created,
            PageOutcome::Updated => &mut self.updated,
            PageOutcome::StoreFailed => &mut self.store_failed,
        };
        *counter += 1;
    }

    pub fn total(&self) -> usize {
        self.skipped_visited
            + self.oversized
            + self.extract_failed
            + self.classifier_failed
            + self.unparseable
            + self.rejected
            + self.created
            + self.updated
            + self.store_failed
    }
}

/// The polling loop: crawl, extract, classify, upsert, wait.
///
/// Owns the visited-URL set. Nothing else mutates it, so a single pass runs
/// pages strictly one after another.
pub struct Ingestor {
    visited: VisitedSet,
    upsert: UpsertEngine,
    store: Arc<dyn EventStore>,
    crawler: Arc<dyn Crawler>,
    classifier: Arc<dyn Classifier>,
    sleeper: Arc<dyn Sleeper>,
    snapshot: Arc<RecordSnapshot>,
    settings: IngestSettings,
}

impl Ingestor {
    pub fn new(
        store: Arc<dyn EventStore>,
        crawler: Arc<dyn Crawler>,
        classifier: Arc<dyn Classifier>,
        snapshot: Arc<RecordSnapshot>,
        settings: IngestSettings,
    ) -> Self {
        Self {
            visited: VisitedSet::new(),
            upsert: UpsertEngine::new(store.clone(), Arc::new(SystemClock)),
            store,
            crawler,
            classifier,
            sleeper: Arc::new(TokioSleeper),
            snapshot,
            settings,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.upsert = UpsertEngine::new(self.store.clone(), clock);
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    /// Seed the visited set and the read snapshot from what is already stored.
    ///
    /// Returns the number of records found.
    pub async fn bootstrap(&mut self) -> Result<usize, StoreError> {
        let records = self.store.list().await?;
        for record in &records {
            self.visited.insert(record.ref_url.as_str());
        }
        let count = records.len();
        self.snapshot.replace(records);

        info!(records = count, visited = self.visited.len(), "Bootstrapped from store");
        Ok(count)
    }

    /// Run passes until `shutdown` fires, sleeping the rescan interval in between.
    pub async fn run(mut self, shutdown: CancellationToken) {
        info!(
            seeds = self.settings.seeds.len(),
            rescan_secs = self.settings.rescan_interval.as_secs(),
            "Starting ingest loop"
        );

        loop {
            let span = info_span!("pass", id = %Uuid::new_v4());
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = self.run_pass().instrument(span) => {}
            }

            let sleeper = self.sleeper.clone();
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = sleeper.sleep(self.settings.rescan_interval) => {}
            }
        }

        info!("Ingest loop stopped");
    }

    /// Crawl once and process every returned page.
    pub async fn run_pass(&mut self) -> PassReport {
        let pages = self.crawler.crawl(&self.settings.seeds, &self.visited).await;
        info!(pages = pages.len(), "Crawl finished");

        let mut report = PassReport::default();
        for (url, html) in &pages {
            let span = info_span!("page", url = %url);
            let outcome = self.process_page(url, html).instrument(span).await;
            report.record(outcome);
        }

        self.refresh_snapshot().await;
        info!(
            created = report.created,
            updated = report.updated,
            failed = report.extract_failed + report.classifier_failed + report.unparseable + report.store_failed,
            rejected = report.rejected,
            "Pass finished"
        );
        report
    }

    /// Handle one crawled page end to end.
    ///
    /// The URL is marked visited first, so a page that fails anywhere below is
    /// not retried for the lifetime of the process.
    pub async fn process_page(&mut self, url: &str, html: &str) -> PageOutcome {
        if !self.visited.insert(url) {
            debug!("Already visited");
            return PageOutcome::SkippedVisited;
        }

        if html.len() > self.settings.max_page_bytes {
            warn!(bytes = html.len(), limit = self.settings.max_page_bytes, "Skipping oversized page");
            return PageOutcome::Oversized;
        }

        let text = match extract(html) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Failed to extract text");
                return PageOutcome::ExtractFailed;
            }
        };
        debug!(chars = text.len(), "Extracted text");

        let outcome = self.classify_and_store(url, &text).await;

        // Pacing applies to every page that reached the classifier
        if !self.settings.classify_delay.is_zero() {
            self.sleeper.sleep(self.settings.classify_delay).await;
        }
        outcome
    }

    async fn classify_and_store(&self, url: &str, text: &str) -> PageOutcome {
        let response = match timeout(self.settings.call_timeout, self.classifier.classify(text)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                warn!(error = %e, "Classifier call failed");
                return PageOutcome::ClassifierFailed;
            }
            Err(_) => {
                warn!(error = %ClassifierError::Timeout, "Classifier call failed");
                return PageOutcome::ClassifierFailed;
            }
        };

        let classification = match parse_classification(&response) {
            Ok(classification) => classification,
            Err(e) => {
                let excerpt: String = response.chars().take(LOGGED_RESPONSE_CHARS).collect();
                warn!(error = %e, response = %excerpt, "Unparseable classifier response");
                return PageOutcome::Unparseable;
            }
        };

        let draft = match classification.into_draft(url) {
            Ok(draft) => draft,
            Err(reason) => {
                info!(%reason, "Discarding classification");
                return PageOutcome::Rejected;
            }
        };

        let id = match fingerprint(draft.magnitude, &draft.location, &draft.date) {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "Discarding classification");
                return PageOutcome::Rejected;
            }
        };

        match timeout(self.settings.call_timeout, self.upsert.upsert(&id, &draft)).await {
            Ok(Ok(UpsertOutcome::Created)) => PageOutcome::Created,
            Ok(Ok(UpsertOutcome::Updated | UpsertOutcome::UpdatedAfterRace)) => PageOutcome::Updated,
            Ok(Err(e)) => {
                error!(id = %id, error = %e, "Failed to store event");
                PageOutcome::StoreFailed
            }
            Err(_) => {
                error!(id = %id, error = %StoreError::Timeout, "Failed to store event");
                PageOutcome::StoreFailed
            }
        }
    }

    async fn refresh_snapshot(&self) {
        match timeout(self.settings.call_timeout, self.store.list()).await {
            Ok(Ok(records)) => {
                debug!(records = records.len(), "Refreshed read snapshot");
                self.snapshot.replace(records);
            }
            Ok(Err(e)) => warn!(error = %e, "Failed to refresh read snapshot"),
            Err(_) => warn!(error = %StoreError::Timeout, "Failed to refresh read snapshot"),
        }
    }
}
