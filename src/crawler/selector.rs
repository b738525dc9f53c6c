use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::{Arc, LazyLock};
use tokio::{sync::Semaphore, task::JoinSet};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use super::Crawler;
use crate::config::CrawlSettings;
use crate::fetcher::HttpFetcher;
use crate::ingest::VisitedSet;

static ANCHOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// Crawler that follows links found inside configured containers of each seed.
pub struct SelectorCrawler {
    fetcher: HttpFetcher,
    settings: CrawlSettings,
}

impl SelectorCrawler {
    pub fn new(fetcher: HttpFetcher, settings: CrawlSettings) -> Self {
        Self { fetcher, settings }
    }
}

#[async_trait]
impl Crawler for SelectorCrawler {
    #[instrument(skip_all, fields(seeds = seeds.len()))]
    async fn crawl(&self, seeds: &[String], exclude: &VisitedSet) -> BTreeMap<String, String> {
        let mut candidates = BTreeSet::new();
        for seed in seeds {
            let page = match self.fetcher.fetch(seed).await {
                Ok(page) => page,
                Err(e) => {
                    warn!(seed = %seed, error = %e, "Failed to fetch seed page");
                    continue;
                }
            };
            let links = discover_links(&page.body_utf8, &page.url_final, &self.settings);
            debug!(seed = %seed, links = links.len(), "Discovered links");
            candidates.extend(links.into_iter().map(String::from));
        }

        let seed_urls: HashSet<&str> = seeds.iter().map(String::as_str).collect();
        candidates.retain(|url| !exclude.contains(url) && !seed_urls.contains(url.as_str()));
        info!(candidates = candidates.len(), "Fetching candidate pages");

        let semaphore = Arc::new(Semaphore::new(self.settings.concurrency.max(1)));
        let mut tasks = JoinSet::new();
        for url in candidates {
            let fetcher = self.fetcher.clone();
            let semaphore = semaphore.clone();
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                let result = fetcher.fetch(&url).await;
                (url, result)
            });
        }

        let mut pages = BTreeMap::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((url, Ok(page))) => {
                    debug!(
                        url = %url,
                        final_url = %page.url_final,
                        encoding = page.encoding.name(),
                        bytes = page.body_utf8.len(),
                        "Fetched candidate page"
                    );
                    pages.insert(url, page.body_utf8);
                }
                Ok((url, Err(e))) => warn!(url = %url, error = %e, "Failed to fetch page"),
                Err(e) => error!(error = %e, "Fetch task failed"),
            }
        }
        pages
    }
}

/// Collect the article links on one index page.
///
/// A link qualifies when it sits inside an element carrying one of the
/// configured classes or ids (anywhere, when none are configured), resolves
/// to an http(s) URL, and its URL or anchor text contains one of the
/// configured patterns (any link, when none are configured). Fragments are
/// dropped and results are deduplicated in document order.
pub fn discover_links(html: &str, base: &Url, settings: &CrawlSettings) -> Vec<Url> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for anchor in document.select(&ANCHOR_SELECTOR) {
        if !inside_container(anchor, settings) {
            continue;
        }
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Ok(mut url) = base.join(href.trim()) else {
            continue;
        };
        if !matches!(url.scheme(), "http" | "https") {
            continue;
        }
        url.set_fragment(None);

        let text = anchor.text().collect::<String>();
        if !matches_patterns(url.as_str(), &text, settings) {
            continue;
        }
        if seen.insert(url.to_string()) {
            links.push(url);
        }
    }
    links
}

fn inside_container(anchor: ElementRef<'_>, settings: &CrawlSettings) -> bool {
    if settings.classes.is_empty() && settings.ids.is_empty() {
        return true;
    }
    std::iter::once(anchor)
        .chain(anchor.ancestors().filter_map(ElementRef::wrap))
        .any(|element| {
            let element = element.value();
            element
                .classes()
                .any(|class| settings.classes.iter().any(|c| c == class))
                || element
                    .id()
                    .is_some_and(|id| settings.ids.iter().any(|i| i == id))
        })
}

fn matches_patterns(url: &str, text: &str, settings: &CrawlSettings) -> bool {
    if settings.url_patterns.is_empty() && settings.link_text_patterns.is_empty() {
        return true;
    }
    let url = url.to_lowercase();
    let text = text.to_lowercase();
    settings
        .url_patterns
        .iter()
        .any(|p| url.contains(&p.to_lowercase()))
        || settings
            .link_text_patterns
            .iter()
            .any(|p| text.contains(&p.to_lowercase()))
}
