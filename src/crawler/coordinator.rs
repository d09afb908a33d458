//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator drives the traversal in rounds:
//! 1. Claim up to `concurrency_limit` entries from the frontier
//! 2. Fetch all of them concurrently behind the concurrency gate
//! 3. Wait for the whole round, then merge records and queue new links
//! 4. Repeat until the frontier is empty or the crawl is cancelled
//!
//! All traversal state (frontier, visited set, aggregator) is created per
//! call to [`Coordinator::crawl`] and never shared between crawls.

use crate::config::{validate, Config};
use crate::crawler::aggregator::Aggregator;
use crate::crawler::fetcher::{FetchOutcome, HttpFetcher};
use crate::crawler::observer::{CancelFlag, CrawlObserver, CrawlProgress, NoopObserver};
use crate::crawler::parser::{extract_links, ParsedPage};
use crate::crawler::scheduler::{Dispatch, Scheduler};
use crate::state::{CrawlResult, CrawlSummary, LinkRecord};
use crate::url::{parse_seed, Scope, ScopeMode};
use crate::LinkcheckError;
use chrono::Utc;
use futures::future::join_all;
use tokio::sync::Semaphore;
use url::Url;

/// A dispatched entry after its fetch returned
struct Resolved {
    dispatch: Dispatch,
    outcome: FetchOutcome,
    page: Option<ParsedPage>,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    fetcher: HttpFetcher,
    max_depth: u32,
    concurrency_limit: usize,
    scope_mode: ScopeMode,
    scope_patterns: Vec<String>,
    scope_override: Option<Scope>,
    observer: Box<dyn CrawlObserver>,
    cancel: CancelFlag,
}

impl Coordinator {
    /// Creates a new coordinator from a configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Configuration is valid and the HTTP client was built
    /// * `Err(LinkcheckError)` - Invalid configuration or client construction failed
    pub fn new(config: &Config) -> Result<Self, LinkcheckError> {
        validate(config)?;
        let fetcher = HttpFetcher::from_config(config)?;

        Ok(Self {
            fetcher,
            max_depth: config.crawler.max_depth,
            concurrency_limit: config.crawler.max_concurrency as usize,
            scope_mode: config.scope.mode,
            scope_patterns: config.scope.patterns.clone(),
            scope_override: None,
            observer: Box::new(NoopObserver),
            cancel: CancelFlag::new(),
        })
    }

    /// Uses a fixed scope instead of deriving one from the seed
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope_override = Some(scope);
        self
    }

    /// Overrides the concurrency limit from the configuration
    ///
    /// Values below one are clamped to one.
    pub fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.concurrency_limit = limit.max(1);
        self
    }

    pub fn with_observer(mut self, observer: impl CrawlObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Handle that cancels the crawl at the next round boundary
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Crawls from `seed_url` and returns every classified link
    ///
    /// Per-link failures end up in the error partition; only an unusable seed
    /// fails the call, and it does so before anything is fetched.
    pub async fn crawl(&self, seed_url: &str) -> Result<CrawlResult, LinkcheckError> {
        let seed = parse_seed(seed_url)?;
        let seed_str = seed.to_string();
        let scope = self
            .scope_override
            .clone()
            .unwrap_or_else(|| Scope::for_seed(&seed, self.scope_mode, &self.scope_patterns));

        tracing::info!(
            "Starting crawl of {} (max depth {}, concurrency {})",
            seed_str,
            self.max_depth,
            self.concurrency_limit
        );

        let started_at = Utc::now();
        let mut scheduler = Scheduler::new(self.max_depth, self.concurrency_limit);
        let mut aggregator = Aggregator::new();
        let gate = scheduler.gate();
        let mut rounds = 0u64;
        let mut pages_expanded = 0u64;
        let mut cancelled = false;

        scheduler.seed(&seed_str);

        loop {
            if self.cancel.is_cancelled() {
                tracing::warn!(
                    "Crawl cancelled with {} URLs still queued",
                    scheduler.frontier_size()
                );
                cancelled = true;
                break;
            }

            let round = scheduler.next_round();
            let Some(current_url) = round.last().map(|d| d.entry.url.clone()) else {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            };
            rounds += 1;

            tracing::debug!("Round {}: dispatching {} URLs", rounds, round.len());

            let resolved = join_all(
                round
                    .into_iter()
                    .map(|dispatch| self.resolve(dispatch, &scope, &gate)),
            )
            .await;

            for Resolved {
                dispatch,
                outcome,
                page,
            } in resolved
            {
                let entry = dispatch.entry;
                scheduler.mark_resolved(&entry.url);

                let record = LinkRecord {
                    status: outcome.status(),
                    anchor_text: entry.origin.anchor_text,
                    url: entry.url.clone(),
                    source_url: entry.origin.source_url,
                    source_title: entry.origin.source_title,
                };

                if let Some(stored) = aggregator.record(record) {
                    if !stored.status.is_success() {
                        self.observer.on_error(stored);
                    }
                }

                if let Some(page) = page {
                    pages_expanded += 1;
                    let queued =
                        scheduler.enqueue_links(&entry.url, &page.title, entry.depth, &page.links);
                    tracing::debug!(
                        "{}: {} links, {} queued, {} out of scope",
                        entry.url,
                        page.links.len(),
                        queued,
                        page.out_of_scope
                    );
                }
            }

            let progress = CrawlProgress {
                round: rounds,
                urls_processed: scheduler.urls_dispatched(),
                urls_discovered_total: scheduler.urls_discovered(),
                current_url,
            };
            tracing::info!(
                "Progress: round {}, {} processed, {} in frontier, {} ok / {} errors",
                rounds,
                progress.urls_processed,
                scheduler.frontier_size(),
                aggregator.success_count(),
                aggregator.error_count()
            );
            self.observer.on_round(&progress);
        }

        let summary = CrawlSummary {
            seed_url: seed_str,
            max_depth: self.max_depth,
            concurrency_limit: scheduler.concurrency_limit(),
            rounds,
            urls_dispatched: scheduler.urls_dispatched() as u64,
            pages_expanded,
            started_at,
            finished_at: Utc::now(),
            cancelled,
        };

        tracing::info!(
            "Crawl finished: {} successes, {} errors in {:.2}s",
            aggregator.success_count(),
            aggregator.error_count(),
            summary.duration_seconds()
        );

        Ok(aggregator.into_result(summary))
    }

    /// Fetches one dispatched entry and extracts its links if it is a page
    async fn resolve(&self, dispatch: Dispatch, scope: &Scope, gate: &Semaphore) -> Resolved {
        let outcome = {
            // The gate is never closed; a failed acquire just runs unthrottled
            let _permit = gate.acquire().await.ok();
            tracing::debug!(
                "Fetching {} (depth {}, {})",
                dispatch.entry.url,
                dispatch.entry.depth,
                if dispatch.expand { "page" } else { "probe" }
            );
            self.fetcher.fetch(&dispatch.entry.url, dispatch.expand).await
        };

        let page = if dispatch.expand {
            expand_page(&dispatch, &outcome, scope)
        } else {
            None
        };

        Resolved {
            dispatch,
            outcome,
            page,
        }
    }
}

/// Extracts links from a successfully fetched page
///
/// Non-HTML bodies and non-seed pages that redirected out of scope yield no
/// page at all.
fn expand_page(dispatch: &Dispatch, outcome: &FetchOutcome, scope: &Scope) -> Option<ParsedPage> {
    let FetchOutcome::Success {
        final_url,
        body,
        content_type,
        ..
    } = outcome
    else {
        return None;
    };

    let Some(body) = body else {
        tracing::warn!(
            "{} is not HTML ({}), no links extracted",
            dispatch.entry.url,
            content_type.as_deref().unwrap_or("unknown")
        );
        return None;
    };

    let base = match Url::parse(final_url) {
        Ok(base) => base,
        Err(e) => {
            tracing::warn!("Cannot use {} as a base URL: {}", final_url, e);
            return None;
        }
    };

    if dispatch.entry.depth > 0 && !scope.contains(&base) {
        tracing::debug!(
            "{} redirected out of scope to {}, not expanding",
            dispatch.entry.url,
            final_url
        );
        return None;
    }

    Some(extract_links(&base, body, scope))
}
