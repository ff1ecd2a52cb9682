use crate::checkpoint::CheckpointStore;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use outlink_scanner::{
    CrawlState, CrawlSummary, Crawler, DEFAULT_MAX_DEPTH, DEFAULT_MAX_URLS, DEFAULT_TIMEOUT_SECS,
    DomainTarget, Fetcher, HttpFetcher, Strategy, registrable_domain,
};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Options for configuring a crawl operation
pub struct CrawlOptions {
    pub seed: String,
    pub max_depth: usize,
    pub max_urls: usize,
    pub strategy: Strategy,
    pub domain_target: Option<DomainTarget>,
    pub accept_suffixes: Option<Vec<String>>,
    pub state_dir: PathBuf,
    pub persist_exclusions: bool,
    /// Save state every N accepted URLs in addition to the final save.
    pub checkpoint_every: Option<usize>,
    pub timeout_secs: u64,
    pub rng_seed: Option<u64>,
    /// Drop any existing checkpoint before starting.
    pub fresh: bool,
    pub show_progress_bars: bool,
}

impl CrawlOptions {
    pub fn new(seed: impl Into<String>, state_dir: impl Into<PathBuf>) -> Self {
        Self {
            seed: seed.into(),
            max_depth: DEFAULT_MAX_DEPTH,
            max_urls: DEFAULT_MAX_URLS,
            strategy: Strategy::default(),
            domain_target: None,
            accept_suffixes: None,
            state_dir: state_dir.into(),
            persist_exclusions: false,
            checkpoint_every: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            rng_seed: None,
            fresh: false,
            show_progress_bars: false,
        }
    }
}

/// Callback for reporting each accepted URL as it is discovered
pub type CrawlProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// What a finished crawl leaves behind
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub seed: String,
    pub summary: CrawlSummary,
    pub state: CrawlState,
}

/// Execute a crawl over HTTP with the given options
pub async fn execute_crawl(
    options: CrawlOptions,
    progress_callback: Option<CrawlProgressCallback>,
) -> Result<CrawlOutcome> {
    let fetcher = HttpFetcher::with_timeout(options.timeout_secs)
        .context("Failed to create HTTP client")?;
    execute_crawl_with(fetcher, options, progress_callback).await
}

/// Execute a crawl with any fetcher.
///
/// State is loaded from `options.state_dir` first and written back when the
/// crawl ends, including when it ends in domain starvation.
pub async fn execute_crawl_with<F: Fetcher>(
    fetcher: F,
    options: CrawlOptions,
    progress_callback: Option<CrawlProgressCallback>,
) -> Result<CrawlOutcome> {
    let store = CheckpointStore::new(&options.state_dir);
    if options.fresh {
        store.clear().context("Failed to clear existing checkpoint")?;
    }

    let state = store
        .load_state(options.persist_exclusions)
        .context("Failed to load checkpoint")?;
    info!(
        "Loaded {} visited urls and {} domains from {}",
        state.visited.len(),
        state.domains.len(),
        store.dir().display()
    );

    // Set up single progress bar for overall crawl progress (only if enabled)
    let progress_bar = if options.show_progress_bars {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .context("Invalid progress template")?,
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Crawling {}...", options.seed));
        Some(Arc::new(pb))
    } else {
        None
    };

    let pb_clone = progress_bar.clone();
    let internal_progress_callback: outlink_scanner::ProgressCallback =
        Arc::new(move |visited: usize, url: String| match (&pb_clone, &progress_callback) {
            (Some(pb), Some(callback)) => {
                pb.set_message(format!("Crawling... {} URLs visited", visited));
                pb.suspend(|| callback(url));
            }
            (Some(pb), None) => {
                pb.set_message(format!("Crawling... {} URLs visited", visited));
            }
            (None, Some(callback)) => callback(url),
            (None, None) => {}
        });

    let mut crawler = Crawler::new(fetcher)
        .with_state(state)
        .with_max_depth(options.max_depth)
        .with_max_urls(options.max_urls)
        .with_strategy(options.strategy)
        .with_progress_callback(internal_progress_callback);

    if let Some(suffixes) = options.accept_suffixes.clone() {
        crawler = crawler.with_accept_suffixes(suffixes);
    }
    if let Some(target) = options.domain_target {
        crawler = crawler.with_domain_target(target);
    }
    if let Some(seed) = options.rng_seed {
        crawler = crawler.with_rng_seed(seed);
    }
    if let Some(every) = options.checkpoint_every {
        let store = store.clone();
        let persist_exclusions = options.persist_exclusions;
        crawler = crawler.with_checkpoint_callback(
            every,
            Arc::new(move |state: &CrawlState| {
                if let Err(e) = store.save_state(state, persist_exclusions) {
                    warn!("Periodic checkpoint failed: {}", e);
                }
            }),
        );
    }

    let result = crawler.crawl(&options.seed).await;
    let state = crawler.into_state();

    if let Some(ref pb) = progress_bar {
        pb.finish_and_clear();
    }

    store
        .save_state(&state, options.persist_exclusions)
        .context("Failed to save checkpoint")?;

    let summary = result.with_context(|| format!("Crawl of {} failed", options.seed))?;
    Ok(CrawlOutcome {
        seed: options.seed,
        summary,
        state,
    })
}

/// Generate a plain-text report for a crawl state
pub fn generate_crawl_report(state: &CrawlState, summary: Option<&CrawlSummary>) -> String {
    let mut report = String::new();
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str("# Summary:\n");
    if let Some(summary) = summary {
        report.push_str(&format!("  Pages fetched: {}\n", summary.fetched));
        report.push_str(&format!("  Fetch failures: {}\n", summary.failed));
        report.push_str(&format!("  URLs accepted this run: {}\n", summary.accepted));
        if summary.reseeds > 0 {
            report.push_str(&format!("  Domain re-seeds: {}\n", summary.reseeds));
        }
    }
    report.push_str(&format!("  Visited URLs: {}\n", state.visited.len()));
    report.push_str(&format!("  Known domains: {}\n", state.domains.len()));
    if !state.exclusions.is_empty() {
        report.push_str(&format!("  Excluded URLs: {}\n", state.exclusions.len()));
    }

    report.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    // Group visited URLs by domain
    let mut by_domain: BTreeMap<String, usize> = state
        .domains
        .iter()
        .map(|domain| (domain.clone(), 0))
        .collect();
    let mut unparsed = 0;
    for url in &state.visited {
        match registrable_domain(url) {
            Some(domain) => *by_domain.entry(domain).or_insert(0) += 1,
            None => unparsed += 1,
        }
    }

    report.push_str("# Domains:\n");
    for (domain, count) in &by_domain {
        report.push_str(&format!("  {} ({} urls)\n", domain, count));
    }
    if unparsed > 0 {
        report.push_str(&format!("\n  {} visited entries are not http(s) URLs\n", unparsed));
    }

    report
}
