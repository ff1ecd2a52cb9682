use crate::classify::{Classifier, registrable_domain};
use crate::error::{CrawlError, Result};
use crate::extract::extract_links;
use crate::fetch::Fetcher;
use crate::result::{CrawlSummary, Site};
use crate::state::CrawlState;
use crate::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_RESEEDS, DEFAULT_MAX_URLS};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

const DEFAULT_SCHEME_PREFIX: &str = "http://";

/// Called with the visited count and the URL each time a URL is claimed.
pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;
/// Called with the current state every N claims.
pub type CheckpointCallback = Arc<dyn Fn(&CrawlState) + Send + Sync>;

/// What the engine descends into after fetching a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Every external link on the page.
    #[default]
    Links,
    /// Only the `scheme://netloc/` of newly discovered domains.
    Domains,
}

/// Keep re-seeding from random known domains until `domains` are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainTarget {
    pub domains: usize,
    /// Consecutive re-seeds that find no new domain before giving up.
    pub max_reseeds: usize,
}

impl DomainTarget {
    pub fn new(domains: usize) -> Self {
        Self {
            domains,
            max_reseeds: DEFAULT_MAX_RESEEDS,
        }
    }

    pub fn with_max_reseeds(mut self, max_reseeds: usize) -> Self {
        self.max_reseeds = max_reseeds;
        self
    }
}

/// Links still to be considered on one fetched page.
struct Frame {
    links: VecDeque<String>,
    depth: usize,
}

pub struct Crawler<F> {
    fetcher: F,
    classifier: Classifier,
    state: CrawlState,
    max_depth: usize,
    max_urls: usize,
    strategy: Strategy,
    domain_target: Option<DomainTarget>,
    progress_callback: Option<ProgressCallback>,
    checkpoint_callback: Option<(usize, CheckpointCallback)>,
    rng: StdRng,
    summary: CrawlSummary,
}

impl<F: Fetcher> Crawler<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            classifier: Classifier::new(),
            state: CrawlState::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            max_urls: DEFAULT_MAX_URLS,
            strategy: Strategy::default(),
            domain_target: None,
            progress_callback: None,
            checkpoint_callback: None,
            rng: StdRng::from_os_rng(),
            summary: CrawlSummary::default(),
        }
    }

    /// Start from previously persisted state instead of an empty one.
    pub fn with_state(mut self, state: CrawlState) -> Self {
        self.state = state;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_max_urls(mut self, max_urls: usize) -> Self {
        self.max_urls = max_urls;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_accept_suffixes(mut self, suffixes: Vec<String>) -> Self {
        self.classifier = self.classifier.with_accept_suffixes(suffixes);
        self
    }

    pub fn with_domain_target(mut self, target: DomainTarget) -> Self {
        self.domain_target = Some(target);
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Invoke `callback` after every `every` claimed URLs. Zero disables it.
    pub fn with_checkpoint_callback(mut self, every: usize, callback: CheckpointCallback) -> Self {
        self.checkpoint_callback = (every > 0).then_some((every, callback));
        self
    }

    /// Fix the RNG used to pick re-seed domains.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    pub fn into_state(self) -> CrawlState {
        self.state
    }

    pub fn summary(&self) -> &CrawlSummary {
        &self.summary
    }

    /// Crawl from a seed host, then keep re-seeding if a domain target is set.
    pub async fn crawl(&mut self, seed: &str) -> Result<CrawlSummary> {
        let root = seed_url(seed)?;
        info!(
            "Starting crawl of {} (depth {}, max {} urls, {:?})",
            root, self.max_depth, self.max_urls, self.strategy
        );

        self.traverse(&root, self.max_depth).await;

        if let Some(target) = self.domain_target {
            self.seek_domains(target).await?;
        }

        info!(
            "Crawl complete. Fetched {} pages, {} failures, {} visited urls, {} domains",
            self.summary.fetched,
            self.summary.failed,
            self.state.visited.len(),
            self.state.domains.len()
        );
        Ok(self.summary.clone())
    }

    /// Fetch `root` and descend into its candidates with a budget of `depth`
    /// hops. A root that is already visited is not fetched again.
    pub async fn traverse(&mut self, root: &str, depth: usize) {
        if self.state.visited.contains(root) {
            debug!("Skipping {}, already visited", root);
            return;
        }
        self.expand(root, depth).await;
    }

    async fn expand(&mut self, root: &str, depth: usize) {
        let Some(site) = self.visit(root).await else {
            return;
        };

        // Single mode records links it declines to descend into so they are
        // not considered again; domain-target mode leaves them alone.
        let record_unfollowed = self.domain_target.is_none();
        let mut stack = vec![self.frame(site, depth)];

        while let Some(frame) = stack.last_mut() {
            let Some(link) = frame.links.pop_front() else {
                stack.pop();
                continue;
            };
            let depth = frame.depth;

            if depth == 0
                || self.state.visited.len() >= self.max_urls
                || self.state.visited.contains(&link)
            {
                if record_unfollowed {
                    self.state.visited.insert(link);
                }
                continue;
            }

            self.claim(&link);
            if let Some(site) = self.visit(&link).await {
                stack.push(self.frame(site, depth - 1));
            }
        }
    }

    async fn seek_domains(&mut self, target: DomainTarget) -> Result<()> {
        let mut unproductive = 0;

        while self.state.domains.len() < target.domains {
            if self.state.visited.len() >= self.max_urls {
                warn!(
                    "Reached {} visited urls with {} of {} domains, not re-seeding",
                    self.state.visited.len(),
                    self.state.domains.len(),
                    target.domains
                );
                return Err(self.starvation(target));
            }

            let candidates: Vec<String> = self
                .state
                .domains
                .iter()
                .filter(|domain| !self.state.is_known(domain))
                .cloned()
                .collect();

            let Some(seed) = candidates.choose(&mut self.rng).cloned() else {
                warn!("No unvisited domains left to re-seed from");
                return Err(self.starvation(target));
            };

            let before = self.state.domains.len();
            self.summary.reseeds += 1;
            info!(
                "Re-seeding from {} ({} of {} domains)",
                seed, before, target.domains
            );

            self.claim(&seed);
            self.expand(&seed, self.max_depth).await;

            if self.state.domains.len() > before {
                unproductive = 0;
            } else {
                unproductive += 1;
                if unproductive >= target.max_reseeds {
                    return Err(self.starvation(target));
                }
            }
        }

        Ok(())
    }

    fn starvation(&self, target: DomainTarget) -> CrawlError {
        CrawlError::DomainStarvation {
            found: self.state.domains.len(),
            target: target.domains,
            attempts: self.summary.reseeds,
        }
    }

    fn claim(&mut self, url: &str) {
        self.state.visited.insert(url.to_string());
        self.summary.accepted += 1;
        debug!("Claimed {}", url);

        if let Some(ref callback) = self.progress_callback {
            callback(self.state.visited.len(), url.to_string());
        }

        if let Some((every, ref callback)) = self.checkpoint_callback
            && self.summary.accepted % every == 0
        {
            callback(&self.state);
        }
    }

    /// Fetch and classify one URL. A failed fetch excludes the URL and ends
    /// only this branch.
    async fn visit(&mut self, url: &str) -> Option<Site> {
        debug!("Fetching {}", url);

        let page = match self.fetcher.fetch(url).await {
            Ok(page) => page,
            Err(e) => {
                warn!("Crawl error for {}: {}", url, e);
                self.state.exclusions.insert(url.to_string());
                self.summary.failed += 1;
                return None;
            }
        };
        self.summary.fetched += 1;

        let links = match extract_links(&page.body) {
            Ok(links) => links,
            Err(CrawlError::EmptyBody) => {
                debug!("{} has no body", url);
                Vec::new()
            }
            Err(e) => {
                warn!("Could not extract links from {}: {}", url, e);
                Vec::new()
            }
        };

        let current_host = registrable_domain(url).unwrap_or_default();
        let classification = self.classifier.classify(&current_host, &links, &self.state);
        debug!(
            "{} -> {} links, {} external, {} new domains",
            url,
            links.len(),
            classification.external.len(),
            classification.unique_domains.len()
        );
        self.state
            .domains
            .extend(classification.unique_domains.iter().cloned());

        Some(Site::new(url.to_string(), page, links, classification))
    }

    fn frame(&self, site: Site, depth: usize) -> Frame {
        let links = match self.strategy {
            Strategy::Links => site.external,
            Strategy::Domains => site.unique_domains,
        };
        Frame {
            links: links.into(),
            depth,
        }
    }
}

/// Turn a seed host into the URL that is fetched first. `http://` is
/// prefixed unless the seed already names a scheme.
pub fn seed_url(seed: &str) -> Result<String> {
    let seed = seed.trim();
    if seed.is_empty() {
        return Err(CrawlError::InvalidUrl("empty seed".to_string()));
    }

    let url = if seed.contains("://") {
        seed.to_string()
    } else {
        format!("{}{}", DEFAULT_SCHEME_PREFIX, seed)
    };

    let parsed =
        Url::parse(&url).map_err(|e| CrawlError::InvalidUrl(format!("{}: {}", seed, e)))?;
    if parsed.host_str().is_none() {
        return Err(CrawlError::InvalidUrl(format!("{}: no host", seed)));
    }

    Ok(url)
}
