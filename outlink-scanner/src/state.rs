use std::collections::BTreeSet;

/// Canonical URL strings that have been claimed or recorded.
pub type VisitedSet = BTreeSet<String>;
/// Registrable domains (`scheme://netloc/`) seen among external links.
pub type DomainSet = BTreeSet<String>;
/// URLs that failed to fetch during the current run.
pub type ExclusionList = BTreeSet<String>;

/// Everything a crawl mutates. Owned by one `Crawler` at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlState {
    pub visited: VisitedSet,
    pub domains: DomainSet,
    pub exclusions: ExclusionList,
}

impl CrawlState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_visited<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.visited.extend(urls.into_iter().map(Into::into));
        self
    }

    pub fn with_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.domains.extend(domains.into_iter().map(Into::into));
        self
    }

    /// True if the link was already claimed or failed earlier in the run.
    pub fn is_known(&self, url: &str) -> bool {
        self.visited.contains(url) || self.exclusions.contains(url)
    }
}
