use crate::state::CrawlState;
use std::collections::HashSet;
use tracing::debug;
use url::Url;

/// Output of [`Classifier::classify`] for one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Outbound links in first-seen order, duplicates collapsed.
    pub external: Vec<String>,
    /// Domains of `external` that were not known before this page.
    pub unique_domains: Vec<String>,
}

/// Splits raw page links into external links and newly seen domains.
///
/// Classification is a pure function of its inputs so that traversal order
/// is reproducible.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    accept_suffixes: Option<Vec<String>>,
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only links ending in one of `suffixes`. Skips most images and
    /// stylesheets, but also drops plenty of real pages.
    pub fn with_accept_suffixes(mut self, suffixes: Vec<String>) -> Self {
        self.accept_suffixes = Some(suffixes);
        self
    }

    pub fn accept_suffixes(&self) -> Option<&[String]> {
        self.accept_suffixes.as_deref()
    }

    pub fn accepts(&self, link: &str) -> bool {
        match &self.accept_suffixes {
            Some(suffixes) => suffixes.iter().any(|suffix| link.ends_with(suffix.as_str())),
            None => true,
        }
    }

    pub fn classify(
        &self,
        current_host: &str,
        raw_links: &[String],
        state: &CrawlState,
    ) -> Classification {
        let mut seen = HashSet::new();
        let mut classification = Classification::default();

        for link in raw_links {
            if state.is_known(link) || !self.accepts(link) {
                continue;
            }

            let Some(domain) = registrable_domain(link) else {
                debug!("  -> Not an absolute http(s) link: {}", link);
                continue;
            };
            if domain == current_host {
                debug!("  -> Internal link, skipping: {}", link);
                continue;
            }
            if !seen.insert(link.as_str()) {
                continue;
            }

            if !state.domains.contains(&domain)
                && !state.visited.contains(&domain)
                && !classification.unique_domains.contains(&domain)
            {
                classification.unique_domains.push(domain);
            }
            classification.external.push(link.clone());
        }

        classification
    }
}

/// The `scheme://netloc/` part of an absolute http(s) URL.
pub fn registrable_domain(link: &str) -> Option<String> {
    let parsed = Url::parse(link).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    parsed.host_str()?;
    Some(format!("{}://{}/", parsed.scheme(), parsed.authority()))
}
