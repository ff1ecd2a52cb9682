use crate::classify::Classification;
use crate::fetch::Page;
use serde::{Deserialize, Serialize};

/// One fetched page and what the classifier made of it.
#[derive(Debug, Clone)]
pub struct Site {
    pub url: String,
    pub status_code: u16,
    pub headers: Vec<(String, String)>,
    pub content: Vec<u8>,
    pub links: Vec<String>,
    pub external: Vec<String>,
    pub unique_domains: Vec<String>,
}

impl Site {
    pub fn new(url: String, page: Page, links: Vec<String>, classification: Classification) -> Self {
        Self {
            url,
            status_code: page.status_code,
            headers: page.headers,
            content: page.body,
            links,
            external: classification.external,
            unique_domains: classification.unique_domains,
        }
    }
}

/// Counters for a single crawl run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlSummary {
    pub fetched: usize,
    pub failed: usize,
    pub accepted: usize,
    pub reseeds: usize,
}
