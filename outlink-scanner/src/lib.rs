pub mod classify;
pub mod crawler;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod result;
pub mod state;

pub use classify::{Classification, Classifier, registrable_domain};
pub use crawler::{
    CheckpointCallback, Crawler, DomainTarget, ProgressCallback, Strategy, seed_url,
};
pub use error::CrawlError;
pub use extract::extract_links;
pub use fetch::{Fetcher, HttpFetcher, Page};
pub use result::{CrawlSummary, Site};
pub use state::CrawlState;

/// Descent budget per branch when none is configured.
pub const DEFAULT_MAX_DEPTH: usize = 3;
/// Global cap on the visited set when none is configured.
pub const DEFAULT_MAX_URLS: usize = 200;
/// Consecutive unproductive re-seeds tolerated in domain-target mode.
pub const DEFAULT_MAX_RESEEDS: usize = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Coarse suffix heuristic for skipping binary assets.
pub const DEFAULT_ACCEPT_SUFFIXES: &[&str] = &[".html", ".com", ".org", ".io", "/"];
