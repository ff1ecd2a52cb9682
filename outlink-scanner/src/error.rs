use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Fetch failed for {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Page has no body")]
    EmptyBody,

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error(
        "Domain starvation: found {found} of {target} domains, gave up after {attempts} re-seeds"
    )]
    DomainStarvation {
        found: usize,
        target: usize,
        attempts: usize,
    },
}

pub type Result<T> = std::result::Result<T, CrawlError>;
