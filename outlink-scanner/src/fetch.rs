use crate::DEFAULT_TIMEOUT_SECS;
use crate::error::Result;
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Raw response handed to the extractor. Any status code counts as a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub status_code: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Page {
    pub fn new(status_code: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status_code,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Retrieves a single URL. Network, TLS and timeout failures all surface as
/// one error; the engine does not distinguish between them.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Page>> + Send;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent("Outlink/0.1 (https://github.com/trapdoorsec/outlink)")
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Page> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        let status_code = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = response.bytes().await?.to_vec();

        Ok(Page {
            status_code,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    #[tokio::test]
    async fn test_fetch_returns_status_headers_and_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_bytes(b"<html><body><a href=\"http://a.com/\">a</a></body></html>"),
            )
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::new().unwrap();
        let page = fetcher.fetch(&mock_server.uri()).await.unwrap();

        assert_eq!(page.status_code, 200);
        assert_eq!(page.header("Content-Type"), Some("text/html"));
        assert!(String::from_utf8_lossy(&page.body).contains("http://a.com/"));
    }

    #[tokio::test]
    async fn test_fetch_keeps_error_statuses_as_pages() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("gone"))
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::with_timeout(2).unwrap();
        let page = fetcher
            .fetch(&format!("{}/missing", mock_server.uri()))
            .await
            .unwrap();

        assert_eq!(page.status_code, 404);
        assert_eq!(page.body, b"gone".to_vec());
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host_is_an_error() {
        let fetcher = HttpFetcher::with_timeout(2).unwrap();
        // Nothing listens on the discard port.
        let result = fetcher.fetch("http://127.0.0.1:9/").await;
        assert!(result.is_err());
    }
}
