//! Page fetching.

use anyhow::Result;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use std::time::Duration;
use url::Url;

/// Source of page bodies for the crawler.
///
/// `Ok(None)` means the URL resolved but carried nothing indexable (a
/// non-success status or a non-HTML content type); the crawler treats it
/// as terminal without logging an error.
pub trait Fetch: Send + Sync {
    fn fetch(&self, url: &Url) -> Result<Option<String>>;
}

/// HTTP(S) fetcher with a bounded redirect chain and request timeout.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Redirect cap applied to crawl fetches by default.
    pub const MAX_REDIRECTS: usize = 3;

    pub fn new(max_redirects: usize) -> Result<Self> {
        let client = Client::builder()
            .redirect(Policy::limited(max_redirects))
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<Option<String>> {
        let response = self.client.get(url.clone()).send()?;
        if !response.status().is_success() {
            return Ok(None);
        }
        let is_html = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("text/html"));
        if !is_html {
            return Ok(None);
        }
        Ok(Some(response.text()?))
    }
}
