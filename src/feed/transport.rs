//! arXiv query API transport.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::FeedConfig;
use crate::feed::{FeedTransport, FetchError};
use crate::models::FeedQuery;
use crate::utils::{HttpClient, HttpSettings};

/// Base URL for arXiv API
pub const ARXIV_API_URL: &str = "https://export.arxiv.org/api/query";

/// Longest error body kept in [`FetchError::Status`]
const MAX_ERROR_BODY: usize = 200;

/// arXiv transport
///
/// Always requests the newest submissions first
/// (`sortBy=submittedDate&sortOrder=descending`).
#[derive(Debug, Clone)]
pub struct ArxivTransport {
    client: Arc<HttpClient>,
    base_url: String,
}

impl ArxivTransport {
    /// Create a transport against the public arXiv API
    pub fn new() -> Result<Self, FetchError> {
        Ok(Self {
            client: Arc::new(HttpClient::new()?),
            base_url: ARXIV_API_URL.to_string(),
        })
    }

    /// Create a transport from the `[feed]` configuration section
    pub fn from_config(config: &FeedConfig) -> Result<Self, FetchError> {
        let settings = HttpSettings {
            timeout: config.timeout(),
            connect_timeout: config.connect_timeout(),
            ..Default::default()
        };
        Ok(Self {
            client: Arc::new(HttpClient::with_settings(&settings)?),
            base_url: config.base_url.clone(),
        })
    }

    /// Create with a custom HTTP client and endpoint (for testing)
    pub fn with_client(client: Arc<HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Endpoint this transport queries
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the request URL for a query
    pub fn build_url(&self, query: &FeedQuery) -> String {
        let search_query = format!("cat:{}", query.category.trim());
        format!(
            "{}?search_query={}&sortBy=submittedDate&sortOrder=descending&start={}&max_results={}",
            self.base_url,
            urlencoding::encode(&search_query),
            query.start,
            query.max_results
        )
    }
}

#[async_trait]
impl FeedTransport for ArxivTransport {
    fn name(&self) -> &str {
        "arXiv"
    }

    async fn fetch_feed(&self, query: &FeedQuery) -> Result<String, FetchError> {
        let url = self.build_url(query);
        tracing::debug!(%url, "Fetching arXiv feed");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/atom+xml")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: body.trim().chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(FetchError::EmptyBody);
        }

        tracing::debug!(bytes = body.len(), "Received arXiv feed");
        Ok(body)
    }
}
