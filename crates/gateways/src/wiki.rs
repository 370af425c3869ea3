//! Contextual Lookup Gateway — Wikipedia place summaries.
//!
//! Resolution is two steps, mirroring a search-then-read flow: an
//! opensearch query resolves the free-form place name to article titles,
//! then the REST page-summary endpoint fetches the extract for the first
//! resolved title. If that title turns out to be a disambiguation page,
//! the next search result is tried once before giving up on
//! disambiguation. The resolved article URL is reported through
//! `LocationContext::source` so callers can detect a requested/resolved
//! name mismatch.

use async_trait::async_trait;
use nimbus_core::error::Error;
use nimbus_core::gateway::ContextGateway;
use nimbus_core::model::{Fetch, LocationContext};
use tracing::{debug, warn};

/// Gateway to Wikipedia's opensearch and page-summary APIs.
pub struct WikipediaGateway {
    base_url: String,
    client: reqwest::Client,
}

impl WikipediaGateway {
    /// Create a gateway with a bounded per-call timeout.
    pub fn new(base_url: impl Into<String>, timeout: std::time::Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            // Wikimedia asks API consumers to identify themselves.
            .user_agent("nimbus-weather-agent/0.1")
            .build()
            .map_err(|e| Error::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Resolve a free-form place name to up to three article titles.
    async fn search_titles(&self, place: &str) -> Result<Vec<String>, String> {
        let url = format!(
            "{}/w/api.php?action=opensearch&search={}&limit=3&namespace=0&format=json",
            self.base_url,
            urlencoding::encode(place)
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| format!("search request failed: {e}"))?;

        if !response.status().is_success() {
            return Err(format!("search returned status {}", response.status()));
        }

        let body: wikipedia::OpenSearchResponse = response
            .json()
            .await
            .map_err(|e| format!("unparseable search body: {e}"))?;

        Ok(body.1)
    }

    async fn page_summary(&self, title: &str) -> Result<wikipedia::PageSummary, String> {
        let url = format!(
            "{}/api/rest_v1/page/summary/{}?redirect=true",
            self.base_url,
            urlencoding::encode(title)
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| format!("summary request failed: {e}"))?;

        if !response.status().is_success() {
            return Err(format!("summary returned status {}", response.status()));
        }

        response
            .json()
            .await
            .map_err(|e| format!("unparseable summary body: {e}"))
    }

    async fn fetch_inner(&self, place: &str) -> Result<LocationContext, String> {
        let titles = self.search_titles(place).await?;
        let Some(first) = titles.first() else {
            return Err("no matching articles".into());
        };

        let mut summary = self.page_summary(first).await?;

        // A disambiguation page has no useful extract; degrade to the next
        // resolved article when the search offered one.
        if summary.is_disambiguation() {
            if let Some(next) = titles.get(1) {
                debug!(place, next, "First article is a disambiguation page, trying next");
                summary = self.page_summary(next).await?;
            }
        }

        summary
            .into_context()
            .ok_or_else(|| "article has no extract".into())
    }
}

#[async_trait]
impl ContextGateway for WikipediaGateway {
    async fn fetch(&self, place: &str) -> Fetch<LocationContext> {
        let place = place.trim();
        if place.is_empty() {
            warn!("Context fetch with empty place name");
            return Fetch::Unavailable;
        }

        match self.fetch_inner(place).await {
            Ok(context) => {
                debug!(place, source = %context.source, "Context retrieved");
                Fetch::Ready(context)
            }
            Err(reason) => {
                warn!(place, %reason, "Context unavailable");
                Fetch::Unavailable
            }
        }
    }
}

/// Wikipedia wire types.
mod wikipedia {
    use nimbus_core::model::LocationContext;
    use serde::Deserialize;

    /// `action=opensearch` responds with a bare four-element array:
    /// `[query, titles, descriptions, urls]`.
    #[derive(Debug, Deserialize)]
    pub struct OpenSearchResponse(
        pub String,
        pub Vec<String>,
        pub Vec<String>,
        pub Vec<String>,
    );

    #[derive(Debug, Deserialize)]
    pub struct PageSummary {
        #[serde(rename = "type", default)]
        pub page_type: String,
        pub title: String,
        #[serde(default)]
        pub extract: Option<String>,
        #[serde(default)]
        pub content_urls: Option<ContentUrls>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ContentUrls {
        pub desktop: DesktopUrls,
    }

    #[derive(Debug, Deserialize)]
    pub struct DesktopUrls {
        pub page: String,
    }

    impl PageSummary {
        pub fn is_disambiguation(&self) -> bool {
            self.page_type == "disambiguation"
        }

        /// Map to the internal model; `None` when the article carries no
        /// extract text.
        pub fn into_context(self) -> Option<LocationContext> {
            let summary = self.extract.filter(|s| !s.trim().is_empty())?;
            let source = self
                .content_urls
                .map(|u| u.desktop.page)
                .unwrap_or_else(|| {
                    format!(
                        "https://en.wikipedia.org/wiki/{}",
                        self.title.replace(' ', "_")
                    )
                });
            Some(LocationContext { summary, source })
        }
    }
}
