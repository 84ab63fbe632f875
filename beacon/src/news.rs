//! Government news feed relay.
//!
//! `/api/news` fetches the configured RSS/Atom feed, maps the top entries to
//! a compact JSON shape, and leans on the response cache to keep the upstream
//! fetch off the hot path. Fetch or parse failures are upstream errors; the
//! feed is never partially relayed.

use std::time::Duration;

use tracing::instrument;
use url::Url;

use crate::api::models::news::NewsItem;
use crate::config::NewsConfig;
use crate::errors::{Error, Result};

/// Number of feed entries relayed to clients.
pub const TOP_ITEMS: usize = 10;

/// Client for the configured news feed.
#[derive(Debug, Clone)]
pub struct NewsClient {
    http: reqwest::Client,
    feed_url: Url,
    timeout: Duration,
}

impl NewsClient {
    pub fn new(http: reqwest::Client, config: &NewsConfig) -> Self {
        Self {
            http,
            feed_url: config.feed_url.clone(),
            timeout: config.timeout,
        }
    }

    /// Fetch and map the newest [`TOP_ITEMS`] entries.
    #[instrument(skip(self), err)]
    pub async fn top_items(&self) -> Result<Vec<NewsItem>> {
        let bytes = self
            .http
            .get(self.feed_url.clone())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| Error::Upstream {
                service: "news feed",
                reason: e.to_string(),
            })?
            .error_for_status()
            .map_err(|e| Error::Upstream {
                service: "news feed",
                reason: e.to_string(),
            })?
            .bytes()
            .await
            .map_err(|e| Error::Upstream {
                service: "news feed",
                reason: e.to_string(),
            })?;

        let feed = feed_rs::parser::parse(bytes.as_ref()).map_err(|e| Error::Upstream {
            service: "news feed",
            reason: format!("unparseable feed: {e}"),
        })?;

        Ok(feed.entries.into_iter().take(TOP_ITEMS).map(NewsItem::from_entry).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server_uri: &str) -> NewsClient {
        crate::install_test_crypto_provider();
        NewsClient::new(
            reqwest::Client::new(),
            &NewsConfig {
                feed_url: Url::parse(&format!("{server_uri}/feed.xml")).unwrap(),
                timeout: Duration::from_secs(5),
            },
        )
    }

    fn rss_feed(item_count: usize) -> String {
        let items: String = (0..item_count)
            .map(|i| {
                format!(
                    "<item><title>Advisory {i}</title>\
                     <link>https://news.example.gov/advisories/{i}</link>\
                     <description>Details for advisory {i}</description>\
                     <pubDate>Mon, 21 Jul 2025 0{}:00:00 GMT</pubDate></item>",
                    i % 10
                )
            })
            .collect();
        format!(
            "<?xml version=\"1.0\"?><rss version=\"2.0\"><channel>\
             <title>Government Advisories</title><link>https://news.example.gov</link>\
             <description>Official advisories</description>{items}</channel></rss>"
        )
    }

    #[tokio::test]
    async fn test_maps_feed_entries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feed.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(rss_feed(3), "application/rss+xml"))
            .mount(&server)
            .await;

        let items = client(&server.uri()).top_items().await.unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].title, "Advisory 0");
        assert_eq!(
            items[0].link.as_deref(),
            Some("https://news.example.gov/advisories/0")
        );
        assert_eq!(items[0].summary.as_deref(), Some("Details for advisory 0"));
        assert!(items[0].published.is_some());
    }

    #[tokio::test]
    async fn test_relays_at_most_top_items() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feed.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(rss_feed(25), "application/rss+xml"))
            .mount(&server)
            .await;

        let items = client(&server.uri()).top_items().await.unwrap();
        assert_eq!(items.len(), TOP_ITEMS);
    }

    #[tokio::test]
    async fn test_unreachable_feed_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feed.xml"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let result = client(&server.uri()).top_items().await;
        assert!(matches!(result.unwrap_err(), Error::Upstream { service: "news feed", .. }));
    }

    #[tokio::test]
    async fn test_garbage_body_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feed.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not a feed"))
            .mount(&server)
            .await;

        let result = client(&server.uri()).top_items().await;
        assert!(matches!(result.unwrap_err(), Error::Upstream { service: "news feed", .. }));
    }
}
