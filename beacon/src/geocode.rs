//! External geocoding lookup for validating city filters.
//!
//! The directory endpoint only trusts a user-supplied city filter after the
//! geocoder confirms the name refers to a real place. The lookup yields an
//! explicit [`CityCheck`] rather than a bare boolean so the
//! validation-then-query split stays visible in [`crate::resolver`]. The
//! geocoder never supplies resource data.

use std::time::Duration;

use reqwest::header;
use serde::Deserialize;
use tracing::instrument;
use url::Url;

use crate::config::GeocodingConfig;
use crate::errors::{Error, Result};

const USER_AGENT: &str = concat!("beacon/", env!("CARGO_PKG_VERSION"));

/// Outcome of validating a city name against the geocoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CityCheck {
    /// The geocoder returned at least one match for the name
    Verified(String),
    /// The geocoder knows no such place
    Unknown,
}

/// A single match from a Nominatim-compatible search endpoint.
///
/// Only existence matters here; the payload is otherwise ignored.
#[derive(Debug, Deserialize)]
struct GeocodeMatch {
    #[serde(default)]
    #[allow(dead_code)]
    display_name: String,
}

/// Client for a Nominatim-compatible geocoding service.
#[derive(Debug, Clone)]
pub struct GeocodeClient {
    http: reqwest::Client,
    base_url: Url,
    country: String,
    timeout: Duration,
}

impl GeocodeClient {
    pub fn new(http: reqwest::Client, config: &GeocodingConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
            country: config.country.clone(),
            timeout: config.timeout,
        }
    }

    /// Check whether `city` names a real place in the configured country.
    ///
    /// An unreachable or misbehaving geocoder is an upstream failure, never
    /// an `Unknown` verdict: a transient outage must not turn into a 404.
    #[instrument(skip(self), err)]
    pub async fn verify_city(&self, city: &str) -> Result<CityCheck> {
        let url = self.base_url.join("search").map_err(|e| Error::Internal {
            operation: format!("build geocoder URL: {e}"),
        })?;

        let response = self
            .http
            .get(url)
            .query(&[
                ("q", format!("{city}, {}", self.country).as_str()),
                ("format", "json"),
                ("limit", "1"),
            ])
            .header(header::USER_AGENT, USER_AGENT)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| Error::Upstream {
                service: "geocoder",
                reason: e.to_string(),
            })?
            .error_for_status()
            .map_err(|e| Error::Upstream {
                service: "geocoder",
                reason: e.to_string(),
            })?;

        let matches: Vec<GeocodeMatch> = response.json().await.map_err(|e| Error::Upstream {
            service: "geocoder",
            reason: format!("invalid response body: {e}"),
        })?;

        if matches.is_empty() {
            Ok(CityCheck::Unknown)
        } else {
            Ok(CityCheck::Verified(city.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server_uri: &str, timeout: Duration) -> GeocodeClient {
        crate::install_test_crypto_provider();
        GeocodeClient::new(
            reqwest::Client::new(),
            &GeocodingConfig {
                base_url: Url::parse(server_uri).unwrap(),
                country: "Philippines".to_string(),
                timeout,
            },
        )
    }

    #[tokio::test]
    async fn test_match_verifies_city() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "Cebu, Philippines"))
            .and(query_param("format", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "display_name": "Cebu City, Central Visayas, Philippines" }
            ])))
            .mount(&server)
            .await;

        let check = client(&server.uri(), Duration::from_secs(5))
            .verify_city("Cebu")
            .await
            .unwrap();
        assert_eq!(check, CityCheck::Verified("Cebu".to_string()));
    }

    #[tokio::test]
    async fn test_zero_matches_is_unknown() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let check = client(&server.uri(), Duration::from_secs(5))
            .verify_city("Atlantis")
            .await
            .unwrap();
        assert_eq!(check, CityCheck::Unknown);
    }

    #[tokio::test]
    async fn test_server_error_is_upstream_not_unknown() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let result = client(&server.uri(), Duration::from_secs(5)).verify_city("Cebu").await;
        assert!(matches!(result.unwrap_err(), Error::Upstream { service: "geocoder", .. }));
    }

    #[tokio::test]
    async fn test_timeout_is_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let result = client(&server.uri(), Duration::from_millis(100)).verify_city("Cebu").await;
        assert!(matches!(result.unwrap_err(), Error::Upstream { service: "geocoder", .. }));
    }
}
