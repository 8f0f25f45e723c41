use super::{AppId, Lookup, Outcome};
use crate::api::*;
use crate::client_ext::ClientQueryExt;
use crate::error::FetchError;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{error, trace};

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Steam storefront API: /api/appdetails?appids=...&cc=us&filters=price_overview
//
////////////////////////////////////////////////////////////////////////////////////////////////////

pub const STEAM_API_URL: &str = "https://store.steampowered.com";

/// Longest request URL sent to the storefront. A batch of 800 seven-digit app IDs, with its
/// encoded commas, comes to roughly 8 KB.
pub const MAX_URL_LENGTH: usize = 16 * 1024;

pub struct Steam {
    http_client: HttpClient,
    base_url: String,
    country: String,
    max_url_length: usize,
}

impl Steam {
    pub fn new(http_client: HttpClient) -> Self {
        Self {
            http_client,
            base_url: STEAM_API_URL.to_string(),
            country: "us".to_string(),
            max_url_length: MAX_URL_LENGTH,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    #[must_use]
    pub fn with_max_url_length(mut self, max: usize) -> Self {
        self.max_url_length = max;
        self
    }

    fn url(&self) -> String {
        format!("{}/api/appdetails", self.base_url.trim_end_matches('/'))
    }
}

// -------------------------------------------------------------------------------------------------

#[async_trait]
impl PriceApi for Steam {
    async fn fetch(&self, app_ids: &[AppId]) -> anyhow::Result<Lookup> {
        let url = self.url();
        let appids = app_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        trace!("fetching prices for {} app IDs", app_ids.len());
        let response = self
            .http_client
            .get_bounded(
                &url,
                &[
                    ("appids", appids.as_str()),
                    ("cc", self.country.as_str()),
                    ("filters", "price_overview"),
                ],
                self.max_url_length,
            )
            .await?
            .bytes()
            .await
            .map_err(|e| {
                error!("byte transformation error: {e}\nURL: {url}");
                FetchError::from(e)
            })?;

        // error check the deserialization
        let de = match serde_json::from_slice::<HashMap<String, AppDetails>>(&response) {
            Ok(data) => data,
            Err(e) => {
                error!("deserialization error: {e}\nURL: {url}");
                return Err(e.into());
            }
        };

        let lookup = into_lookup(de)?;
        trace!("{} of {} app IDs answered", lookup.len(), app_ids.len());
        Ok(lookup)
    }
}

fn into_lookup(de: HashMap<String, AppDetails>) -> Result<Lookup, FetchError> {
    de.into_iter()
        .map(|(key, details)| {
            let app_id = key
                .trim()
                .parse::<AppId>()
                .map_err(|_| FetchError::BadKey(key.clone()))?;
            Ok((app_id, details.into()))
        })
        .collect()
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Deserialization
//
////////////////////////////////////////////////////////////////////////////////////////////////////

// {
//   "440": { "success": true, "data": [] },
//   "730": { "success": true, "data": { "price_overview": { "final_formatted": "$14.99", ... } } },
//   "999": { "success": false }
// }
#[derive(Deserialize, Debug)]
pub struct AppDetails {
    pub success: bool,
    #[serde(default)]
    pub data: Option<Data>,
}

// Steam sends `[]` rather than `{}` when the filter leaves nothing behind.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum Data {
    Priced { price_overview: PriceOverview },
    Other(serde_json::Value),
}

#[derive(Deserialize, Debug)]
pub struct PriceOverview {
    pub final_formatted: String,
}

impl From<AppDetails> for Outcome {
    fn from(details: AppDetails) -> Self {
        if !details.success {
            return Outcome::Unsuccessful;
        }
        match details.data {
            Some(Data::Priced { price_overview }) if !price_overview.final_formatted.is_empty() => {
                Outcome::Fetched(price_overview.final_formatted)
            }
            _ => Outcome::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn outcome(value: serde_json::Value) -> Outcome {
        serde_json::from_value::<AppDetails>(value).unwrap().into()
    }

    #[test]
    fn test_unsuccessful_is_skipped() {
        assert_eq!(outcome(json!({ "success": false })), Outcome::Unsuccessful);
        assert_eq!(
            outcome(json!({
                "success": false,
                "data": { "price_overview": { "final_formatted": "$1.00" } }
            })),
            Outcome::Unsuccessful
        );
    }

    #[test]
    fn test_empty_payloads() {
        assert_eq!(outcome(json!({ "success": true, "data": [] })), Outcome::Empty);
        assert_eq!(outcome(json!({ "success": true, "data": {} })), Outcome::Empty);
        assert_eq!(outcome(json!({ "success": true, "data": null })), Outcome::Empty);
        assert_eq!(outcome(json!({ "success": true })), Outcome::Empty);
        assert_eq!(
            outcome(json!({
                "success": true,
                "data": { "price_overview": { "final_formatted": "" } }
            })),
            Outcome::Empty
        );
    }

    #[test]
    fn test_fetched_price() {
        let fetched = outcome(json!({
            "success": true,
            "data": {
                "price_overview": {
                    "currency": "USD",
                    "initial": 999,
                    "final": 999,
                    "discount_percent": 0,
                    "initial_formatted": "",
                    "final_formatted": "$9.99"
                }
            }
        }));
        assert_eq!(fetched, Outcome::Fetched("$9.99".to_string()));
    }

    #[test]
    fn test_bad_key() {
        let de: HashMap<String, AppDetails> =
            serde_json::from_value(json!({ "abc": { "success": false } })).unwrap();
        assert!(matches!(into_lookup(de), Err(FetchError::BadKey(key)) if key == "abc"));
    }

    #[test]
    fn test_client_with_base_url() {
        let steam = Steam::new(HttpClient::new());
        assert_eq!(steam.url(), format!("{STEAM_API_URL}/api/appdetails"));

        let steam = steam.with_base_url("http://localhost:8080/");
        assert_eq!(steam.url(), "http://localhost:8080/api/appdetails");
    }

    #[tokio::test]
    async fn test_fetch_batch() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/appdetails"))
            .and(query_param("appids", "10,20,30"))
            .and(query_param("cc", "us"))
            .and(query_param("filters", "price_overview"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "10": { "success": false },
                "20": { "success": true, "data": [] },
                "30": {
                    "success": true,
                    "data": { "price_overview": { "final_formatted": "$9.99" } }
                }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let steam = Steam::new(HttpClient::new()).with_base_url(mock_server.uri());
        let lookup = steam.fetch(&[10, 20, 30]).await.unwrap();

        assert_eq!(lookup.len(), 3);
        assert_eq!(lookup[&10], Outcome::Unsuccessful);
        assert_eq!(lookup[&20], Outcome::Empty);
        assert_eq!(lookup[&30], Outcome::Fetched("$9.99".to_string()));
    }

    #[tokio::test]
    async fn test_fetch_country() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/appdetails"))
            .and(query_param("cc", "gb"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "30": {
                    "success": true,
                    "data": { "price_overview": { "final_formatted": "£7.49" } }
                }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let steam = Steam::new(HttpClient::new())
            .with_base_url(mock_server.uri())
            .with_country("gb");
        let lookup = steam.fetch(&[30]).await.unwrap();

        assert_eq!(lookup[&30], Outcome::Fetched("£7.49".to_string()));
    }

    #[tokio::test]
    async fn test_fetch_malformed_json() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/appdetails"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&mock_server)
            .await;

        let steam = Steam::new(HttpClient::new()).with_base_url(mock_server.uri());
        assert!(steam.fetch(&[1, 2]).await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_server_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/appdetails"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let steam = Steam::new(HttpClient::new()).with_base_url(mock_server.uri());
        let err = steam.fetch(&[1]).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<FetchError>(),
            Some(FetchError::Status { .. })
        ));
    }

    #[tokio::test]
    async fn test_full_batch_fits_url_limit() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/appdetails"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&mock_server)
            .await;

        // 800 seven-digit IDs, the widest batch the storefront sees today
        let app_ids: Vec<AppId> = (9_000_000..9_000_800).collect();
        let steam = Steam::new(HttpClient::new()).with_base_url(mock_server.uri());

        assert!(steam.fetch(&app_ids).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_rejects_long_url() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/appdetails"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&mock_server)
            .await;

        let steam = Steam::new(HttpClient::new())
            .with_base_url(mock_server.uri())
            .with_max_url_length(128);
        let app_ids: Vec<AppId> = (1_000_000..1_000_100).collect();
        let err = steam.fetch(&app_ids).await.unwrap_err();

        match err.downcast_ref::<FetchError>() {
            Some(FetchError::UrlTooLong { len, max }) => {
                assert_eq!(*max, 128);
                assert!(*len > 128);
            }
            other => panic!("expected UrlTooLong, got {other:?}"),
        }
    }
}
