//! Sightseeing places from the Geoapify Places API
//!
//! Geoapify authenticates with an `apiKey` query parameter only, so the key
//! travels in the URL. [`super::redacted_url`] keeps it out of the logs.

use reqwest::RequestBuilder;
use tracing::instrument;

use super::{Provider, ProviderClient, UpstreamResponse};
use crate::Result;
use crate::config::ProviderConfig;
use crate::models::PlacesQuery;

const PLACES_PATH: &str = "/v2/places";
pub const SIGHTS_CATEGORY: &str = "tourism.sights";

#[derive(Clone)]
pub struct GeoapifyClient {
    client: ProviderClient,
    api_key: String,
}

impl GeoapifyClient {
    pub fn new(config: &ProviderConfig, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: ProviderClient::new(Provider::Geoapify, config)?,
            api_key: api_key.into(),
        })
    }

    pub fn places_request(&self, query: &PlacesQuery) -> RequestBuilder {
        let filter = query.place_filter();
        self.client.get(PLACES_PATH).query(&[
            ("categories", SIGHTS_CATEGORY),
            ("filter", filter.as_str()),
            ("apiKey", self.api_key.as_str()),
        ])
    }

    #[instrument(skip_all, fields(destination = %query.destination))]
    pub async fn find_places(&self, query: &PlacesQuery) -> Result<UpstreamResponse> {
        self.client.relay(self.places_request(query)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn client() -> GeoapifyClient {
        let config = ProviderConfig {
            base_url: "https://api.geoapify.com".to_string(),
            timeout_seconds: 10,
        };
        GeoapifyClient::new(&config, "geo-key").unwrap()
    }

    #[test]
    fn test_places_request_query() {
        let request = client()
            .places_request(&PlacesQuery {
                destination: "Rome".to_string(),
            })
            .build()
            .unwrap();

        assert_eq!(request.url().path(), "/v2/places");
        let params: HashMap<String, String> = request.url().query_pairs().into_owned().collect();
        assert_eq!(params["categories"], "tourism.sights");
        assert_eq!(params["filter"], "place:Rome");
        assert_eq!(params["apiKey"], "geo-key");
        assert!(request.headers().get("authorization").is_none());
    }

    #[test]
    fn test_destination_cannot_inject_parameters() {
        let request = client()
            .places_request(&PlacesQuery {
                destination: "Rome&apiKey=stolen#frag".to_string(),
            })
            .build()
            .unwrap();

        let pairs: Vec<(String, String)> = request.url().query_pairs().into_owned().collect();
        assert_eq!(pairs.len(), 3);
        assert!(pairs.contains(&("filter".to_string(), "place:Rome&apiKey=stolen#frag".to_string())));
        assert!(pairs.contains(&("apiKey".to_string(), "geo-key".to_string())));
        assert!(request.url().fragment().is_none());
    }
}
