//! Flight offer search (Amadeus Self-Service API)

use reqwest::RequestBuilder;
use tracing::instrument;

use super::{Provider, ProviderClient, UpstreamResponse};
use crate::Result;
use crate::config::ProviderConfig;
use crate::models::TripQuery;

const FLIGHT_OFFERS_PATH: &str = "/v1/shopping/flight-offers";

#[derive(Clone)]
pub struct AmadeusClient {
    client: ProviderClient,
    api_key: String,
}

impl AmadeusClient {
    pub fn new(config: &ProviderConfig, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: ProviderClient::new(Provider::Amadeus, config)?,
            api_key: api_key.into(),
        })
    }

    /// Build the flight offer search for `query`
    pub fn flight_offers_request(&self, query: &TripQuery) -> RequestBuilder {
        self.client
            .get(FLIGHT_OFFERS_PATH)
            .bearer_auth(&self.api_key)
            .query(&[
                ("originLocationCode", query.origin.as_str()),
                ("destinationLocationCode", query.destination.as_str()),
                ("departureDate", query.start_date.as_str()),
                ("returnDate", query.end_date.as_str()),
            ])
    }

    #[instrument(skip_all, fields(origin = %query.origin, destination = %query.destination))]
    pub async fn search_flight_offers(&self, query: &TripQuery) -> Result<UpstreamResponse> {
        self.client.relay(self.flight_offers_request(query)).await
    }
}
