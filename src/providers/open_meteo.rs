//! Daily forecast from Open-Meteo (no API key required)

use reqwest::RequestBuilder;
use serde::Serialize;
use tracing::instrument;

use super::{Provider, ProviderClient, UpstreamResponse};
use crate::Result;
use crate::config::ProviderConfig;
use crate::models::WeatherQuery;

const FORECAST_PATH: &str = "/v1/forecast";
pub const DAILY_METRICS: &str = "temperature_2m_max,temperature_2m_min";

#[derive(Debug, Serialize)]
struct ForecastParams<'a> {
    latitude: &'a str,
    longitude: &'a str,
    start_date: &'a str,
    end_date: &'a str,
    daily: &'static str,
    timezone: &'static str,
}

#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: ProviderClient,
}

impl OpenMeteoClient {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        Ok(Self {
            client: ProviderClient::new(Provider::OpenMeteo, config)?,
        })
    }

    pub fn forecast_request(&self, query: &WeatherQuery) -> RequestBuilder {
        self.client.get(FORECAST_PATH).query(&ForecastParams {
            latitude: &query.latitude,
            longitude: &query.longitude,
            start_date: &query.start_date,
            end_date: &query.end_date,
            daily: DAILY_METRICS,
            timezone: "auto",
        })
    }

    #[instrument(skip_all, fields(lat = %query.latitude, lon = %query.longitude))]
    pub async fn daily_forecast(&self, query: &WeatherQuery) -> Result<UpstreamResponse> {
        self.client.relay(self.forecast_request(query)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_forecast_request_query() {
        let config = ProviderConfig {
            base_url: "https://api.open-meteo.com".to_string(),
            timeout_seconds: 10,
        };
        let request = OpenMeteoClient::new(&config)
            .unwrap()
            .forecast_request(&WeatherQuery {
                latitude: "41.90".to_string(),
                longitude: "12".to_string(),
                start_date: "2024-06-01".to_string(),
                end_date: "2024-06-07".to_string(),
            })
            .build()
            .unwrap();

        assert_eq!(request.url().path(), "/v1/forecast");
        let params: HashMap<String, String> = request.url().query_pairs().into_owned().collect();
        assert_eq!(params["latitude"], "41.90");
        assert_eq!(params["longitude"], "12");
        assert_eq!(params["start_date"], "2024-06-01");
        assert_eq!(params["end_date"], "2024-06-07");
        assert_eq!(params["daily"], "temperature_2m_max,temperature_2m_min");
        assert_eq!(params["timezone"], "auto");
        assert!(request.headers().get("authorization").is_none());
    }
}
