//! Itinerary generation through the OpenAI completions endpoint

use reqwest::RequestBuilder;
use serde::Serialize;
use tracing::instrument;

use super::{Provider, ProviderClient, UpstreamResponse};
use crate::Result;
use crate::config::OpenAiConfig;
use crate::models::ItineraryQuery;

const COMPLETIONS_PATH: &str = "/v1/completions";

/// Upper bound on generated tokens per itinerary
pub const MAX_TOKENS: u32 = 100;

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: String,
    max_tokens: u32,
}

#[derive(Clone)]
pub struct OpenAiClient {
    client: ProviderClient,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(config: &OpenAiConfig, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: ProviderClient::new(Provider::OpenAi, &config.provider())?,
            api_key: api_key.into(),
            model: config.model.clone(),
        })
    }

    pub fn completion_request(&self, query: &ItineraryQuery) -> RequestBuilder {
        self.client
            .post(COMPLETIONS_PATH)
            .bearer_auth(&self.api_key)
            .json(&CompletionRequest {
                model: &self.model,
                prompt: query.prompt(),
                max_tokens: MAX_TOKENS,
            })
    }

    #[instrument(skip_all, fields(destination = %query.destination, model = %self.model))]
    pub async fn generate_itinerary(&self, query: &ItineraryQuery) -> Result<UpstreamResponse> {
        self.client.relay(self.completion_request(query)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_completion_request_body() {
        let config = OpenAiConfig {
            base_url: "https://api.openai.com".to_string(),
            timeout_seconds: 30,
            model: "test-model".to_string(),
        };
        let client = OpenAiClient::new(&config, "sk-test").unwrap();
        let request = client
            .completion_request(&ItineraryQuery {
                destination: "Paris".to_string(),
            })
            .build()
            .unwrap();

        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.url().as_str(), "https://api.openai.com/v1/completions");
        assert_eq!(request.headers()["authorization"], "Bearer sk-test");
        assert_eq!(request.headers()["content-type"], "application/json");

        let bytes = request.body().and_then(|body| body.as_bytes()).unwrap();
        let body: Value = serde_json::from_slice(bytes).unwrap();
        assert_eq!(body["model"], "test-model");
        assert_eq!(body["max_tokens"], 100);
        assert!(body["prompt"].as_str().unwrap().contains("Paris"));
    }
}
