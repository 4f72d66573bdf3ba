//! Inbound routes, one per provider
//!
//! Every handler follows the same three steps: parse the body, check the
//! required fields, relay the provider call. Handlers share nothing but the
//! read-only provider clients.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{OriginalUri, State, rejection::JsonRejection},
    http::{Method, StatusCode},
    routing::{get, post},
};
use serde_json::{Value, json};

use crate::models::{
    ItineraryQuery, ItineraryRequest, PlacesQuery, PlacesRequest, TripProposalRequest, TripQuery,
    WeatherQuery, WeatherRequest,
};
use crate::providers::{Providers, UpstreamResponse};
use crate::{GatewayError, VERSION};

#[derive(Clone)]
pub struct AppState {
    providers: Arc<Providers>,
    max_body_bytes: usize,
}

impl AppState {
    #[must_use]
    pub fn new(providers: Providers, max_body_bytes: usize) -> Self {
        Self {
            providers: Arc::new(providers),
            max_body_bytes,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/trip-proposal", post(trip_proposal))
        .route("/generate-itinerary", post(generate_itinerary))
        .route("/places", post(places))
        .route("/weather", post(weather))
        .route("/health", get(health))
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state)
}

type Body<T> = Result<Json<T>, JsonRejection>;

fn parse_body<T>(state: &AppState, body: Body<T>) -> Result<T, GatewayError> {
    match body {
        Ok(Json(request)) => Ok(request),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            Err(GatewayError::BodyTooLarge {
                limit: state.max_body_bytes,
            })
        }
        Err(rejection) => Err(GatewayError::malformed_body(rejection.body_text())),
    }
}

async fn trip_proposal(
    State(state): State<AppState>,
    body: Body<TripProposalRequest>,
) -> Result<UpstreamResponse, GatewayError> {
    let query = TripQuery::try_from(parse_body(&state, body)?)?;
    state.providers.amadeus.search_flight_offers(&query).await
}

async fn generate_itinerary(
    State(state): State<AppState>,
    body: Body<ItineraryRequest>,
) -> Result<UpstreamResponse, GatewayError> {
    let query = ItineraryQuery::try_from(parse_body(&state, body)?)?;
    state.providers.openai.generate_itinerary(&query).await
}

async fn places(
    State(state): State<AppState>,
    body: Body<PlacesRequest>,
) -> Result<UpstreamResponse, GatewayError> {
    let query = PlacesQuery::try_from(parse_body(&state, body)?)?;
    state.providers.geoapify.find_places(&query).await
}

async fn weather(
    State(state): State<AppState>,
    body: Body<WeatherRequest>,
) -> Result<UpstreamResponse, GatewayError> {
    let query = WeatherQuery::try_from(parse_body(&state, body)?)?;
    state.providers.open_meteo.daily_forecast(&query).await
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": VERSION }))
}

async fn route_not_found(OriginalUri(uri): OriginalUri) -> GatewayError {
    GatewayError::RouteNotFound {
        path: uri.path().to_string(),
    }
}

async fn method_not_allowed(method: Method) -> GatewayError {
    GatewayError::MethodNotAllowed {
        method: method.to_string(),
    }
}
