//! Inbound request bodies
//!
//! Every field is optional at the parsing stage so that an incomplete body
//! produces a field-specific error instead of a generic parse failure.
//! Coordinates are kept as the caller's raw JSON text: numbers and strings
//! are both accepted and forwarded exactly as written.

use serde::Deserialize;
use serde_json::value::RawValue;

use crate::GatewayError;
use crate::models::{ItineraryQuery, PlacesQuery, TripQuery, WeatherQuery};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripProposalRequest {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItineraryRequest {
    pub destination: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlacesRequest {
    pub destination: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherRequest {
    pub latitude: Option<Box<RawValue>>,
    pub longitude: Option<Box<RawValue>>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

fn require_text(value: Option<String>, field: &'static str) -> Result<String, GatewayError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(GatewayError::missing_field(field)),
    }
}

/// Accept a JSON number or string and return its text unchanged
fn require_coordinate(value: Option<Box<RawValue>>, field: &'static str) -> Result<String, GatewayError> {
    let Some(raw) = value else {
        return Err(GatewayError::missing_field(field));
    };

    let text = raw.get().trim();
    if text.starts_with('"') {
        let text: String = serde_json::from_str(text)
            .map_err(|e| GatewayError::malformed_body(format!("{field}: {e}")))?;
        require_text(Some(text), field)
    } else if text == "null" {
        Err(GatewayError::missing_field(field))
    } else if serde_json::from_str::<serde_json::Number>(text).is_ok() {
        Ok(text.to_string())
    } else {
        Err(GatewayError::malformed_body(format!(
            "{field}: expected a number or a string"
        )))
    }
}

impl TryFrom<TripProposalRequest> for TripQuery {
    type Error = GatewayError;

    fn try_from(request: TripProposalRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            origin: require_text(request.origin, "origin")?,
            destination: require_text(request.destination, "destination")?,
            start_date: require_text(request.start_date, "startDate")?,
            end_date: require_text(request.end_date, "endDate")?,
        })
    }
}

impl TryFrom<ItineraryRequest> for ItineraryQuery {
    type Error = GatewayError;

    fn try_from(request: ItineraryRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            destination: require_text(request.destination, "destination")?,
        })
    }
}

impl TryFrom<PlacesRequest> for PlacesQuery {
    type Error = GatewayError;

    fn try_from(request: PlacesRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            destination: require_text(request.destination, "destination")?,
        })
    }
}

impl TryFrom<WeatherRequest> for WeatherQuery {
    type Error = GatewayError;

    fn try_from(request: WeatherRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            latitude: require_coordinate(request.latitude, "latitude")?,
            longitude: require_coordinate(request.longitude, "longitude")?,
            start_date: require_text(request.start_date, "startDate")?,
            end_date: require_text(request.end_date, "endDate")?,
        })
    }
}
