//! `TravelAI` gateway - relays trip planning requests to external providers
//!
//! Four routes map one-to-one onto four providers: flight offers (Amadeus),
//! itinerary generation (OpenAI), sightseeing places (Geoapify) and daily
//! weather (Open-Meteo). Provider JSON is relayed verbatim with its status;
//! gateway failures are reported as JSON error descriptors.

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod providers;
pub mod web;

// Re-export core types for public API
pub use crate::config::{GatewayConfig, ProviderCredentials};
pub use crate::error::{ErrorCode, GatewayError};
pub use crate::models::{ItineraryQuery, PlacesQuery, TripQuery, WeatherQuery};
pub use crate::providers::{Provider, Providers, UpstreamResponse};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, GatewayError>;
