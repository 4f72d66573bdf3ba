//! Data models for the gateway
//!
//! - Request: inbound JSON bodies exactly as callers send them
//! - Query: the checked values handed to provider clients

pub mod query;
pub mod request;

pub use query::{ItineraryQuery, PlacesQuery, TripQuery, WeatherQuery};
pub use request::{ItineraryRequest, PlacesRequest, TripProposalRequest, WeatherRequest};
