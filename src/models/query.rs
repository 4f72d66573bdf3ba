//! Checked queries passed to the provider clients
//!
//! Only presence is guaranteed. Dates, location codes and coordinates are
//! forwarded as given; the providers own their formats.

/// Flight offer search between two locations
#[derive(Debug, Clone, PartialEq)]
pub struct TripQuery {
    pub origin: String,
    pub destination: String,
    pub start_date: String,
    pub end_date: String,
}

/// Destination to build a generated itinerary for
#[derive(Debug, Clone, PartialEq)]
pub struct ItineraryQuery {
    pub destination: String,
}

impl ItineraryQuery {
    /// Natural-language prompt sent to the completion provider
    #[must_use]
    pub fn prompt(&self) -> String {
        format!("Generate a 5-day travel agenda to visit {}.", self.destination)
    }
}

/// Destination to list sights for
#[derive(Debug, Clone, PartialEq)]
pub struct PlacesQuery {
    pub destination: String,
}

impl PlacesQuery {
    /// Place filter expression understood by the places provider
    #[must_use]
    pub fn place_filter(&self) -> String {
        format!("place:{}", self.destination)
    }
}

/// Daily forecast window for a coordinate
///
/// Coordinates hold the caller's text, e.g. `"41.90"` stays `"41.90"`.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherQuery {
    pub latitude: String,
    pub longitude: String,
    pub start_date: String,
    pub end_date: String,
}
