//! Saved itinerary record

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::itinerary::Itinerary;
use super::trip::{BudgetTier, Season, TripRequest};
use super::weather::DayWeather;

/// An itinerary the user chose to keep, with the request that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedItinerary {
    /// `itin_<YYYYmmddHHMMSS>_<n>`
    pub id: String,
    /// Display name, "Trip to <destination>"
    pub name: String,
    pub user_id: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: BudgetTier,
    pub trip_purpose: String,
    pub preferences: Vec<String>,
    pub special_notes: String,
    pub weather_data: Vec<DayWeather>,
    pub season: Season,
    pub itinerary: Itinerary,
    pub created_at: DateTime<Utc>,
}

impl SavedItinerary {
    /// Build a record; `sequence` counts itineraries saved before this one
    #[must_use]
    pub fn new(
        request: &TripRequest,
        itinerary: Itinerary,
        weather_data: Vec<DayWeather>,
        user_id: impl Into<String>,
        sequence: u64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: format!("itin_{}_{sequence}", created_at.format("%Y%m%d%H%M%S")),
            name: format!("Trip to {}", request.destination),
            user_id: user_id.into(),
            destination: request.destination.clone(),
            start_date: request.start_date,
            end_date: request.end_date,
            budget: request.budget,
            trip_purpose: request.purpose.clone(),
            preferences: request.preferences.clone(),
            special_notes: request.special_notes.clone(),
            weather_data,
            season: itinerary.trip_info.season,
            itinerary,
            created_at,
        }
    }

    /// Compact listing line
    #[must_use]
    pub fn summary_line(&self) -> String {
        format!(
            "{}  {}  {} → {}  ({})",
            self.id, self.name, self.start_date, self.end_date, self.budget
        )
    }
}

/// Listing entry returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedItinerarySummary {
    pub id: String,
    pub name: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: BudgetTier,
    pub created_at: DateTime<Utc>,
}

impl From<&SavedItinerary> for SavedItinerarySummary {
    fn from(saved: &SavedItinerary) -> Self {
        Self {
            id: saved.id.clone(),
            name: saved.name.clone(),
            destination: saved.destination.clone(),
            start_date: saved.start_date,
            end_date: saved.end_date,
            budget: saved.budget,
            created_at: saved.created_at,
        }
    }
}
