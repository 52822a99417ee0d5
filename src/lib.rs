//! `TravelMagic` - weather-aware travel itinerary planning
//!
//! This library looks up destination weather, synthesizes day-by-day
//! itineraries (optionally through a language model), stores them locally
//! and turns them into exports and slideshow previews.

pub mod api;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod llm;
pub mod models;
pub mod planner;
pub mod preview;
pub mod store;
pub mod telemetry;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use api::AppState;
pub use cache::PersistentCache;
pub use config::TravelMagicConfig;
pub use error::TravelMagicError;
pub use models::{
    Activity, BudgetTier, DayPeriod, DayPlan, DayWeather, Itinerary, SavedItinerary, Season,
    TripInfo, TripRequest,
};
pub use planner::{ItineraryPlanner, PlanSource, PlannedTrip};
pub use preview::{Slide, TripPreview};
pub use store::ItineraryStore;
pub use weather::{TripWeather, WeatherService};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TravelMagicError>;
