//! Data models for the TravelMagic application
//!
//! - Trip: what the traveller asked for (destination, dates, budget, interests)
//! - Weather: per-day weather snippets
//! - Itinerary: the generated plan and its export shape
//! - Saved: stored itineraries

pub mod itinerary;
pub mod saved;
pub mod trip;
pub mod weather;

pub use itinerary::{Activity, DayPeriod, DayPlan, Itinerary, TripInfo};
pub use saved::{SavedItinerary, SavedItinerarySummary};
pub use trip::{BudgetTier, Season, TripRequest};
pub use weather::DayWeather;
