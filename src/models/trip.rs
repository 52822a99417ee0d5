//! Trip request model: what the traveller asked for

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::TravelMagicError;

/// Budget tier driving accommodation and activity choices
///
/// Serialized by name; deserialization goes through `FromStr`, so JSON input
/// accepts the same spellings as the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BudgetTier {
    Budget,
    #[default]
    Medium,
    Luxury,
}

impl BudgetTier {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BudgetTier::Budget => "Budget",
            BudgetTier::Medium => "Medium",
            BudgetTier::Luxury => "Luxury",
        }
    }

    /// Lowercase form used inside generated prose
    #[must_use]
    pub fn label(self) -> String {
        self.as_str().to_lowercase()
    }
}

impl fmt::Display for BudgetTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BudgetTier {
    type Err = TravelMagicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "budget" | "low" => Ok(BudgetTier::Budget),
            "medium" | "mid" | "mid-range" | "moderate" => Ok(BudgetTier::Medium),
            "luxury" | "high" => Ok(BudgetTier::Luxury),
            other => Err(TravelMagicError::validation(format!(
                "Unknown budget tier '{other}'. Must be one of: budget, medium, luxury"
            ))),
        }
    }
}

/// Travel season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    /// Meteorological season for a date; a negative latitude flips hemispheres
    #[must_use]
    pub fn for_date(date: NaiveDate, latitude: Option<f64>) -> Self {
        let northern = match date.month() {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Fall,
            _ => Season::Winter,
        };

        match latitude {
            Some(lat) if lat < 0.0 => northern.opposite(),
            _ => northern,
        }
    }

    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Season::Spring => Season::Fall,
            Season::Summer => Season::Winter,
            Season::Fall => Season::Spring,
            Season::Winter => Season::Summer,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Season {
    type Err = TravelMagicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "fall" | "autumn" => Ok(Season::Fall),
            "winter" => Ok(Season::Winter),
            other => Err(TravelMagicError::validation(format!(
                "Unknown season '{other}'. Must be one of: spring, summer, fall, winter"
            ))),
        }
    }
}

macro_rules! serde_by_name {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(de::Error::custom)
            }
        }
    };
}

serde_by_name!(BudgetTier);
serde_by_name!(Season);

/// Everything needed to plan a trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
    /// Destination as typed by the user, e.g. "Lisbon, Portugal"
    pub destination: String,
    /// First day of the trip
    pub start_date: NaiveDate,
    /// Day of departure (exclusive)
    pub end_date: NaiveDate,
    #[serde(default)]
    pub budget: BudgetTier,
    /// Interests in the order the user listed them
    #[serde(default)]
    pub preferences: Vec<String>,
    /// Free-text purpose ("Family vacation", "Romantic getaway", ...)
    #[serde(default)]
    pub purpose: String,
    /// Explicit season; derived from the start date when absent
    #[serde(default)]
    pub season: Option<Season>,
    #[serde(default)]
    pub special_notes: String,
}

impl TripRequest {
    #[must_use]
    pub fn new(destination: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            destination: destination.into(),
            start_date,
            end_date,
            budget: BudgetTier::default(),
            preferences: Vec::new(),
            purpose: String::new(),
            season: None,
            special_notes: String::new(),
        }
    }

    #[must_use]
    pub fn with_budget(mut self, budget: BudgetTier) -> Self {
        self.budget = budget;
        self
    }

    #[must_use]
    pub fn with_preferences<I, S>(mut self, preferences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preferences = preferences.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = purpose.into();
        self
    }

    #[must_use]
    pub fn with_season(mut self, season: Season) -> Self {
        self.season = Some(season);
        self
    }

    /// Number of planned days; the end date is the departure day
    #[must_use]
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    /// Every date of the trip, in order
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..self.duration_days().max(0)).map(move |offset| self.start_date + Duration::days(offset))
    }

    /// Season used for prose and fallback weather
    #[must_use]
    pub fn effective_season(&self, latitude: Option<f64>) -> Season {
        self.season
            .unwrap_or_else(|| Season::for_date(self.start_date, latitude))
    }

    /// Check the request and normalise its free-text fields in place
    pub fn validate(&mut self, max_days: u32) -> Result<(), TravelMagicError> {
        self.destination = self.destination.trim().to_string();
        if self.destination.is_empty() {
            return Err(TravelMagicError::validation("Destination cannot be empty"));
        }

        if self.end_date <= self.start_date {
            return Err(TravelMagicError::validation(format!(
                "End date {} must be after start date {}",
                self.end_date, self.start_date
            )));
        }

        let duration = self.duration_days();
        if duration > i64::from(max_days) {
            return Err(TravelMagicError::validation(format!(
                "Trip of {duration} days exceeds the maximum of {max_days} days"
            )));
        }

        let mut seen = HashSet::new();
        self.preferences = self
            .preferences
            .iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .filter(|p| seen.insert(p.to_lowercase()))
            .collect();

        self.purpose = self.purpose.trim().to_string();
        Ok(())
    }
}
