//! Per-day weather snippet attached to a day plan

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::trip::Season;

/// Weather summary for one trip day
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DayWeather {
    /// Calendar day this entry describes
    pub date: NaiveDate,
    /// Human-readable description of weather conditions
    pub weather: String,
    /// Temperature range, e.g. "12°C - 19°C"
    pub temperature: String,
    /// Emoji icon for the conditions
    pub icon: String,
}

impl DayWeather {
    /// Placeholder used when no forecast is available for a day
    #[must_use]
    pub fn seasonal(date: NaiveDate, season: Season) -> Self {
        Self {
            date,
            weather: format!("Typical {season} weather"),
            temperature: "Typical temperature".to_string(),
            icon: "☀️".to_string(),
        }
    }

    /// Whether this entry is a seasonal placeholder rather than a forecast
    #[must_use]
    pub fn is_seasonal(&self) -> bool {
        self.weather.starts_with("Typical ") && self.weather.ends_with(" weather")
    }

    /// Format a min/max pair in Celsius
    #[must_use]
    pub fn format_temperature_range(min: f32, max: f32) -> String {
        format!("{min:.0}°C - {max:.0}°C")
    }

    /// Line used in language model prompts
    #[must_use]
    pub fn prompt_line(&self) -> String {
        format!(
            "{}: {}, {}",
            self.date.format("%Y-%m-%d"),
            self.weather,
            self.temperature
        )
    }
}
