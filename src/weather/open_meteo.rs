//! `OpenMeteo` API response structures and conversion utilities

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::DayWeather;

/// Daily forecast response from `OpenMeteo`
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub latitude: f64,
    pub longitude: f64,
    pub daily: Option<DailyData>,
}

/// Daily weather data from `OpenMeteo`
#[derive(Debug, Deserialize)]
pub struct DailyData {
    pub time: Vec<String>,
    #[serde(rename = "temperature_2m_max")]
    pub temperature_max: Option<Vec<Option<f32>>>,
    #[serde(rename = "temperature_2m_min")]
    pub temperature_min: Option<Vec<Option<f32>>>,
    #[serde(rename = "weathercode")]
    pub weather_code: Option<Vec<Option<u8>>>,
}

/// Geocoding response from `OpenMeteo`
#[derive(Debug, Deserialize)]
pub struct GeocodingResponse {
    pub results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodingResult {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: Option<String>,
    pub admin1: Option<String>,
}

/// Resolved destination coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: Option<String>,
}

impl From<GeocodingResult> for GeoPoint {
    fn from(result: GeocodingResult) -> Self {
        Self {
            name: result.name,
            latitude: result.latitude,
            longitude: result.longitude,
            country: result.country,
        }
    }
}

impl GeoPoint {
    /// Round coordinates for cache key generation
    #[must_use]
    pub fn rounded_coordinates(&self) -> (f64, f64) {
        let lat = (self.latitude * 100.0).round() / 100.0;
        let lon = (self.longitude * 100.0).round() / 100.0;
        (lat, lon)
    }

    #[must_use]
    pub fn cache_key(&self, start: NaiveDate, end: NaiveDate) -> String {
        let (lat, lon) = self.rounded_coordinates();
        format!("weather:{lat:.2}:{lon:.2}:{start}:{end}")
    }
}

impl DailyData {
    /// One entry per day that has at least a weather code or temperature
    #[must_use]
    pub fn to_day_weather(&self) -> Vec<DayWeather> {
        let value_at = |column: &Option<Vec<Option<f32>>>, i: usize| {
            column.as_ref().and_then(|values| values.get(i).copied().flatten())
        };

        self.time
            .iter()
            .enumerate()
            .filter_map(|(i, day)| {
                let date = NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()?;
                let code = self
                    .weather_code
                    .as_ref()
                    .and_then(|codes| codes.get(i).copied().flatten());
                let min = value_at(&self.temperature_min, i);
                let max = value_at(&self.temperature_max, i);

                if code.is_none() && min.is_none() && max.is_none() {
                    return None;
                }

                let temperature = match (min, max) {
                    (Some(min), Some(max)) => DayWeather::format_temperature_range(min, max),
                    (Some(t), None) | (None, Some(t)) => format!("{t:.0}°C"),
                    (None, None) => "Typical temperature".to_string(),
                };

                Some(DayWeather {
                    date,
                    weather: code
                        .map_or("Unknown", weather_code_to_description)
                        .to_string(),
                    temperature,
                    icon: code.map_or("☀️", weather_code_to_icon).to_string(),
                })
            })
            .collect()
    }
}

/// Convert WMO weather code to human-readable description
#[must_use]
pub fn weather_code_to_description(code: u8) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}

/// Emoji for a WMO weather code
#[must_use]
pub fn weather_code_to_icon(code: u8) -> &'static str {
    match code {
        0 => "☀️",
        1 | 2 => "🌤️",
        3 => "☁️",
        45 | 48 => "🌫️",
        51..=57 => "🌦️",
        61..=67 | 80..=82 => "🌧️",
        71..=77 | 85 | 86 => "❄️",
        95..=99 => "⛈️",
        _ => "🌡️",
    }
}
