//! Generated itinerary: trip summary plus one plan per day
//!
//! The serialized shape (`trip_info` + `daily_plan`) is the export format
//! and also what the language model is asked to produce.

use std::fmt::{self, Display};

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::trip::{BudgetTier, Season, TripRequest};
use crate::TravelMagicError;

/// Complete generated itinerary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    pub trip_info: TripInfo,
    pub daily_plan: Vec<DayPlan>,
}

/// Trip-level metadata and narrative summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripInfo {
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Number of planned days
    pub duration: i64,
    pub budget: BudgetTier,
    #[serde(default)]
    pub preferences: Vec<String>,
    #[serde(default)]
    pub purpose: String,
    pub season: Season,
    #[serde(default)]
    pub summary: String,
}

/// Time of day a slot belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayPeriod {
    Morning,
    Afternoon,
    Evening,
}

impl DayPeriod {
    pub const ALL: [DayPeriod; 3] = [DayPeriod::Morning, DayPeriod::Afternoon, DayPeriod::Evening];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DayPeriod::Morning => "Morning",
            DayPeriod::Afternoon => "Afternoon",
            DayPeriod::Evening => "Evening",
        }
    }
}

/// One activity slot
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl Activity {
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Plan for a single day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    /// 1-based day number
    pub day: u32,
    pub date: NaiveDate,
    #[serde(default)]
    pub day_name: String,
    #[serde(default)]
    pub weather: String,
    #[serde(default)]
    pub temperature: String,
    #[serde(default = "default_weather_icon")]
    pub weather_icon: String,
    #[serde(default)]
    pub morning: Activity,
    #[serde(default)]
    pub afternoon: Activity,
    #[serde(default)]
    pub evening: Activity,
    #[serde(default)]
    pub accommodation: String,
}

fn default_weather_icon() -> String {
    "☀️".to_string()
}

impl DayPlan {
    #[must_use]
    pub fn activity(&self, period: DayPeriod) -> &Activity {
        match period {
            DayPeriod::Morning => &self.morning,
            DayPeriod::Afternoon => &self.afternoon,
            DayPeriod::Evening => &self.evening,
        }
    }
}

impl Itinerary {
    /// Verify day count, numbering and dates against the trip range
    pub fn check_consistency(&self) -> Result<(), TravelMagicError> {
        let info = &self.trip_info;
        let expected = (info.end_date - info.start_date).num_days();

        if info.duration != expected {
            return Err(TravelMagicError::validation(format!(
                "Trip duration {} does not match date range of {expected} days",
                info.duration
            )));
        }

        if self.daily_plan.len() as i64 != expected {
            return Err(TravelMagicError::validation(format!(
                "Itinerary has {} days but the trip spans {expected}",
                self.daily_plan.len()
            )));
        }

        for (index, day) in self.daily_plan.iter().enumerate() {
            let expected_date = info.start_date + Duration::days(index as i64);
            if day.day as usize != index + 1 {
                return Err(TravelMagicError::validation(format!(
                    "Day {} is out of sequence (expected {})",
                    day.day,
                    index + 1
                )));
            }
            if day.date != expected_date {
                return Err(TravelMagicError::validation(format!(
                    "Day {} is dated {} but should be {expected_date}",
                    day.day, day.date
                )));
            }
            let weekday = day.date.format("%A").to_string();
            if !day.day_name.is_empty() && !day.day_name.eq_ignore_ascii_case(&weekday) {
                return Err(TravelMagicError::validation(format!(
                    "Day {} is named {} but {} is a {weekday}",
                    day.day, day.day_name, day.date
                )));
            }
        }

        Ok(())
    }

    /// Consistency plus a named weekday and a titled activity in every slot
    pub fn check_complete(&self) -> Result<(), TravelMagicError> {
        self.check_consistency()?;
        for day in &self.daily_plan {
            if day.day_name.is_empty() {
                return Err(TravelMagicError::validation(format!(
                    "Day {} has no day name",
                    day.day
                )));
            }
            if let Some(period) = DayPeriod::ALL
                .into_iter()
                .find(|period| day.activity(*period).title.trim().is_empty())
            {
                return Err(TravelMagicError::validation(format!(
                    "Day {} has no {} activity",
                    day.day,
                    period.as_str().to_lowercase()
                )));
            }
        }
        Ok(())
    }

    /// Verify the itinerary was planned for `request`'s destination and dates
    pub fn check_request(&self, request: &TripRequest) -> Result<(), TravelMagicError> {
        let info = &self.trip_info;
        if !info
            .destination
            .trim()
            .eq_ignore_ascii_case(request.destination.trim())
        {
            return Err(TravelMagicError::validation(format!(
                "Itinerary is for {} but the trip is to {}",
                info.destination, request.destination
            )));
        }
        if info.start_date != request.start_date || info.end_date != request.end_date {
            return Err(TravelMagicError::validation(format!(
                "Itinerary covers {} to {} but the trip is {} to {}",
                info.start_date, info.end_date, request.start_date, request.end_date
            )));
        }
        Ok(())
    }

    /// Every activity title in plan order, skipping empty slots
    pub fn activity_titles(&self) -> impl Iterator<Item = (u32, DayPeriod, &str)> {
        self.daily_plan.iter().flat_map(|day| {
            DayPeriod::ALL.into_iter().filter_map(move |period| {
                let title = day.activity(period).title.as_str();
                (!title.is_empty()).then_some((day.day, period, title))
            })
        })
    }
}

impl Display for DayPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Day {}: {} ({})", self.day, self.day_name, self.date)?;
        writeln!(f, "   {} {} | {}", self.weather_icon, self.weather, self.temperature)?;
        for period in DayPeriod::ALL {
            let activity = self.activity(period);
            writeln!(f, "   🕘 {}: {}", period.as_str(), activity.title)?;
            if !activity.description.is_empty() {
                writeln!(f, "      {}", activity.description)?;
            }
        }
        if !self.accommodation.is_empty() {
            writeln!(f, "   🏨 {}", self.accommodation)?;
        }
        Ok(())
    }
}

impl Display for Itinerary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let info = &self.trip_info;
        writeln!(
            f,
            "🗺️ {} - {} to {} ({} days, {})",
            info.destination,
            info.start_date.format("%b %d"),
            info.end_date.format("%b %d, %Y"),
            info.duration,
            info.budget
        )?;
        if !info.summary.is_empty() {
            writeln!(f, "{}", info.summary)?;
        }
        for day in &self.daily_plan {
            writeln!(f)?;
            write!(f, "{day}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Itinerary {
        let start = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let daily_plan = (0..2)
            .map(|i| DayPlan {
                day: i + 1,
                date: start + Duration::days(i64::from(i)),
                day_name: (start + Duration::days(i64::from(i))).format("%A").to_string(),
                weather: "Clear sky".to_string(),
                temperature: "18°C - 26°C".to_string(),
                weather_icon: "☀️".to_string(),
                morning: Activity::new("Lisbon Viewpoint", "Views."),
                afternoon: Activity::new("Old Town Lisbon", "Walk."),
                evening: Activity::new("Cafe Lisbon", "Dinner."),
                accommodation: "Stay at Boutique hotel in Lisbon".to_string(),
            })
            .collect();

        Itinerary {
            trip_info: TripInfo {
                destination: "Lisbon".to_string(),
                start_date: start,
                end_date: start + Duration::days(2),
                duration: 2,
                budget: BudgetTier::Medium,
                preferences: vec!["Food".to_string()],
                purpose: "Leisure".to_string(),
                season: Season::Summer,
                summary: "Two days in Lisbon.".to_string(),
            },
            daily_plan,
        }
    }

    #[test]
    fn test_consistent_itinerary_passes() {
        assert!(sample().check_consistency().is_ok());
    }

    #[test]
    fn test_missing_day_is_rejected() {
        let mut itinerary = sample();
        itinerary.daily_plan.pop();
        let err = itinerary.check_consistency().unwrap_err();
        assert!(err.to_string().contains("has 1 days"));
    }

    #[test]
    fn test_out_of_range_date_is_rejected() {
        let mut itinerary = sample();
        itinerary.daily_plan[1].date = NaiveDate::from_ymd_opt(2026, 6, 9).unwrap();
        assert!(itinerary.check_consistency().is_err());
    }

    #[test]
    fn test_wrong_duration_is_rejected() {
        let mut itinerary = sample();
        itinerary.trip_info.duration = 5;
        assert!(itinerary.check_consistency().is_err());
    }

    #[test]
    fn test_wrong_day_name_is_rejected() {
        let mut itinerary = sample();
        itinerary.daily_plan[0].day_name = "Friday".to_string();
        let err = itinerary.check_consistency().unwrap_err();
        assert!(err.to_string().contains("is a Monday"));

        itinerary.daily_plan[0].day_name = "monday".to_string();
        assert!(itinerary.check_consistency().is_ok());
    }

    #[test]
    fn test_complete_requires_titles_and_names() {
        assert!(sample().check_complete().is_ok());

        let mut itinerary = sample();
        itinerary.daily_plan[1].afternoon = Activity::default();
        assert!(itinerary.check_consistency().is_ok());
        let err = itinerary.check_complete().unwrap_err();
        assert!(err.to_string().contains("Day 2 has no afternoon activity"));

        let mut itinerary = sample();
        itinerary.daily_plan[0].day_name.clear();
        assert!(itinerary.check_complete().is_err());
    }

    #[test]
    fn test_check_request() {
        let itinerary = sample();
        let start = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let request = TripRequest::new(" lisbon ", start, start + Duration::days(2));
        assert!(itinerary.check_request(&request).is_ok());

        let elsewhere = TripRequest::new("Tokyo", start, start + Duration::days(2));
        assert!(itinerary.check_request(&elsewhere).is_err());

        let later = TripRequest::new("Lisbon", start, start + Duration::days(3));
        let err = itinerary.check_request(&later).unwrap_err();
        assert!(err.to_string().contains("covers 2026-06-01 to 2026-06-03"));
    }

    #[test]
    fn test_export_field_names() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["trip_info"]["budget"], "Medium");
        assert_eq!(value["trip_info"]["start_date"], "2026-06-01");
        assert_eq!(value["daily_plan"][0]["day"], 1);
        assert_eq!(value["daily_plan"][0]["morning"]["title"], "Lisbon Viewpoint");
        assert_eq!(value["daily_plan"][1]["day_name"], "Tuesday");
    }

    #[test]
    fn test_lenient_day_parsing() {
        let day: DayPlan =
            serde_json::from_str(r#"{"day": 1, "date": "2026-06-01", "morning": {"title": "Museum"}}"#)
                .unwrap();
        assert_eq!(day.weather_icon, "☀️");
        assert!(day.afternoon.title.is_empty());
        assert_eq!(day.morning.title, "Museum");
    }

    #[test]
    fn test_activity_titles_in_order() {
        let itinerary = sample();
        let titles: Vec<_> = itinerary.activity_titles().collect();
        assert_eq!(titles.len(), 6);
        assert_eq!(titles[0], (1, DayPeriod::Morning, "Lisbon Viewpoint"));
        assert_eq!(titles[5], (2, DayPeriod::Evening, "Cafe Lisbon"));
    }

    #[test]
    fn test_display_mentions_every_slot() {
        let rendered = sample().to_string();
        assert!(rendered.contains("Day 1: Monday (2026-06-01)"));
        assert!(rendered.contains("Afternoon: Old Town Lisbon"));
        assert!(rendered.contains("🏨 Stay at Boutique hotel in Lisbon"));
    }
}
