//! Trip preview slideshow plan
//!
//! Turns an itinerary into slides (one per activity) carrying an image
//! search query and a stable per-slide seed. Fetching images is left to the
//! consumer; `fallback_queries` lists what to try when the first query
//! yields nothing.

use std::sync::LazyLock;

use rand::Rng;
use rand::seq::SliceRandom;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::models::{DayPeriod, Itinerary};

pub const DEFAULT_HIGHLIGHTS: usize = 6;

const VISUAL_DESCRIPTORS: &[&str] = &[
    "beautiful",
    "scenic",
    "panoramic",
    "iconic",
    "famous",
    "stunning",
    "picturesque",
    "impressive",
    "popular",
];

// checked in order, first substring match wins
const ACTIVITY_TERMS: &[(&str, &str)] = &[
    ("hiking", "mountain trail"),
    ("trekking", "scenic path"),
    ("museum", "art exhibit"),
    ("beach", "coastal view"),
    ("snorkeling", "underwater reef"),
    ("diving", "coral exploration"),
    ("skiing", "snowy slopes"),
    ("snowboarding", "alpine terrain"),
    ("shopping", "local markets"),
    ("nightlife", "live music scene"),
    ("food", "local cuisine"),
    ("wine tasting", "vineyard tour"),
    ("historical sites", "ancient ruins"),
    ("temples", "sacred architecture"),
    ("road trip", "scenic drive"),
    ("wildlife safari", "animal reserve"),
    ("kayaking", "river adventure"),
    ("camping", "forest campsite"),
    ("photography", "panoramic landscape"),
    ("hot air balloon", "sunrise aerial view"),
    ("amusement park", "rollercoaster ride"),
    ("cruise", "ocean voyage"),
    ("biking", "trail ride"),
    ("local tour", "city exploration"),
    ("cultural experience", "traditional festival"),
    ("street food", "food stalls"),
    ("spa", "relaxing retreat"),
    ("festival", "crowded celebration"),
    ("art gallery", "modern art exhibit"),
    ("architecture tour", "iconic buildings"),
    ("boat ride", "canal cruise"),
];

const ACTIVITY_TYPES: &[&str] = &[
    "museum",
    "restaurant",
    "park",
    "tower",
    "palace",
    "cafe",
    "gallery",
    "market",
    "garden",
    "monument",
    "bistro",
    "shopping",
];

static GENERIC_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(visit|experience|tour|discover|explore|enjoy|at|the|a|an|in|to)\b")
        .expect("generic word pattern is valid")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub day: u32,
    pub day_name: String,
    pub period: DayPeriod,
    pub title: String,
    pub caption: String,
    pub search_query: String,
    /// Tried in order when `search_query` finds no image
    pub fallback_queries: Vec<String>,
    /// Stable per slide so repeated previews pick the same image
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub day: u32,
    pub period: DayPeriod,
    pub title: String,
}

/// Slides and highlights for one itinerary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripPreview {
    pub destination: String,
    pub summary: String,
    /// What the season usually brings at the destination
    pub weather_outlook: String,
    /// RGB slide colours
    pub palette: [[u8; 3]; 3],
    pub slides: Vec<Slide>,
    pub highlights: Vec<Highlight>,
}

impl TripPreview {
    pub fn build<R: Rng + ?Sized>(itinerary: &Itinerary, rng: &mut R) -> Self {
        let info = &itinerary.trip_info;
        let details = catalog::destination_details(main_location(&info.destination), info.season);
        Self {
            destination: info.destination.clone(),
            summary: info.summary.clone(),
            weather_outlook: details.weather_description,
            palette: details.colors,
            slides: build_slides(itinerary, rng),
            highlights: highlights(itinerary, DEFAULT_HIGHLIGHTS),
        }
    }
}

fn period_offset(period: DayPeriod) -> u64 {
    match period {
        DayPeriod::Morning => 1,
        DayPeriod::Afternoon => 2,
        DayPeriod::Evening => 3,
    }
}

fn placeholder_activity(period: DayPeriod) -> &'static str {
    match period {
        DayPeriod::Morning => "morning view",
        DayPeriod::Afternoon => "afternoon activity",
        DayPeriod::Evening => "evening scene",
    }
}

/// Destination name before the first comma ("Paris" from "Paris, France")
fn main_location(destination: &str) -> &str {
    destination.split(',').next().unwrap_or(destination).trim()
}

/// One slide per day and period
pub fn build_slides<R: Rng + ?Sized>(itinerary: &Itinerary, rng: &mut R) -> Vec<Slide> {
    let destination = &itinerary.trip_info.destination;
    let mut slides = Vec::with_capacity(itinerary.daily_plan.len() * DayPeriod::ALL.len());

    for (day_index, day) in itinerary.daily_plan.iter().enumerate() {
        let day_seed = (day_index as u64 + 1) * 1000;
        for period in DayPeriod::ALL {
            let title = day.activity(period).title.trim();
            let subject = if title.is_empty() {
                placeholder_activity(period)
            } else {
                title
            };

            slides.push(Slide {
                day: day.day,
                day_name: day.day_name.clone(),
                period,
                title: title.to_string(),
                caption: subject.to_string(),
                search_query: search_query(destination, subject, rng),
                fallback_queries: fallback_queries(main_location(destination), subject),
                seed: day_seed + period_offset(period),
            });
        }
    }
    slides
}

/// Image search query for an activity at a destination
pub fn search_query<R: Rng + ?Sized>(destination: &str, activity: &str, rng: &mut R) -> String {
    let activity = activity.trim().to_lowercase();
    let descriptor = VISUAL_DESCRIPTORS.choose(rng).copied().unwrap_or("scenic");

    if let Some((_, term)) = ACTIVITY_TERMS.iter().find(|(key, _)| activity.contains(key)) {
        return format!("{descriptor} {term}");
    }

    let location = main_location(destination);
    let stripped = GENERIC_WORDS.replace_all(&activity, "");
    let remainder = WHITESPACE.replace_all(&stripped, " ");
    let remainder = remainder.trim();

    if remainder.is_empty() {
        format!("{descriptor} {location} landmark")
    } else {
        format!("{descriptor} {location} {remainder}")
    }
}

/// Queries to try in order after `search_query` comes back empty
#[must_use]
pub fn fallback_queries(destination: &str, activity: &str) -> Vec<String> {
    let lowered = activity.to_lowercase();
    let activity_type = ACTIVITY_TYPES
        .iter()
        .find(|t| lowered.contains(*t))
        .copied()
        .unwrap_or("landmark");

    vec![
        format!("{destination} {activity}"),
        format!("{destination} {activity} travel"),
        format!("{destination} {activity_type}"),
        format!("{destination} landmark famous"),
    ]
}

/// First `limit` non-empty activity titles in plan order
#[must_use]
pub fn highlights(itinerary: &Itinerary, limit: usize) -> Vec<Highlight> {
    itinerary
        .activity_titles()
        .take(limit)
        .map(|(day, period, title)| Highlight {
            day,
            period,
            title: title.to_string(),
        })
        .collect()
}
