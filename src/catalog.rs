//! Static destination content used by the template planner
//!
//! All entries are phrase templates filled with the destination name, so any
//! destination gets a plausible set of attractions, restaurants and
//! activities without network access.

use crate::models::{BudgetTier, Season};

/// Named places and things to do at a destination
#[derive(Debug, Clone, PartialEq)]
pub struct DestinationDetails {
    pub attractions: Vec<String>,
    pub restaurants: Vec<String>,
    pub activities: Vec<String>,
    /// Seasonal weather blurb
    pub weather_description: String,
    /// RGB palette for preview slides
    pub colors: [[u8; 3]; 3],
}

fn fill(templates: &[&str], destination: &str) -> Vec<String> {
    templates
        .iter()
        .map(|t| t.replace("{d}", destination))
        .collect()
}

const ATTRACTIONS: &[&str] = &[
    "{d} National Museum",
    "{d} Cathedral",
    "Historic District of {d}",
    "{d} Castle",
    "{d} Art Gallery",
    "Old Town {d}",
    "{d} Botanical Gardens",
    "{d} Viewpoint",
];

const RESTAURANTS: &[&str] = &[
    "The {d} Kitchen",
    "Cafe {d}",
    "{d} Bistro",
    "Traditional {d} Restaurant",
    "{d} Fine Dining",
    "Local Cuisine of {d}",
    "{d} Street Food Market",
    "Authentic {d} Eatery",
];

const ACTIVITIES: &[&str] = &[
    "Walking Tour of {d}",
    "{d} Boat Cruise",
    "Hiking in {d}",
    "{d} Cultural Experience",
    "Shopping in {d}",
    "{d} Nightlife Tour",
    "Cooking Class in {d}",
    "{d} Wine Tasting",
];

/// Attractions, restaurants and activities for a destination
#[must_use]
pub fn destination_details(destination: &str, season: Season) -> DestinationDetails {
    DestinationDetails {
        attractions: fill(ATTRACTIONS, destination),
        restaurants: fill(RESTAURANTS, destination),
        activities: fill(ACTIVITIES, destination),
        weather_description: season_weather_description(destination, season),
        colors: [[66, 135, 245], [240, 140, 50], [66, 186, 150]],
    }
}

#[must_use]
pub fn season_weather_description(destination: &str, season: Season) -> String {
    match season {
        Season::Spring => format!(
            "Mild temperatures with occasional rain showers in {destination}. Perfect for outdoor activities with proper rain gear."
        ),
        Season::Summer => format!(
            "Warm to hot temperatures in {destination}. Great for outdoor activities, but stay hydrated and use sun protection."
        ),
        Season::Fall => format!(
            "Cool temperatures with beautiful foliage in {destination}. Pack layers for changing temperatures throughout the day."
        ),
        Season::Winter => format!(
            "Cold temperatures with possible snow in {destination}. Dress warmly and check for winter activity availability."
        ),
    }
}

/// Five accommodation options for a budget tier
#[must_use]
pub fn budget_accommodations(destination: &str, tier: BudgetTier) -> Vec<String> {
    let templates: &[&str] = match tier {
        BudgetTier::Budget => &[
            "Hostel in {d}",
            "Budget hotel in {d}",
            "Guesthouse in {d}",
            "Affordable Airbnb in {d}",
            "Backpacker's lodge in {d}",
        ],
        BudgetTier::Medium => &[
            "3-star hotel in {d}",
            "Boutique hotel in {d}",
            "Comfortable Airbnb in {d}",
            "Mid-range resort in {d}",
            "Charming B&B in {d}",
        ],
        BudgetTier::Luxury => &[
            "5-star hotel in {d}",
            "Luxury resort in {d}",
            "Premium apartment in {d}",
            "Upscale villa in {d}",
            "Exclusive hotel in {d}",
        ],
    };
    fill(templates, destination)
}

/// Five tier-specific activities
#[must_use]
pub fn budget_activities(destination: &str, tier: BudgetTier) -> Vec<String> {
    let templates: &[&str] = match tier {
        BudgetTier::Budget => &[
            "Free walking tour of {d}",
            "Visit to public parks in {d}",
            "Explore local markets in {d}",
            "Street food tasting in {d}",
            "Self-guided tour of {d}",
        ],
        BudgetTier::Medium => &[
            "Guided museum tour in {d}",
            "Day tour around {d}",
            "Boat ride in {d}",
            "Cultural show in {d}",
            "Cooking class in {d}",
        ],
        BudgetTier::Luxury => &[
            "Private guided tour of {d}",
            "Exclusive experience in {d}",
            "VIP access to attractions in {d}",
            "Helicopter tour over {d}",
            "Private chef experience in {d}",
        ],
    };
    fill(templates, destination)
}

/// Keyword groups mapped to activity templates. The first group whose keyword
/// appears in a preference wins.
const PREFERENCE_ACTIVITIES: &[(&[&str], &[&str])] = &[
    (
        &["museum"],
        &["{d} National Museum", "{d} History Museum Tour", "Modern Art Museum of {d}"],
    ),
    (
        &["food", "cuisine", "culinary", "dining"],
        &["{d} Food Tour", "Local Market Tasting in {d}", "Cooking Class in {d}"],
    ),
    (
        &["hiking", "nature", "outdoor", "trek"],
        &["Nature Trail Hike near {d}", "{d} National Park", "Sunrise Hike above {d}"],
    ),
    (
        &["beach", "coast", "swim"],
        &["{d} Beach Day", "Coastal Walk in {d}", "Snorkeling Trip from {d}"],
    ),
    (
        &["nightlife", "bar", "club"],
        &["{d} Nightlife Tour", "Rooftop Bar Evening in {d}", "Live Music Venue in {d}"],
    ),
    (
        &["shopping", "market"],
        &["Shopping in {d}", "{d} Artisan Market", "Boutique District of {d}"],
    ),
    (
        &["history", "historic", "heritage"],
        &["Historic District of {d}", "{d} Castle", "Heritage Walking Tour of {d}"],
    ),
    (
        &["art", "gallery"],
        &["{d} Art Gallery", "Street Art Tour of {d}", "Contemporary Art Space in {d}"],
    ),
    (
        &["adventure", "sport", "extreme"],
        &["Kayaking Adventure in {d}", "Zipline Park near {d}", "Mountain Biking around {d}"],
    ),
    (
        &["relax", "spa", "wellness"],
        &["{d} Spa Retreat", "Thermal Baths of {d}", "Yoga Session in {d}"],
    ),
    (
        &["photo"],
        &["Photography Walk in {d}", "{d} Viewpoint at Golden Hour", "Sunset Photo Tour of {d}"],
    ),
    (
        &["architecture", "design"],
        &["Architecture Tour of {d}", "{d} Cathedral", "Landmark Buildings of {d}"],
    ),
    (
        &["wine", "vineyard"],
        &["{d} Wine Tasting", "Vineyard Tour near {d}", "Wine Bar Crawl in {d}"],
    ),
];

/// Activities matching each preference, in preference order
#[must_use]
pub fn preference_activities(destination: &str, preferences: &[String]) -> Vec<(String, Vec<String>)> {
    preferences
        .iter()
        .map(|preference| {
            let needle = preference.to_lowercase();
            let activities = PREFERENCE_ACTIVITIES
                .iter()
                .find(|(keywords, _)| keywords.iter().any(|k| needle.contains(k)))
                .map(|(_, templates)| fill(templates, destination))
                .unwrap_or_else(|| vec![format!("{preference} experience in {destination}")]);
            (preference.clone(), activities)
        })
        .collect()
}
