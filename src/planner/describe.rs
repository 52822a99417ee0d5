//! Keyword-driven prose for activity slots and the trip summary

use crate::models::{BudgetTier, Season};

/// A prose rule: any keyword found in the title selects the template.
/// Templates use `{d}` for the destination and `{s}` for the season.
type Rule = (&'static [&'static str], &'static str);

const MORNING_RULES: &[Rule] = &[
    (
        &["Museum", "Gallery"],
        "Explore the fascinating exhibits and learn about the cultural heritage of {d}. Allow 2-3 hours to fully appreciate the collections.",
    ),
    (
        &["Park", "Garden", "Nature"],
        "Enjoy the natural beauty and fresh air while taking a leisurely stroll through this scenic area. Perfect for morning photography in the {s} light.",
    ),
    (
        &["Tour"],
        "This guided experience will introduce you to the highlights of {d}, with expert commentary on the history and significance of key landmarks.",
    ),
];
const MORNING_DEFAULT: &str = "This is one of {d}'s must-visit attractions, offering a perfect start to your day with unforgettable experiences.";

const AFTERNOON_RULES: &[Rule] = &[
    (
        &["Historic", "Castle", "Cathedral"],
        "Immerse yourself in the rich history of this landmark, dating back centuries and showcasing impressive architecture and cultural significance.",
    ),
    (
        &["Market", "Shopping"],
        "Browse the various stalls and shops, where you can find local handicrafts, souvenirs, and specialty products unique to {d}.",
    ),
    (
        &["Cruise", "Boat"],
        "Enjoy spectacular views of {d} from the water, with opportunities for photos and a new perspective on this beautiful location.",
    ),
];
const AFTERNOON_DEFAULT: &str = "This experience showcases the authentic culture and charm of {d}, allowing you to create lasting memories of your trip.";

const EVENING_RULES: &[Rule] = &[
    (
        &["Traditional", "Local"],
        "Sample authentic dishes from {d}'s cuisine, prepared with traditional methods and local ingredients that capture the essence of the region.",
    ),
    (
        &["Fine", "Luxury"],
        "Indulge in an exceptional dining experience with premium ingredients and expert preparation in an elegant atmosphere.",
    ),
    (
        &["Cafe", "Bistro"],
        "Enjoy a casual yet delicious meal in a charming setting, perfect for relaxing after a day of exploration.",
    ),
];
const EVENING_DEFAULT: &str = "The menu features a range of options that will satisfy your taste buds and provide a genuine taste of {d}.";

fn render(rules: &[Rule], default: &str, title: &str, destination: &str, season: Season) -> String {
    let template = rules
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| title.contains(k)))
        .map_or(default, |(_, template)| template);
    template
        .replace("{d}", destination)
        .replace("{s}", season.as_str())
}

#[must_use]
pub fn morning(title: &str, destination: &str, season: Season) -> String {
    format!(
        "Start your day at {title}. {}",
        render(MORNING_RULES, MORNING_DEFAULT, title, destination, season)
    )
}

#[must_use]
pub fn afternoon(title: &str, destination: &str, season: Season) -> String {
    format!(
        "Head to {title} for your afternoon activities. {}",
        render(AFTERNOON_RULES, AFTERNOON_DEFAULT, title, destination, season)
    )
}

#[must_use]
pub fn evening(title: &str, destination: &str, season: Season) -> String {
    format!(
        "For dinner, enjoy a meal at {title}. {}",
        render(EVENING_RULES, EVENING_DEFAULT, title, destination, season)
    )
}

#[must_use]
pub fn accommodation(choice: &str, budget: BudgetTier) -> String {
    format!(
        "Stay at {choice}, offering comfortable {}-level accommodations with convenient access to the city's attractions.",
        budget.label()
    )
}

/// Narrative overview for the trip
#[must_use]
pub fn summary(
    destination: &str,
    duration: i64,
    budget: BudgetTier,
    purpose: &str,
    preferences: &[String],
) -> String {
    let mut summary = format!(
        "Experience the best of {destination} on this personalized {duration}-day {} adventure. ",
        budget.label()
    );

    let purpose = purpose.to_lowercase();
    if purpose.contains("family") {
        summary.push_str("This family-friendly itinerary includes activities that will delight travelers of all ages. ");
    } else if purpose.contains("romantic") {
        summary.push_str("Your romantic getaway features intimate experiences and beautiful settings perfect for couples. ");
    } else if purpose.contains("adventure") {
        summary.push_str("Packed with exciting activities, this adventure trip will satisfy your thirst for exploration. ");
    } else if purpose.contains("relaxation") {
        summary.push_str("Focused on relaxation and rejuvenation, this trip gives you plenty of time to unwind and enjoy. ");
    } else if purpose.contains("cultural") || purpose.contains("educational") {
        summary.push_str(&format!(
            "Immerse yourself in the rich culture and history of {destination} with this educational journey. "
        ));
    }

    match preferences {
        [] => {}
        [only] => summary.push_str(&format!(
            "With a focus on {only}, you'll discover the very best experiences {destination} has to offer."
        )),
        [init @ .., last] => summary.push_str(&format!(
            "Featuring {} and {last}, this itinerary is tailored to your specific interests and designed to create unforgettable memories.",
            init.join(", ")
        )),
    }

    summary.trim_end().to_string()
}
