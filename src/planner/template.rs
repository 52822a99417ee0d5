//! Template itinerary synthesis
//!
//! Builds a day plan from the catalog tables with randomized selection.
//! Titles used on earlier days are avoided until the pool runs dry, and a
//! day's afternoon never repeats its morning.

use std::collections::{HashMap, HashSet, VecDeque};

use chrono::NaiveDate;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use super::describe;
use crate::catalog;
use crate::models::{Activity, DayPlan, DayWeather, Itinerary, Season, TripInfo, TripRequest};

/// Pick a random candidate, preferring ones not in `used` and never one in `exclude`
fn pick<R: Rng + ?Sized>(
    candidates: &[String],
    used: &HashSet<String>,
    exclude: &[&str],
    rng: &mut R,
) -> Option<String> {
    let allowed: Vec<&String> = candidates
        .iter()
        .filter(|c| !exclude.contains(&c.as_str()))
        .collect();
    let fresh: Vec<&String> = allowed
        .iter()
        .copied()
        .filter(|c| !used.contains(*c))
        .collect();

    let choice = if fresh.is_empty() {
        allowed.choose(rng)
    } else {
        fresh.choose(rng)
    };
    choice.map(|c| (*c).clone())
}

/// Build a complete itinerary for a validated request
pub fn build_itinerary<R: Rng + ?Sized>(
    request: &TripRequest,
    season: Season,
    weather: &[DayWeather],
    rng: &mut R,
) -> Itinerary {
    let destination = request.destination.as_str();
    let duration = request.duration_days();

    let details = catalog::destination_details(destination, season);
    let accommodations = catalog::budget_accommodations(destination, request.budget);

    let mut pool: Vec<String> = Vec::new();
    for title in details
        .attractions
        .iter()
        .chain(&details.activities)
        .chain(&catalog::budget_activities(destination, request.budget))
    {
        if !pool.contains(title) {
            pool.push(title.clone());
        }
    }

    let mut preference_queue: VecDeque<String> =
        catalog::preference_activities(destination, &request.preferences)
            .into_iter()
            .flat_map(|(_, activities)| activities)
            .collect();

    let weather_by_date: HashMap<NaiveDate, &DayWeather> =
        weather.iter().map(|w| (w.date, w)).collect();

    let accommodation = accommodations
        .choose(rng)
        .cloned()
        .unwrap_or_else(|| format!("a hotel in {destination}"));

    let mut used: HashSet<String> = HashSet::new();
    let mut used_restaurants: HashSet<String> = HashSet::new();
    let mut daily_plan = Vec::with_capacity(duration.max(0) as usize);

    for (index, date) in request.dates().enumerate() {
        let day = index + 1;

        let mut morning = None;
        if day <= request.preferences.len() {
            while let Some(candidate) = preference_queue.pop_front() {
                if !used.contains(&candidate) {
                    morning = Some(candidate);
                    break;
                }
            }
        }
        let morning = morning
            .or_else(|| pick(&pool, &used, &[], rng))
            .unwrap_or_else(|| format!("Explore {destination}"));

        let afternoon = pick(&pool, &used, &[morning.as_str()], rng)
            .unwrap_or_else(|| format!("Explore the neighborhoods of {destination}"));

        let evening = pick(&details.restaurants, &used_restaurants, &[], rng)
            .unwrap_or_else(|| "Local restaurant".to_string());

        used.insert(morning.clone());
        used.insert(afternoon.clone());
        used_restaurants.insert(evening.clone());

        let day_weather = weather_by_date
            .get(&date)
            .map(|w| (*w).clone())
            .unwrap_or_else(|| DayWeather::seasonal(date, season));

        debug!(day, %date, %morning, %afternoon, %evening, "Planned day");

        daily_plan.push(DayPlan {
            day: day as u32,
            date,
            day_name: date.format("%A").to_string(),
            weather: day_weather.weather,
            temperature: day_weather.temperature,
            weather_icon: day_weather.icon,
            morning: Activity::new(&morning, describe::morning(&morning, destination, season)),
            afternoon: Activity::new(
                &afternoon,
                describe::afternoon(&afternoon, destination, season),
            ),
            evening: Activity::new(&evening, describe::evening(&evening, destination, season)),
            accommodation: describe::accommodation(&accommodation, request.budget),
        });
    }

    let summary = describe::summary(
        destination,
        duration,
        request.budget,
        &request.purpose,
        &request.preferences,
    );

    Itinerary {
        trip_info: TripInfo {
            destination: destination.to_string(),
            start_date: request.start_date,
            end_date: request.end_date,
            duration,
            budget: request.budget,
            preferences: request.preferences.clone(),
            purpose: request.purpose.clone(),
            season,
            summary,
        },
        daily_plan,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BudgetTier;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn request(days: i64) -> TripRequest {
        let start = NaiveDate::from_ymd_opt(2026, 9, 14).unwrap();
        TripRequest::new("Prague", start, start + chrono::Duration::days(days))
            .with_budget(BudgetTier::Budget)
            .with_preferences(["Museums", "Food"])
            .with_purpose("Cultural exploration")
    }

    #[test]
    fn test_day_count_matches_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for days in [1, 3, 7, 21] {
            let itinerary = build_itinerary(&request(days), Season::Fall, &[], &mut rng);
            assert_eq!(itinerary.daily_plan.len() as i64, days);
            assert!(itinerary.check_consistency().is_ok());
        }
    }

    #[test]
    fn test_same_seed_same_itinerary() {
        let a = build_itinerary(&request(5), Season::Fall, &[], &mut StdRng::seed_from_u64(42));
        let b = build_itinerary(&request(5), Season::Fall, &[], &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_preferences_fill_first_mornings() {
        let mut rng = StdRng::seed_from_u64(1);
        let itinerary = build_itinerary(&request(4), Season::Fall, &[], &mut rng);
        assert_eq!(itinerary.daily_plan[0].morning.title, "Prague National Museum");
        assert_eq!(itinerary.daily_plan[1].morning.title, "Prague History Museum Tour");
    }

    #[test]
    fn test_no_repeats_while_pool_lasts() {
        let mut rng = StdRng::seed_from_u64(3);
        // 21 unique pool entries cover 10 days of two slots each
        let itinerary = build_itinerary(&request(10), Season::Fall, &[], &mut rng);
        let mut seen = HashSet::new();
        for day in &itinerary.daily_plan {
            assert_ne!(day.morning.title, day.afternoon.title);
            assert!(seen.insert(day.morning.title.clone()), "repeat: {}", day.morning.title);
            assert!(seen.insert(day.afternoon.title.clone()), "repeat: {}", day.afternoon.title);
        }
    }

    #[test]
    fn test_long_trip_never_repeats_within_a_day() {
        let mut rng = StdRng::seed_from_u64(11);
        let itinerary = build_itinerary(&request(30), Season::Fall, &[], &mut rng);
        assert_eq!(itinerary.daily_plan.len(), 30);
        for day in &itinerary.daily_plan {
            assert_ne!(day.morning.title, day.afternoon.title);
        }
    }

    #[test]
    fn test_weather_is_attached_by_date() {
        let request = request(2);
        let weather = vec![DayWeather {
            date: request.start_date + chrono::Duration::days(1),
            weather: "Slight rain".to_string(),
            temperature: "9°C - 14°C".to_string(),
            icon: "🌧️".to_string(),
        }];
        let itinerary =
            build_itinerary(&request, Season::Fall, &weather, &mut StdRng::seed_from_u64(5));
        assert_eq!(itinerary.daily_plan[0].weather, "Typical Fall weather");
        assert_eq!(itinerary.daily_plan[1].weather, "Slight rain");
        assert_eq!(itinerary.daily_plan[1].weather_icon, "🌧️");
    }

    #[test]
    fn test_trip_info_and_accommodation() {
        let itinerary = build_itinerary(&request(3), Season::Fall, &[], &mut StdRng::seed_from_u64(9));
        let info = &itinerary.trip_info;
        assert_eq!(info.destination, "Prague");
        assert_eq!(info.duration, 3);
        assert_eq!(info.budget, BudgetTier::Budget);
        assert!(info.summary.contains("educational journey"));
        assert!(info.summary.contains("Featuring Museums and Food"));

        let accommodation = &itinerary.daily_plan[0].accommodation;
        assert!(accommodation.contains("budget-level"));
        assert!(itinerary.daily_plan.iter().all(|d| &d.accommodation == accommodation));
    }
}
