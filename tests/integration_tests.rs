//! Integration tests for TravelMagic

use std::process::Command;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use rand::SeedableRng;
use rand::rngs::StdRng;

use travelmagic::config::WeatherConfig;
use travelmagic::{
    BudgetTier, Itinerary, ItineraryPlanner, ItineraryStore, PersistentCache, PlanSource,
    TripPreview, TripRequest, WeatherService, export,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn offline_weather() -> WeatherService {
    let config = WeatherConfig {
        enabled: false,
        ..WeatherConfig::default()
    };
    WeatherService::new(&config, None, Duration::from_secs(60)).unwrap()
}

fn family_trip() -> TripRequest {
    let mut request = TripRequest::new("Barcelona, Spain", date(2026, 8, 3), date(2026, 8, 8))
        .with_budget(BudgetTier::Budget)
        .with_preferences(["Beaches", "food", " ", "Food"])
        .with_purpose("Family vacation");
    request.validate(30).unwrap();
    request
}

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_travelmagic"))
}

#[tokio::test]
async fn test_plan_export_save_roundtrip() {
    let request = family_trip();
    assert_eq!(request.preferences, vec!["Beaches", "food"]);

    let planner = ItineraryPlanner::new(Some(2026));
    let planned = planner
        .plan(&offline_weather(), &request, date(2026, 7, 1))
        .await;

    assert_eq!(planned.source, PlanSource::Template);
    let itinerary = &planned.itinerary;
    itinerary.check_consistency().unwrap();
    assert_eq!(itinerary.daily_plan.len(), 5);
    assert_eq!(itinerary.daily_plan[0].day_name, "Monday");
    assert_eq!(itinerary.daily_plan[4].date, date(2026, 8, 7));
    assert!(itinerary.trip_info.summary.contains("5-day budget adventure"));
    assert_eq!(planned.weather.len(), 5);

    for day in &itinerary.daily_plan {
        assert_ne!(day.morning.title, day.afternoon.title);
    }

    // export document reads back unchanged
    let dir = tempfile::tempdir().unwrap();
    let path = export::write(itinerary, dir.path().join("exports")).unwrap();
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "Barcelona,_Spain_itinerary.json"
    );
    let reread: Itinerary = export::read(&path).unwrap();
    assert_eq!(&reread, itinerary);

    let store = ItineraryStore::new(PersistentCache::open(dir.path().join("store")).unwrap());
    let saved = store
        .save(&request, planned.itinerary.clone(), planned.weather.clone())
        .await
        .unwrap();
    let loaded = store.get(&saved.id).await.unwrap().unwrap();
    assert_eq!(loaded.itinerary, planned.itinerary);
    assert_eq!(loaded.preferences, vec!["Beaches", "food"]);
    assert_eq!(loaded.trip_purpose, "Family vacation");
    assert_eq!(store.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_same_seed_same_trip() {
    let request = family_trip();
    let weather = Arc::new(offline_weather());

    let a = ItineraryPlanner::new(Some(5))
        .plan(&weather, &request, date(2026, 7, 1))
        .await;
    let b = ItineraryPlanner::new(Some(5))
        .plan(&weather, &request, date(2026, 7, 1))
        .await;
    assert_eq!(a.itinerary, b.itinerary);
}

#[tokio::test]
async fn test_preview_of_planned_trip() {
    let planned = ItineraryPlanner::new(Some(9))
        .plan(&offline_weather(), &family_trip(), date(2026, 7, 1))
        .await;

    let preview = TripPreview::build(&planned.itinerary, &mut StdRng::seed_from_u64(1));
    assert_eq!(preview.slides.len(), 15);
    assert_eq!(preview.slides.last().unwrap().seed, 5003);
    assert_eq!(preview.highlights.len(), 6);
    assert!(
        preview
            .slides
            .iter()
            .all(|slide| !slide.search_query.trim().is_empty())
    );
}

#[test]
fn test_cli_help() {
    let output = bin().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("itinerary planner"));
    assert!(stdout.contains("plan"));
    assert!(stdout.contains("saved"));
}

#[test]
fn test_cli_plan_json() {
    let dir = tempfile::tempdir().unwrap();
    let output = bin()
        .env("TRAVELMAGIC_STORAGE__LOCATION", dir.path())
        .args([
            "--config",
            dir.path().join("missing.toml").to_str().unwrap(),
            "plan",
            "Oslo",
            "--start",
            "2026-12-01",
            "--end",
            "2026-12-04",
            "--budget",
            "luxury",
            "-p",
            "museums",
            "--no-weather",
            "--seed",
            "3",
            "--json",
            "--save",
        ])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );

    let itinerary: Itinerary = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(itinerary.daily_plan.len(), 3);
    assert_eq!(itinerary.trip_info.budget, BudgetTier::Luxury);
    assert_eq!(itinerary.daily_plan[0].weather, "Typical Winter weather");
    assert!(String::from_utf8_lossy(&output.stderr).contains("Saved as itin_"));

    let listed = bin()
        .env("TRAVELMAGIC_STORAGE__LOCATION", dir.path())
        .args([
            "--config",
            dir.path().join("missing.toml").to_str().unwrap(),
            "saved",
            "list",
        ])
        .output()
        .unwrap();
    assert!(listed.status.success());
    assert!(String::from_utf8_lossy(&listed.stdout).contains("Trip to Oslo"));
}

#[test]
fn test_cli_rejects_reversed_dates() {
    let dir = tempfile::tempdir().unwrap();
    let output = bin()
        .env("TRAVELMAGIC_STORAGE__LOCATION", dir.path())
        .args([
            "--config",
            dir.path().join("missing.toml").to_str().unwrap(),
            "plan",
            "Oslo",
            "--start",
            "2026-12-04",
            "--end",
            "2026-12-01",
            "--no-weather",
        ])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("must be after"));
}

#[test]
fn test_cli_reports_missing_saved_itinerary() {
    let dir = tempfile::tempdir().unwrap();
    let output = bin()
        .env("TRAVELMAGIC_STORAGE__LOCATION", dir.path())
        .args([
            "--config",
            dir.path().join("missing.toml").to_str().unwrap(),
            "saved",
            "show",
            "itin_nope",
        ])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Not found: No saved itinerary with id itin_nope"));
}
