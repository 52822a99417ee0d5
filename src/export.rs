//! Itinerary JSON export

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::models::Itinerary;

/// Pretty-printed export document
pub fn to_json(itinerary: &Itinerary) -> Result<String> {
    serde_json::to_string_pretty(itinerary).context("Failed to serialize itinerary")
}

/// `<destination>_itinerary.json` with whitespace replaced by underscores
#[must_use]
pub fn file_name(destination: &str) -> String {
    let stem: String = destination
        .trim()
        .chars()
        .map(|c| match c {
            c if c.is_whitespace() => '_',
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect();
    let stem = if stem.is_empty() { "trip" } else { stem.as_str() };
    format!("{stem}_itinerary.json")
}

/// Write the export document into `dir`, returning the file path
pub fn write(itinerary: &Itinerary, dir: impl AsRef<Path>) -> Result<PathBuf> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;

    let path = dir.join(file_name(&itinerary.trip_info.destination));
    std::fs::write(&path, to_json(itinerary)?)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!(path = %path.display(), "Exported itinerary");
    Ok(path)
}

/// Read an exported document back
pub fn read(path: impl AsRef<Path>) -> Result<Itinerary> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not an itinerary", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Season, TripRequest};
    use crate::planner::template::build_itinerary;
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::rstest;

    #[rstest]
    #[case("Lisbon Portugal", "Lisbon_Portugal_itinerary.json")]
    #[case("New York", "New_York_itinerary.json")]
    #[case("  Oslo ", "Oslo_itinerary.json")]
    #[case("Paris, France", "Paris,_France_itinerary.json")]
    #[case("", "trip_itinerary.json")]
    fn test_file_name(#[case] destination: &str, #[case] expected: &str) {
        assert_eq!(file_name(destination), expected);
    }

    #[test]
    fn test_export_document_shape() {
        let request = TripRequest::new(
            "Lisbon Portugal",
            NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 6, 3).unwrap(),
        );
        let itinerary =
            build_itinerary(&request, Season::Summer, &[], &mut StdRng::seed_from_u64(11));

        let json = to_json(&itinerary).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["trip_info"]["destination"], "Lisbon Portugal");
        assert_eq!(value["trip_info"]["start_date"], "2026-06-01");
        assert_eq!(value["daily_plan"].as_array().unwrap().len(), 2);
        assert_eq!(value["daily_plan"][0]["day_name"], "Monday");
        assert!(value["daily_plan"][1]["morning"]["title"].is_string());

        let dir = tempfile::tempdir().unwrap();
        let path = write(&itinerary, dir.path()).unwrap();
        assert!(path.ends_with("Lisbon_Portugal_itinerary.json"));
        assert_eq!(read(&path).unwrap(), itinerary);
    }

    #[test]
    fn test_read_rejects_other_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.json");
        std::fs::write(&path, r#"{"hello": "world"}"#).unwrap();
        assert!(read(&path).is_err());
    }
}
