//! Language model integration
//!
//! The planner only needs "prompt in, text out". Prompt construction and
//! response cleanup live here so they can be tested without a model.

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{DayWeather, Season, TripRequest};

pub mod openai;

pub use openai::OpenAiCompatibleClient;

/// Text completion backend
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String>;
}

/// Build the itinerary prompt for a request
#[must_use]
pub fn build_prompt(request: &TripRequest, season: Season, weather: &[DayWeather]) -> String {
    let duration = request.duration_days();
    let preferences = if request.preferences.is_empty() {
        "general sightseeing".to_string()
    } else {
        request.preferences.join(", ")
    };
    let preferences_json =
        serde_json::to_string(&request.preferences).unwrap_or_else(|_| "[]".to_string());
    let weather_lines: String = weather
        .iter()
        .map(|w| format!("{}\n", w.prompt_line()))
        .collect();

    let destination = &request.destination;
    let budget = request.budget;
    let purpose = &request.purpose;
    let start_iso = request.start_date.format("%Y-%m-%d");
    let end_iso = request.end_date.format("%Y-%m-%d");
    let start_long = request.start_date.format("%B %d, %Y");
    let end_long = request.end_date.format("%B %d, %Y");
    let start_day = request.start_date.format("%A");

    format!(
        r#"Create a detailed travel itinerary for a {duration}-day trip to {destination} with the following details:
- Budget level: {budget}
- Travel dates: {start_long} to {end_long}
- Season: {season}
- Trip purpose: {purpose}
- Preferences: {preferences}

Weather forecast:
{weather_lines}
Return a complete itinerary with day-by-day activities formatted as valid JSON with this structure:
{{
  "trip_info": {{
    "destination": "{destination}",
    "start_date": "{start_iso}",
    "end_date": "{end_iso}",
    "duration": {duration},
    "budget": "{budget}",
    "preferences": {preferences_json},
    "purpose": "{purpose}",
    "season": "{season}",
    "summary": "Brief 2-3 sentence overview of the trip"
  }},
  "daily_plan": [
    {{
      "day": 1,
      "date": "{start_iso}",
      "day_name": "{start_day}",
      "weather": "Weather description",
      "temperature": "Temperature range",
      "weather_icon": "Weather emoji",
      "morning": {{"title": "Morning activity name", "description": "Detailed description of morning activity"}},
      "afternoon": {{"title": "Afternoon activity name", "description": "Detailed description of afternoon activity"}},
      "evening": {{"title": "Evening activity name", "description": "Detailed description of evening activity"}},
      "accommodation": "Accommodation details"
    }}
  ]
}}

Make sure to:
1. Include exactly {duration} entries in daily_plan, one per consecutive date starting {start_iso}
2. Include realistic activities specific to {destination}
3. Consider the weather forecast when suggesting outdoor activities
4. Match activities to the user's preferences
5. Suggest accommodation and dining options appropriate for the {budget} level
6. Include specific names of attractions, restaurants, and places
7. Format the response as valid JSON that can be parsed without errors
"#
    )
}

/// Pull the JSON payload out of a model response
///
/// Prefers a ```json fence, then any ``` fence, then the whole text.
#[must_use]
pub fn extract_json(response: &str) -> &str {
    if let Some((_, rest)) = response.split_once("```json") {
        return rest.split("```").next().unwrap_or(rest).trim();
    }
    if let Some((_, rest)) = response.split_once("```") {
        return rest.split("```").next().unwrap_or(rest).trim();
    }
    response.trim()
}
