//! Itinerary planning
//!
//! Tries the language model first when one is configured and falls back to
//! the template synthesizer on any failure, so a validated request always
//! yields an itinerary.

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, instrument, warn};

use crate::config::TravelMagicConfig;
use crate::llm::{self, OpenAiCompatibleClient, TextGenerator};
use crate::models::{DayWeather, Itinerary, Season, TripRequest};
use crate::weather::WeatherService;

pub mod describe;
pub mod template;

/// Where an itinerary came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanSource {
    LanguageModel,
    Template,
}

impl PlanSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PlanSource::LanguageModel => "language_model",
            PlanSource::Template => "template",
        }
    }
}

/// Itinerary together with the weather it was planned against
#[derive(Debug, Clone)]
pub struct PlannedTrip {
    pub itinerary: Itinerary,
    pub weather: Vec<DayWeather>,
    pub source: PlanSource,
}

pub struct ItineraryPlanner {
    generator: Option<Arc<dyn TextGenerator>>,
    max_tokens: u32,
    seed: Option<u64>,
}

impl ItineraryPlanner {
    /// Template-only planner
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            generator: None,
            max_tokens: 2048,
            seed,
        }
    }

    #[must_use]
    pub fn with_generator(mut self, generator: Arc<dyn TextGenerator>, max_tokens: u32) -> Self {
        self.generator = Some(generator);
        self.max_tokens = max_tokens;
        self
    }

    pub fn from_config(config: &TravelMagicConfig) -> Result<Self> {
        let planner = Self::new(config.planner.seed);
        if !config.llm.enabled {
            return Ok(planner);
        }
        let client = OpenAiCompatibleClient::from_config(&config.llm)?;
        info!(model = %config.llm.model, "Language model planning enabled");
        Ok(planner.with_generator(Arc::new(client), config.llm.max_tokens))
    }

    /// Generate an itinerary, degrading to the template on model failure
    #[instrument(skip(self, request, weather), fields(destination = %request.destination))]
    pub async fn generate(
        &self,
        request: &TripRequest,
        season: Season,
        weather: &[DayWeather],
    ) -> (Itinerary, PlanSource) {
        if let Some(generator) = &self.generator {
            match self.generate_with_model(generator.as_ref(), request, season, weather).await {
                Ok(itinerary) => {
                    info!(generator = generator.name(), "Itinerary generated by language model");
                    return (itinerary, PlanSource::LanguageModel);
                }
                Err(e) => {
                    warn!("Using template itinerary generator: {e:#}");
                }
            }
        }

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let itinerary = template::build_itinerary(request, season, weather, &mut rng);
        info!(days = itinerary.daily_plan.len(), "Itinerary generated from templates");
        (itinerary, PlanSource::Template)
    }

    /// Look up weather for the trip and generate its itinerary
    pub async fn plan(
        &self,
        weather: &WeatherService,
        request: &TripRequest,
        today: NaiveDate,
    ) -> PlannedTrip {
        let trip_weather = weather.trip_weather(request, today).await;
        let (itinerary, source) = self
            .generate(request, trip_weather.season, &trip_weather.days)
            .await;
        PlannedTrip {
            itinerary,
            weather: trip_weather.days,
            source,
        }
    }

    async fn generate_with_model(
        &self,
        generator: &dyn TextGenerator,
        request: &TripRequest,
        season: Season,
        weather: &[DayWeather],
    ) -> Result<Itinerary> {
        let prompt = llm::build_prompt(request, season, weather);
        let response = generator.generate(&prompt, self.max_tokens).await?;

        let payload = llm::extract_json(&response);
        if payload.is_empty() {
            return Err(anyhow!("Language model returned an empty response"));
        }

        let itinerary: Itinerary =
            serde_json::from_str(payload).context("Error parsing language model response")?;

        if itinerary.trip_info.start_date != request.start_date
            || itinerary.trip_info.end_date != request.end_date
        {
            return Err(anyhow!("Language model itinerary covers different dates"));
        }
        itinerary.check_complete()?;
        Ok(itinerary)
    }
}
