//! Destination weather lookup
//!
//! Geocodes the destination and fetches a daily forecast from `OpenMeteo`.
//! Trips beyond the forecast horizon, lookup failures and disabled weather
//! all degrade to seasonal placeholders.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use chrono::{Days, NaiveDate};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::cache::PersistentCache;
use crate::config::WeatherConfig;
use crate::models::{DayWeather, Season, TripRequest};

pub mod open_meteo;

pub use open_meteo::GeoPoint;
use open_meteo::{ForecastResponse, GeocodingResponse};

const GEOCODE_TTL: Duration = Duration::from_secs(7 * 24 * 3600);

/// Weather attached to a trip
#[derive(Debug, Clone)]
pub struct TripWeather {
    pub season: Season,
    pub location: Option<GeoPoint>,
    /// One entry per trip day, forecast where available
    pub days: Vec<DayWeather>,
}

impl TripWeather {
    /// Placeholder weather for every trip day
    #[must_use]
    pub fn seasonal(request: &TripRequest, season: Season) -> Self {
        Self {
            season,
            location: None,
            days: request
                .dates()
                .map(|date| DayWeather::seasonal(date, season))
                .collect(),
        }
    }

    /// Number of days backed by a real forecast
    #[must_use]
    pub fn forecast_days(&self) -> usize {
        self.days.iter().filter(|d| !d.is_seasonal()).count()
    }
}

/// Season for the trip: an explicit request season wins, else derived from
/// the start date and hemisphere
#[must_use]
pub fn resolve_season(request: &TripRequest, latitude: Option<f64>) -> Season {
    request.effective_season(latitude)
}

/// Part of `[start, end_exclusive)` the forecast API can answer
///
/// Returns an inclusive `(first, last)` pair, or `None` when the trip lies
/// entirely in the past or beyond `horizon_days` from `today`.
#[must_use]
pub fn forecast_window(
    start: NaiveDate,
    end_exclusive: NaiveDate,
    today: NaiveDate,
    horizon_days: u32,
) -> Option<(NaiveDate, NaiveDate)> {
    let last_trip_day = end_exclusive.pred_opt()?;
    let horizon_end = today.checked_add_days(Days::new(u64::from(horizon_days.max(1)) - 1))?;

    let first = start.max(today);
    let last = last_trip_day.min(horizon_end);
    (first <= last).then_some((first, last))
}

pub struct WeatherService {
    client: ClientWithMiddleware,
    config: WeatherConfig,
    cache: Option<PersistentCache>,
    forecast_ttl: Duration,
}

impl WeatherService {
    pub fn new(
        config: &WeatherConfig,
        cache: Option<PersistentCache>,
        forecast_ttl: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("TravelMagic/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            config: config.clone(),
            cache,
            forecast_ttl,
        })
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("OpenMeteo request URL: {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Request to {url} failed"))?
            .error_for_status()?;
        response
            .json::<T>()
            .await
            .context("Failed to parse OpenMeteo response")
    }

    /// Resolve a destination name to coordinates
    #[instrument(skip(self))]
    pub async fn geocode(&self, destination: &str) -> Result<Option<GeoPoint>> {
        let key = format!("geocode:{}", destination.trim().to_lowercase());
        if let Some(cache) = &self.cache {
            if let Some(point) = cache.get::<GeoPoint>(&key).await? {
                debug!("Geocode cache hit");
                return Ok(Some(point));
            }
        }

        let url = format!(
            "{}/search?name={}&count=1&language=en&format=json",
            self.config.geocoding_url.trim_end_matches('/'),
            urlencoding::encode(destination.trim())
        );
        let response: GeocodingResponse = self.fetch_json(&url).await?;
        let point = response
            .results
            .and_then(|results| results.into_iter().next())
            .map(GeoPoint::from);

        if let (Some(cache), Some(point)) = (&self.cache, &point) {
            cache.put(&key, point.clone(), GEOCODE_TTL).await?;
        }
        Ok(point)
    }

    /// Daily forecast for the inclusive range `first..=last`
    #[instrument(skip(self, point), fields(location = %point.name))]
    pub async fn daily_forecast(
        &self,
        point: &GeoPoint,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Result<Vec<DayWeather>> {
        let key = point.cache_key(first, last);
        if let Some(cache) = &self.cache {
            if let Some(days) = cache.get::<Vec<DayWeather>>(&key).await? {
                debug!("Forecast cache hit");
                return Ok(days);
            }
        }

        let url = format!(
            "{}/forecast?latitude={}&longitude={}&daily=weathercode,temperature_2m_max,temperature_2m_min&timezone=auto&start_date={first}&end_date={last}",
            self.config.base_url.trim_end_matches('/'),
            point.latitude,
            point.longitude,
        );
        let response: ForecastResponse = self.fetch_json(&url).await?;
        let days = response
            .daily
            .ok_or_else(|| anyhow!("OpenMeteo response has no daily data"))?
            .to_day_weather();

        if let Some(cache) = &self.cache {
            cache.put(&key, days.clone(), self.forecast_ttl).await?;
        }
        Ok(days)
    }

    /// Weather for every day of the trip; never fails
    #[instrument(skip(self, request), fields(destination = %request.destination))]
    pub async fn trip_weather(&self, request: &TripRequest, today: NaiveDate) -> TripWeather {
        let fallback_season = resolve_season(request, None);
        if !self.config.enabled {
            return TripWeather::seasonal(request, fallback_season);
        }

        let point = match self.geocode(&request.destination).await {
            Ok(Some(point)) => point,
            Ok(None) => {
                warn!("Destination not found by geocoder, using seasonal weather");
                return TripWeather::seasonal(request, fallback_season);
            }
            Err(e) => {
                warn!("Geocoding failed, using seasonal weather: {e:#}");
                return TripWeather::seasonal(request, fallback_season);
            }
        };

        let season = resolve_season(request, Some(point.latitude));
        let mut weather = TripWeather::seasonal(request, season);
        weather.location = Some(point.clone());

        let Some((first, last)) = forecast_window(
            request.start_date,
            request.end_date,
            today,
            self.config.forecast_horizon_days,
        ) else {
            info!("Trip outside forecast horizon, using seasonal weather");
            return weather;
        };

        match self.daily_forecast(&point, first, last).await {
            Ok(forecast) => {
                for day in &mut weather.days {
                    if let Some(found) = forecast.iter().find(|f| f.date == day.date) {
                        *day = found.clone();
                    }
                }
                info!(forecast_days = weather.forecast_days(), "Attached forecast");
            }
            Err(e) => warn!("Forecast lookup failed, using seasonal weather: {e:#}"),
        }
        weather
    }
}
