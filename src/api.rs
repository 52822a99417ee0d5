//! JSON API routes, mounted under `/api` by the web server

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::TravelMagicError;
use crate::cache::PersistentCache;
use crate::config::TravelMagicConfig;
use crate::export;
use crate::models::{DayWeather, Itinerary, SavedItinerary, SavedItinerarySummary, TripRequest};
use crate::planner::ItineraryPlanner;
use crate::preview::TripPreview;
use crate::store::ItineraryStore;
use crate::weather::WeatherService;

#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<ItineraryPlanner>,
    pub weather: Arc<WeatherService>,
    pub store: Arc<ItineraryStore>,
    pub max_trip_days: u32,
    /// Fixed seed for preview search queries
    pub seed: Option<u64>,
}

impl AppState {
    /// Wire services from configuration; weather cache and saved
    /// itineraries share one store
    pub fn from_config(config: &TravelMagicConfig) -> anyhow::Result<Self> {
        let cache = PersistentCache::open(config.storage_path())?;
        let forecast_ttl =
            Duration::from_secs(u64::from(config.storage.weather_ttl_hours) * 3600);

        Ok(Self {
            planner: Arc::new(ItineraryPlanner::from_config(config)?),
            weather: Arc::new(WeatherService::new(
                &config.weather,
                Some(cache.clone()),
                forecast_ttl,
            )?),
            store: Arc::new(ItineraryStore::new(cache)),
            max_trip_days: config.planner.max_trip_days,
            seed: config.planner.seed,
        })
    }
}

/// Error body `{"error": "..."}` with a status derived from the cause
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<TravelMagicError> for ApiError {
    fn from(err: TravelMagicError) -> Self {
        let status = match err {
            TravelMagicError::Validation { .. } => StatusCode::BAD_REQUEST,
            TravelMagicError::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = match &rejection {
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                StatusCode::BAD_REQUEST
            }
            other => other.status(),
        };
        Self {
            status,
            message: rejection.body_text(),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<TravelMagicError>() {
            Ok(known) => known.into(),
            Err(other) => {
                error!("Request failed: {other:#}");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "Internal server error".to_string(),
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub itinerary: Itinerary,
    pub weather: Vec<DayWeather>,
    /// "language_model" or "template"
    pub source: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveRequest {
    pub request: TripRequest,
    pub itinerary: Itinerary,
    #[serde(default)]
    pub weather: Vec<DayWeather>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/itineraries/generate", post(generate_itinerary))
        .route("/itineraries", get(list_itineraries).post(save_itinerary))
        .route(
            "/itineraries/{id}",
            get(get_itinerary).delete(delete_itinerary),
        )
        .route("/itineraries/{id}/export", get(export_itinerary))
        .route("/preview", post(preview_itinerary))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "version": crate::VERSION }))
}

async fn generate_itinerary(
    State(state): State<AppState>,
    payload: Result<Json<TripRequest>, JsonRejection>,
) -> ApiResult<Json<GenerateResponse>> {
    let Json(mut request) = payload?;
    request.validate(state.max_trip_days)?;

    let planned = state
        .planner
        .plan(&state.weather, &request, Utc::now().date_naive())
        .await;

    Ok(Json(GenerateResponse {
        itinerary: planned.itinerary,
        weather: planned.weather,
        source: planned.source.as_str().to_string(),
    }))
}

async fn save_itinerary(
    State(state): State<AppState>,
    payload: Result<Json<SaveRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SavedItinerary>)> {
    let Json(SaveRequest {
        mut request,
        itinerary,
        weather,
    }) = payload?;
    request.validate(state.max_trip_days)?;
    itinerary.check_consistency()?;
    itinerary.check_request(&request)?;

    let saved = state.store.save(&request, itinerary, weather).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

async fn list_itineraries(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<SavedItinerarySummary>>> {
    let saved = state.store.list().await?;
    Ok(Json(saved.iter().map(SavedItinerarySummary::from).collect()))
}

async fn get_itinerary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SavedItinerary>> {
    Ok(Json(state.store.fetch(&id).await?))
}

async fn delete_itinerary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if state.store.delete(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(TravelMagicError::not_found(format!("No saved itinerary with id {id}")).into())
    }
}

async fn export_itinerary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let saved = state.store.fetch(&id).await?;

    let body = export::to_json(&saved.itinerary)?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export::file_name(&saved.destination)
    );
    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

async fn preview_itinerary(
    State(state): State<AppState>,
    payload: Result<Json<Itinerary>, JsonRejection>,
) -> ApiResult<Json<TripPreview>> {
    let Json(itinerary) = payload?;
    let mut rng = match state.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    Ok(Json(TripPreview::build(&itinerary, &mut rng)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WeatherConfig;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_app(dir: &tempfile::TempDir) -> Router {
        let weather_config = WeatherConfig {
            enabled: false,
            ..WeatherConfig::default()
        };
        let state = AppState {
            planner: Arc::new(ItineraryPlanner::new(Some(7))),
            weather: Arc::new(
                WeatherService::new(&weather_config, None, Duration::from_secs(60)).unwrap(),
            ),
            store: Arc::new(ItineraryStore::new(
                PersistentCache::open(dir.path()).unwrap(),
            )),
            max_trip_days: 30,
            seed: Some(7),
        };
        router(state)
    }

    fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn trip_body() -> Value {
        json!({
            "destination": "Lisbon, Portugal",
            "start_date": "2026-06-01",
            "end_date": "2026-06-04",
            "budget": "Luxury",
            "preferences": ["Food", "food", "Museums"],
            "purpose": "Romantic getaway"
        })
    }

    async fn generate(app: &Router) -> Value {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/itineraries/generate", &trip_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let response = test_app(&dir)
            .oneshot(empty_request("GET", "/health"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_generate_itinerary() {
        let dir = tempfile::tempdir().unwrap();
        let body = generate(&test_app(&dir)).await;

        assert_eq!(body["source"], "template");
        assert_eq!(body["itinerary"]["daily_plan"].as_array().unwrap().len(), 3);
        assert_eq!(body["itinerary"]["trip_info"]["budget"], "Luxury");
        assert_eq!(
            body["itinerary"]["trip_info"]["preferences"],
            json!(["Food", "Museums"])
        );
        assert_eq!(body["weather"][0]["weather"], "Typical Summer weather");
    }

    #[tokio::test]
    async fn test_generate_rejects_bad_dates() {
        let dir = tempfile::tempdir().unwrap();
        let mut body = trip_body();
        body["end_date"] = json!("2026-05-20");

        let response = test_app(&dir)
            .oneshot(json_request("POST", "/itineraries/generate", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error = body_json(response).await;
        assert!(error["error"].as_str().unwrap().contains("must be after"));
    }

    #[tokio::test]
    async fn test_budget_spellings_follow_parsing() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(&dir);

        for (budget, expected) in [("bUdGeT", "Budget"), ("low", "Budget"), ("high", "Luxury")] {
            let mut body = trip_body();
            body["budget"] = json!(budget);
            let response = app
                .clone()
                .oneshot(json_request("POST", "/itineraries/generate", &body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(body_json(response).await["itinerary"]["trip_info"]["budget"], expected);
        }
    }

    #[tokio::test]
    async fn test_unknown_budget_is_400() {
        let dir = tempfile::tempdir().unwrap();
        let mut body = trip_body();
        body["budget"] = json!("Platinum");

        let response = test_app(&dir)
            .oneshot(json_request("POST", "/itineraries/generate", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error = body_json(response).await;
        assert!(error["error"].as_str().unwrap().contains("Unknown budget tier"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_400() {
        let dir = tempfile::tempdir().unwrap();
        let request = Request::builder()
            .method("POST")
            .uri("/itineraries/generate")
            .header("content-type", "application/json")
            .body(Body::from("{\"destination\": "))
            .unwrap();

        let response = test_app(&dir).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_save_rejects_itinerary_for_other_trip() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(&dir);
        let generated = generate(&app).await;

        let mut tokyo = trip_body();
        tokyo["destination"] = json!("Tokyo, Japan");
        let save = json!({ "request": tokyo, "itinerary": generated["itinerary"] });
        let response = app
            .clone()
            .oneshot(json_request("POST", "/itineraries", &save))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(
            body_json(response)
                .await["error"]
                .as_str()
                .unwrap()
                .contains("but the trip is to Tokyo")
        );

        let mut later = trip_body();
        later["start_date"] = json!("2026-09-01");
        later["end_date"] = json!("2026-09-04");
        let save = json!({ "request": later, "itinerary": generated["itinerary"] });
        let response = app
            .clone()
            .oneshot(json_request("POST", "/itineraries", &save))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app.oneshot(empty_request("GET", "/itineraries")).await.unwrap();
        assert!(body_json(response).await.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_saved_itinerary_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(&dir);
        let generated = generate(&app).await;

        let save = json!({
            "request": trip_body(),
            "itinerary": generated["itinerary"],
            "weather": generated["weather"],
        });
        let response = app
            .clone()
            .oneshot(json_request("POST", "/itineraries", &save))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let saved = body_json(response).await;
        let id = saved["id"].as_str().unwrap().to_string();
        assert_eq!(saved["name"], "Trip to Lisbon, Portugal");

        let response = app
            .clone()
            .oneshot(empty_request("GET", "/itineraries"))
            .await
            .unwrap();
        let listed = body_json(response).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["id"], id.as_str());

        let response = app
            .clone()
            .oneshot(empty_request("GET", &format!("/itineraries/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["itinerary"], generated["itinerary"]);

        let response = app
            .clone()
            .oneshot(empty_request("GET", &format!("/itineraries/{id}/export")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Lisbon,_Portugal_itinerary.json\""
        );
        assert_eq!(body_json(response).await, generated["itinerary"]);

        let response = app
            .clone()
            .oneshot(empty_request("DELETE", &format!("/itineraries/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(empty_request("GET", &format!("/itineraries/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_save_rejects_inconsistent_itinerary() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(&dir);
        let mut generated = generate(&app).await;
        generated["itinerary"]["daily_plan"]
            .as_array_mut()
            .unwrap()
            .pop();

        let save = json!({ "request": trip_body(), "itinerary": generated["itinerary"] });
        let response = app
            .oneshot(json_request("POST", "/itineraries", &save))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_itinerary_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(&dir);
        for request in [
            empty_request("GET", "/itineraries/itin_missing"),
            empty_request("DELETE", "/itineraries/itin_missing"),
            empty_request("GET", "/itineraries/itin_missing/export"),
        ] {
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            let error = body_json(response).await;
            assert!(error["error"].as_str().unwrap().contains("itin_missing"));
        }
    }

    #[tokio::test]
    async fn test_preview() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(&dir);
        let generated = generate(&app).await;

        let response = app
            .oneshot(json_request("POST", "/preview", &generated["itinerary"]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let preview = body_json(response).await;
        assert_eq!(preview["slides"].as_array().unwrap().len(), 9);
        assert_eq!(preview["slides"][4]["seed"], 2002);
        assert_eq!(preview["highlights"].as_array().unwrap().len(), 6);
    }
}
