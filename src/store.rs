//! Saved itinerary storage
//!
//! Records live under `itinerary:<id>`; `itinerary:index` keeps ids in
//! creation order so listing needs no key scan.

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::cache::PersistentCache;
use crate::models::{DayWeather, Itinerary, SavedItinerary, TripRequest};
use crate::{Result, TravelMagicError};

const INDEX_KEY: &str = "itinerary:index";
const SEQUENCE_KEY: &str = "itinerary:sequence";
const USER_KEY: &str = "meta:user_id";

fn record_key(id: &str) -> String {
    format!("itinerary:{id}")
}

pub struct ItineraryStore {
    cache: PersistentCache,
    // serializes read-modify-write of the index and the user id
    index_lock: Mutex<()>,
}

impl ItineraryStore {
    #[must_use]
    pub fn new(cache: PersistentCache) -> Self {
        Self {
            cache,
            index_lock: Mutex::new(()),
        }
    }

    async fn read<T: DeserializeOwned + Send + 'static>(&self, key: &str) -> Result<Option<T>> {
        self.cache
            .get(key)
            .await
            .map_err(|e| TravelMagicError::store(format!("Failed to read {key}: {e:#}")))
    }

    async fn write<T: Serialize + Send + Debug + 'static>(&self, key: &str, value: T) -> Result<()> {
        self.cache
            .put_permanent(key, value)
            .await
            .map_err(|e| TravelMagicError::store(format!("Failed to write {key}: {e:#}")))
    }

    async fn index(&self) -> Result<Vec<String>> {
        Ok(self.read(INDEX_KEY).await?.unwrap_or_default())
    }

    /// Identifier of the local user, created on first use
    pub async fn user_id(&self) -> Result<String> {
        let _guard = self.index_lock.lock().await;
        self.load_or_create_user_id().await
    }

    // caller holds `index_lock`
    async fn load_or_create_user_id(&self) -> Result<String> {
        if let Some(id) = self.read::<String>(USER_KEY).await? {
            return Ok(id);
        }
        let id = format!("user_{}", Utc::now().format("%Y%m%d%H%M%S"));
        self.write(USER_KEY, id.clone()).await?;
        info!(user_id = %id, "Created local user id");
        Ok(id)
    }

    /// Build a record for `itinerary` and persist it
    #[instrument(skip_all, fields(destination = %request.destination))]
    pub async fn save(
        &self,
        request: &TripRequest,
        itinerary: Itinerary,
        weather: Vec<DayWeather>,
    ) -> Result<SavedItinerary> {
        let _guard = self.index_lock.lock().await;
        let user_id = self.load_or_create_user_id().await?;

        let mut index = self.index().await?;
        let sequence: u64 = self.read(SEQUENCE_KEY).await?.unwrap_or_default();
        let saved = SavedItinerary::new(request, itinerary, weather, user_id, sequence, Utc::now());

        self.write(&record_key(&saved.id), saved.clone()).await?;
        index.push(saved.id.clone());
        self.write(INDEX_KEY, index).await?;
        self.write(SEQUENCE_KEY, sequence + 1).await?;

        info!(id = %saved.id, "Saved itinerary");
        Ok(saved)
    }

    pub async fn get(&self, id: &str) -> Result<Option<SavedItinerary>> {
        self.read(&record_key(id)).await
    }

    /// Like [`get`](Self::get), but a missing record is a `NotFound` error
    pub async fn fetch(&self, id: &str) -> Result<SavedItinerary> {
        self.get(id)
            .await?
            .ok_or_else(|| TravelMagicError::not_found(format!("No saved itinerary with id {id}")))
    }

    /// All saved itineraries in creation order
    pub async fn list(&self) -> Result<Vec<SavedItinerary>> {
        let index = self.index().await?;
        let mut saved = Vec::with_capacity(index.len());
        for id in &index {
            match self.get(id).await? {
                Some(record) => saved.push(record),
                None => debug!(%id, "Index entry without record"),
            }
        }
        Ok(saved)
    }

    /// Remove a record; returns whether it existed
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let _guard = self.index_lock.lock().await;

        let mut index = self.index().await?;
        let before = index.len();
        index.retain(|existing| existing != id);
        let existed = index.len() != before || self.get(id).await?.is_some();

        self.cache
            .remove(&record_key(id))
            .await
            .map_err(|e| TravelMagicError::store(format!("Failed to remove {id}: {e:#}")))?;
        self.write(INDEX_KEY, index).await?;

        if existed {
            info!("Deleted itinerary");
        }
        Ok(existed)
    }
}
