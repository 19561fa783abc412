use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    db::{FoldFn, RatingStore},
    errors::AppError,
    models::{SchemaWriteMode, UserRating},
    rating::{PlaceRatingAggregate, RatingRulesSchema},
};

#[derive(Default)]
struct Documents {
    schemas: HashMap<String, RatingRulesSchema>,
    place_ratings: HashMap<String, PlaceRatingAggregate>,
    user_ratings: HashMap<Uuid, UserRating>,
    histories: HashMap<String, Vec<Uuid>>,
}

/// Process-local store. Used when no Redis URL is configured, and by tests.
#[derive(Default)]
pub struct InMemoryStore {
    documents: Mutex<Documents>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rating records for a place, oldest first.
    pub async fn ratings_for_place(&self, place_id: &str) -> Vec<UserRating> {
        let documents = self.documents.lock().await;
        documents
            .histories
            .get(place_id)
            .into_iter()
            .flatten()
            .filter_map(|id| documents.user_ratings.get(id).cloned())
            .collect()
    }
}

#[async_trait]
impl RatingStore for InMemoryStore {
    async fn get_schema(&self, place_type: &str) -> Result<Option<RatingRulesSchema>, AppError> {
        Ok(self.documents.lock().await.schemas.get(place_type).cloned())
    }

    async fn create_schema(
        &self,
        place_type: &str,
        schema: RatingRulesSchema,
    ) -> Result<(), AppError> {
        let mut documents = self.documents.lock().await;
        if documents.schemas.contains_key(place_type) {
            return Err(AppError::Conflict(format!(
                "Rating schema for placeType: {place_type} already exists"
            )));
        }

        documents.schemas.insert(place_type.to_string(), schema);
        Ok(())
    }

    async fn write_schema(
        &self,
        place_type: &str,
        schema: RatingRulesSchema,
        mode: SchemaWriteMode,
    ) -> Result<(), AppError> {
        let mut documents = self.documents.lock().await;
        match mode {
            SchemaWriteMode::Replace => {
                documents.schemas.insert(place_type.to_string(), schema);
            }
            SchemaWriteMode::Merge => {
                documents
                    .schemas
                    .entry(place_type.to_string())
                    .or_default()
                    .merge(schema);
            }
        }
        Ok(())
    }

    async fn get_place_rating(
        &self,
        place_id: &str,
    ) -> Result<Option<PlaceRatingAggregate>, AppError> {
        Ok(self.documents.lock().await.place_ratings.get(place_id).cloned())
    }

    async fn commit_rating(
        &self,
        record: UserRating,
        fold: &FoldFn<'_>,
    ) -> Result<PlaceRatingAggregate, AppError> {
        let mut documents = self.documents.lock().await;

        if documents.user_ratings.contains_key(&record.id) {
            return Err(AppError::Conflict(format!("Rating {} already stored", record.id)));
        }

        let next = fold(documents.place_ratings.get(&record.place_id))?;

        documents
            .place_ratings
            .insert(record.place_id.clone(), next.clone());
        documents
            .histories
            .entry(record.place_id.clone())
            .or_default()
            .push(record.id);
        documents.user_ratings.insert(record.id, record);

        Ok(next)
    }
}
