use crate::models::{
    Review, ReviewFilters, ReviewInput, ReviewStats, ReviewUpdate, ReviewWithMovie,
};

use super::{require_data, ApiClient, ClientError, QueryString};

/// Typed client for the review endpoints
#[derive(Debug, Clone)]
pub struct ReviewClient {
    api: ApiClient,
}

impl ReviewClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<ReviewWithMovie>, ClientError> {
        let envelope = self.api.get("/reviews", &QueryString::new()).await?;
        require_data(envelope)
    }

    pub async fn for_movie(&self, movie_id: i64) -> Result<Vec<Review>, ClientError> {
        let envelope = self
            .api
            .get(&format!("/reviews/movie/{}", movie_id), &QueryString::new())
            .await?;
        require_data(envelope)
    }

    pub async fn create(&self, movie_id: i64, input: &ReviewInput) -> Result<Review, ClientError> {
        let envelope = self
            .api
            .post(&format!("/reviews/movie/{}", movie_id), input)
            .await?;
        require_data(envelope)
    }

    pub async fn update(&self, id: i64, input: &ReviewUpdate) -> Result<Review, ClientError> {
        let envelope = self.api.put(&format!("/reviews/{}", id), input).await?;
        require_data(envelope)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        self.api
            .delete::<serde_json::Value>(&format!("/reviews/{}", id))
            .await?;
        Ok(())
    }

    pub async fn stats(&self) -> Result<ReviewStats, ClientError> {
        let envelope = self.api.get("/reviews/stats", &QueryString::new()).await?;
        require_data(envelope)
    }

    pub async fn top_rated(
        &self,
        min_rating: Option<i32>,
        limit: Option<i64>,
    ) -> Result<Vec<ReviewWithMovie>, ClientError> {
        let query = QueryString::new()
            .push_opt("minRating", min_rating)
            .push_opt("limit", limit);
        let envelope = self.api.get("/reviews/top-rated", &query).await?;
        require_data(envelope)
    }

    pub async fn by_reviewer(&self, name: &str) -> Result<Vec<ReviewWithMovie>, ClientError> {
        let envelope = self
            .api
            .get(&format!("/reviews/reviewer/{}", name), &QueryString::new())
            .await?;
        require_data(envelope)
    }

    pub async fn filtered(
        &self,
        filters: &ReviewFilters,
    ) -> Result<Vec<ReviewWithMovie>, ClientError> {
        let query = QueryString::new()
            .push_opt("reviewer", filters.reviewer.as_deref())
            .push_opt("minRating", filters.min_rating)
            .push_opt("maxRating", filters.max_rating)
            .push_opt("movieId", filters.movie_id);
        let envelope = self.api.get("/reviews/filtered", &query).await?;
        require_data(envelope)
    }
}
