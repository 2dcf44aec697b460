use crate::models::{Genre, GenreInput, GenreStats};

use super::{require_data, ApiClient, ClientError, QueryString};

/// Typed client for the genre endpoints
#[derive(Debug, Clone)]
pub struct GenreClient {
    api: ApiClient,
}

impl GenreClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Genre>, ClientError> {
        let envelope = self.api.get("/genres", &QueryString::new()).await?;
        require_data(envelope)
    }

    pub async fn get(&self, id: i64) -> Result<Genre, ClientError> {
        let envelope = self
            .api
            .get(&format!("/genres/{}", id), &QueryString::new())
            .await?;
        require_data(envelope)
    }

    pub async fn create(&self, input: &GenreInput) -> Result<Genre, ClientError> {
        let envelope = self.api.post("/genres", input).await?;
        require_data(envelope)
    }

    pub async fn update(&self, id: i64, input: &GenreInput) -> Result<Genre, ClientError> {
        let envelope = self.api.put(&format!("/genres/{}", id), input).await?;
        require_data(envelope)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        self.api
            .delete::<serde_json::Value>(&format!("/genres/{}", id))
            .await?;
        Ok(())
    }

    pub async fn search(&self, q: &str) -> Result<Vec<Genre>, ClientError> {
        let query = QueryString::new().push("q", q);
        let envelope = self.api.get("/genres/search", &query).await?;
        require_data(envelope)
    }

    pub async fn stats(&self) -> Result<Vec<GenreStats>, ClientError> {
        let envelope = self.api.get("/genres/stats", &QueryString::new()).await?;
        require_data(envelope)
    }
}
