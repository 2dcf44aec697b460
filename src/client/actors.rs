use crate::models::{Actor, ActorInput, ActorStats, Movie};

use super::{require_data, ApiClient, ClientError, QueryString};

/// Typed client for the actor endpoints
#[derive(Debug, Clone)]
pub struct ActorClient {
    api: ApiClient,
}

impl ActorClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Actor>, ClientError> {
        let envelope = self.api.get("/actors", &QueryString::new()).await?;
        require_data(envelope)
    }

    pub async fn get(&self, id: i64) -> Result<Actor, ClientError> {
        let envelope = self
            .api
            .get(&format!("/actors/{}", id), &QueryString::new())
            .await?;
        require_data(envelope)
    }

    pub async fn create(&self, input: &ActorInput) -> Result<Actor, ClientError> {
        let envelope = self.api.post("/actors", input).await?;
        require_data(envelope)
    }

    pub async fn update(&self, id: i64, input: &ActorInput) -> Result<Actor, ClientError> {
        let envelope = self.api.put(&format!("/actors/{}", id), input).await?;
        require_data(envelope)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        self.api
            .delete::<serde_json::Value>(&format!("/actors/{}", id))
            .await?;
        Ok(())
    }

    pub async fn search(&self, q: &str) -> Result<Vec<Actor>, ClientError> {
        let query = QueryString::new().push("q", q);
        let envelope = self.api.get("/actors/search", &query).await?;
        require_data(envelope)
    }

    pub async fn stats(&self) -> Result<Vec<ActorStats>, ClientError> {
        let envelope = self.api.get("/actors/stats", &QueryString::new()).await?;
        require_data(envelope)
    }

    /// An actor's filmography
    pub async fn movies(&self, id: i64) -> Result<Vec<Movie>, ClientError> {
        let envelope = self
            .api
            .get(&format!("/actors/{}/movies", id), &QueryString::new())
            .await?;
        require_data(envelope)
    }
}
