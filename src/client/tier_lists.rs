use async_trait::async_trait;

use crate::models::{
    AddTierMovieInput, MoveTierMovieInput, Tier, TierList, TierListDetail, TierListInput,
    TierListRename, TierListSummary,
};

use super::{require_data, ApiClient, ClientError, QueryString};

/// Transport the board editor drives
///
/// Abstracting the four calls the editor needs keeps the optimistic-update
/// logic testable without a server behind it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TierListApi: Send + Sync {
    /// Authoritative board state, also used for the revert-on-error refetch
    async fn fetch(&self, list_id: i64) -> Result<TierListDetail, ClientError>;

    /// Places an unassigned movie into a bucket
    async fn add_movie(
        &self,
        list_id: i64,
        movie_id: i64,
        tier: Tier,
        position: i32,
    ) -> Result<(), ClientError>;

    /// Moves an assigned movie to a tier and position
    async fn move_movie(
        &self,
        list_id: i64,
        movie_id: i64,
        tier: Tier,
        position: i32,
    ) -> Result<(), ClientError>;

    /// Removes a movie from the list
    async fn remove_movie(&self, list_id: i64, movie_id: i64) -> Result<(), ClientError>;
}

/// Typed client for the tier list endpoints
#[derive(Debug, Clone)]
pub struct TierListClient {
    api: ApiClient,
}

impl TierListClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<TierListSummary>, ClientError> {
        let envelope = self.api.get("/tier-lists", &QueryString::new()).await?;
        require_data(envelope)
    }

    pub async fn create(&self, input: &TierListInput) -> Result<TierListDetail, ClientError> {
        let envelope = self.api.post("/tier-lists", input).await?;
        require_data(envelope)
    }

    pub async fn rename(&self, id: i64, name: &str) -> Result<TierList, ClientError> {
        let body = TierListRename {
            name: name.to_string(),
        };
        let envelope = self.api.put(&format!("/tier-lists/{}", id), &body).await?;
        require_data(envelope)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        self.api
            .delete::<serde_json::Value>(&format!("/tier-lists/{}", id))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl TierListApi for TierListClient {
    async fn fetch(&self, list_id: i64) -> Result<TierListDetail, ClientError> {
        let envelope = self
            .api
            .get(&format!("/tier-lists/{}", list_id), &QueryString::new())
            .await?;
        require_data(envelope)
    }

    async fn add_movie(
        &self,
        list_id: i64,
        movie_id: i64,
        tier: Tier,
        position: i32,
    ) -> Result<(), ClientError> {
        let body = AddTierMovieInput {
            movie_id,
            tier,
            position: Some(position),
        };
        self.api
            .post::<serde_json::Value, _>(&format!("/tier-lists/{}/movies", list_id), &body)
            .await?;
        Ok(())
    }

    async fn move_movie(
        &self,
        list_id: i64,
        movie_id: i64,
        tier: Tier,
        position: i32,
    ) -> Result<(), ClientError> {
        let body = MoveTierMovieInput { tier, position };
        self.api
            .put::<serde_json::Value, _>(
                &format!("/tier-lists/{}/movies/{}", list_id, movie_id),
                &body,
            )
            .await?;
        Ok(())
    }

    async fn remove_movie(&self, list_id: i64, movie_id: i64) -> Result<(), ClientError> {
        self.api
            .delete::<serde_json::Value>(&format!("/tier-lists/{}/movies/{}", list_id, movie_id))
            .await?;
        Ok(())
    }
}
