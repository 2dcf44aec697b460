use serde::{de::DeserializeOwned, Serialize};

use crate::routes::ApiResponse;

pub mod actors;
pub mod board;
pub mod genres;
pub mod list_state;
pub mod movies;
pub mod query;
pub mod reviews;
pub mod tier_lists;

pub use actors::ActorClient;
pub use board::{BoardEditor, EditPhase, NoticeLevel, Notifier, TracingNotifier};
pub use genres::GenreClient;
pub use list_state::{ListState, SearchDebouncer};
pub use movies::MovieClient;
pub use query::QueryString;
pub use reviews::ReviewClient;
pub use tier_lists::{TierListApi, TierListClient};

/// Errors surfaced by the typed API clients
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Network or serialization failure below the API layer
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with `success: false` or a non-2xx status
    #[error("{message}")]
    Api { status: u16, message: String },

    /// A success envelope arrived without its data payload
    #[error("Response was missing its data payload")]
    MissingData,
}

/// Shared HTTP plumbing for the entity clients
///
/// Builds query strings, sets JSON headers, parses the response envelope, and
/// turns failed envelopes into `ClientError::Api`. No retry, no timeout, no
/// caching: every call is a fresh round trip.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client for a server at `base_url` (no trailing slash)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &QueryString,
    ) -> Result<ApiResponse<T>, ClientError> {
        let response = self
            .http
            .get(self.url(path))
            .query(query.pairs())
            .send()
            .await?;
        Self::unwrap_envelope(response).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse<T>, ClientError> {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        Self::unwrap_envelope(response).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse<T>, ClientError> {
        let response = self.http.put(self.url(path)).json(body).send().await?;
        Self::unwrap_envelope(response).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<ApiResponse<T>, ClientError> {
        let response = self.http.delete(self.url(path)).send().await?;
        Self::unwrap_envelope(response).await
    }

    async fn unwrap_envelope<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<ApiResponse<T>, ClientError> {
        let status = response.status();
        let envelope: ApiResponse<T> = response.json().await?;

        if !status.is_success() || !envelope.success {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: envelope
                    .message
                    .unwrap_or_else(|| format!("Request failed with status {}", status)),
            });
        }

        Ok(envelope)
    }
}

/// Pulls the data payload out of a success envelope
pub(crate) fn require_data<T>(envelope: ApiResponse<T>) -> Result<T, ClientError> {
    envelope.data.ok_or(ClientError::MissingData)
}
