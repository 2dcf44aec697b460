use crate::models::{
    Movie, MovieDetail, MovieFilters, MovieInput, Pagination, WatchlistEntry, WatchlistInput,
};

use super::{require_data, ApiClient, ClientError, QueryString};

/// Typed client for the movie endpoints
#[derive(Debug, Clone)]
pub struct MovieClient {
    api: ApiClient,
}

impl MovieClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Paginated, filtered movie listing
    pub async fn list(
        &self,
        filters: &MovieFilters,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<(Vec<Movie>, Option<Pagination>), ClientError> {
        let query = QueryString::new()
            .push_opt("page", page)
            .push_opt("limit", limit)
            .push_opt("genre", filters.genre.as_deref())
            .push_opt("minRating", filters.min_rating)
            .push_opt("maxRating", filters.max_rating)
            .push_opt("search", filters.search.as_deref())
            .push_opt("status", filters.status.map(|s| s.as_str()))
            .push_opt("sortBy", filters.sort_by.as_deref())
            .push_opt("sortOrder", filters.sort_order.as_deref());

        let envelope = self.api.get::<Vec<Movie>>("/movies", &query).await?;
        let pagination = envelope.pagination;
        Ok((require_data(envelope)?, pagination))
    }

    /// Movie detail with genres, actors and reviews
    pub async fn get(&self, id: i64) -> Result<MovieDetail, ClientError> {
        let envelope = self
            .api
            .get(&format!("/movies/{}", id), &QueryString::new())
            .await?;
        require_data(envelope)
    }

    /// Creates a movie
    pub async fn create(&self, input: &MovieInput) -> Result<MovieDetail, ClientError> {
        let envelope = self.api.post("/movies", input).await?;
        require_data(envelope)
    }

    /// Full update of a movie
    pub async fn update(&self, id: i64, input: &MovieInput) -> Result<MovieDetail, ClientError> {
        let envelope = self.api.put(&format!("/movies/{}", id), input).await?;
        require_data(envelope)
    }

    /// Deletes a movie
    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        self.api
            .delete::<serde_json::Value>(&format!("/movies/{}", id))
            .await?;
        Ok(())
    }

    /// Free-text movie search
    pub async fn search(&self, q: &str) -> Result<Vec<Movie>, ClientError> {
        let query = QueryString::new().push("q", q);
        let envelope = self.api.get("/movies/search", &query).await?;
        require_data(envelope)
    }

    /// The watchlist with its movies
    pub async fn watchlist(&self) -> Result<Vec<WatchlistEntry>, ClientError> {
        let envelope = self.api.get("/movies/watchlist", &QueryString::new()).await?;
        require_data(envelope)
    }

    /// Adds a movie to the watchlist
    pub async fn add_to_watchlist(
        &self,
        movie_id: i64,
        input: &WatchlistInput,
    ) -> Result<(), ClientError> {
        self.api
            .post::<serde_json::Value, _>(&format!("/movies/{}/watchlist", movie_id), input)
            .await?;
        Ok(())
    }

    /// Removes a movie from the watchlist
    pub async fn remove_from_watchlist(&self, movie_id: i64) -> Result<(), ClientError> {
        self.api
            .delete::<serde_json::Value>(&format!("/movies/{}/watchlist", movie_id))
            .await?;
        Ok(())
    }
}
