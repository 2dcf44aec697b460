use axum::{
    extract::Query,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;

use kinoteka::client::{ApiClient, ClientError, MovieClient, TierListApi, TierListClient};
use kinoteka::models::{MovieFilters, Tier};

fn movie_json(id: i64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "original_title": null,
        "release_year": 1999,
        "director": null,
        "poster_url": null,
        "trailer_url": null,
        "duration": 136,
        "description": null,
        "country": null,
        "language": null,
        "status": "watched",
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z",
        "genres": "Боевик, Фантастика",
        "avg_rating": 9.5
    })
}

/// Stub of the real API surface: canned envelopes, no database
fn stub_router() -> Router {
    Router::new()
        .route(
            "/api/movies",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let movies = [movie_json(1, "Матрица"), movie_json(2, "Брат")];
                let filtered: Vec<Value> = movies
                    .into_iter()
                    .filter(|m| match params.get("search") {
                        Some(q) => m["title"].as_str().unwrap().contains(q.as_str()),
                        None => true,
                    })
                    .collect();
                let total = filtered.len();
                Json(json!({
                    "success": true,
                    "data": filtered,
                    "pagination": { "page": 1, "limit": 12, "total": total, "totalPages": 1 }
                }))
            }),
        )
        .route(
            "/api/tier-lists/:id",
            get(|axum::extract::Path(id): axum::extract::Path<i64>| async move {
                if id == 1 {
                    (
                        StatusCode::OK,
                        Json(json!({
                            "success": true,
                            "data": {
                                "id": 1,
                                "name": "Боевики",
                                "created_at": "2024-01-01T00:00:00Z",
                                "tiers": {
                                    "S": [
                                        { "movie_id": 1, "title": "Матрица", "original_title": null,
                                          "release_year": 1999, "poster_url": null, "position": 0 }
                                    ],
                                    "A": [], "B": [], "C": [], "D": [], "F": []
                                },
                                "unassigned": [movie_json(2, "Брат")]
                            }
                        })),
                    )
                } else {
                    (
                        StatusCode::NOT_FOUND,
                        Json(json!({ "success": false, "message": "Tier list not found" })),
                    )
                }
            }),
        )
        .route(
            "/api/tier-lists/:id/movies",
            post(|| async {
                (
                    StatusCode::CREATED,
                    Json(json!({ "success": true, "message": "Movie added to tier list" })),
                )
            }),
        )
        .route(
            "/api/genres",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "success": false,
                        "message": "Genre with this name already exists"
                    })),
                )
            }),
        )
}

async fn spawn_stub() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, stub_router()).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_movie_list_parses_envelope_and_pagination() {
    let base_url = spawn_stub().await;
    let client = MovieClient::new(ApiClient::new(base_url));

    let (movies, pagination) = client
        .list(&MovieFilters::default(), None, None)
        .await
        .unwrap();

    assert_eq!(movies.len(), 2);
    assert_eq!(movies[0].title, "Матрица");
    assert_eq!(movies[0].avg_rating, Some(9.5));
    let pagination = pagination.unwrap();
    assert_eq!(pagination.total, 2);
    assert_eq!(pagination.total_pages, 1);
}

#[tokio::test]
async fn test_movie_list_forwards_search_filter() {
    let base_url = spawn_stub().await;
    let client = MovieClient::new(ApiClient::new(base_url));

    let filters = MovieFilters {
        search: Some("Брат".to_string()),
        ..Default::default()
    };
    let (movies, _) = client.list(&filters, None, None).await.unwrap();

    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].title, "Брат");
}

#[tokio::test]
async fn test_tier_list_fetch_parses_buckets_and_unassigned() {
    let base_url = spawn_stub().await;
    let client = TierListClient::new(ApiClient::new(base_url));

    let detail = client.fetch(1).await.unwrap();

    assert_eq!(detail.name, "Боевики");
    assert_eq!(detail.tiers[&Tier::S].len(), 1);
    assert_eq!(detail.tiers[&Tier::S][0].movie_id, 1);
    assert!(detail.tiers[&Tier::F].is_empty());
    assert_eq!(detail.unassigned.len(), 1);
    assert_eq!(detail.unassigned[0].title, "Брат");
}

#[tokio::test]
async fn test_add_movie_succeeds_on_message_envelope() {
    let base_url = spawn_stub().await;
    let client = TierListClient::new(ApiClient::new(base_url));

    client.add_movie(1, 2, Tier::B, 0).await.unwrap();
}

#[tokio::test]
async fn test_server_failure_becomes_api_error_with_message() {
    let base_url = spawn_stub().await;
    let client = TierListClient::new(ApiClient::new(base_url));

    let err = client.fetch(404).await.unwrap_err();
    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Tier list not found");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_conflict_message_surfaces_through_genre_client() {
    let base_url = spawn_stub().await;
    let client = kinoteka::client::GenreClient::new(ApiClient::new(base_url));

    let err = client
        .create(&kinoteka::models::GenreInput {
            name: "Драма".to_string(),
            description: None,
        })
        .await
        .unwrap_err();

    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 400);
            assert!(message.contains("already exists"));
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}
