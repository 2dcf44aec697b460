use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt::Display;
use std::str::FromStr;

use super::{Actor, Genre, Reference, Review};

/// Earliest year a movie can carry (the Roundhay Garden Scene)
pub const MIN_RELEASE_YEAR: i32 = 1888;

/// Whether a movie has been watched or sits on the watchlist
///
/// The status only changes through the explicit watchlist add/remove
/// operations, never through a plain movie update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovieStatus {
    Watched,
    Watchlist,
}

impl MovieStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovieStatus::Watched => "watched",
            MovieStatus::Watchlist => "watchlist",
        }
    }
}

impl Display for MovieStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MovieStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "watched" => Ok(MovieStatus::Watched),
            "watchlist" => Ok(MovieStatus::Watchlist),
            other => Err(format!("Invalid movie status: {}", other)),
        }
    }
}

/// A catalog movie as returned by list and detail endpoints
///
/// `genres` carries the comma-joined genre names and `avg_rating` the mean of
/// the movie's reviews; both come from the aggregating list query and are
/// omitted from the JSON when absent.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub original_title: Option<String>,
    pub release_year: i32,
    pub director: Option<String>,
    pub poster_url: Option<String>,
    pub trailer_url: Option<String>,
    pub duration: Option<i32>,
    pub description: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[sqlx(default)]
    pub genres: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[sqlx(default)]
    pub avg_rating: Option<f64>,
}

/// Movie detail: the row plus its full genre, actor and review lists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub movie: Movie,
    pub genres: Vec<Genre>,
    pub actors: Vec<Actor>,
    pub reviews: Vec<Review>,
}

/// Incoming payload for movie create and update
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MovieInput {
    pub title: String,
    pub original_title: Option<String>,
    pub release_year: i32,
    pub director: Option<String>,
    pub poster_url: Option<String>,
    pub trailer_url: Option<String>,
    pub duration: Option<i32>,
    pub description: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub genres: Vec<Reference>,
    #[serde(default)]
    pub actors: Vec<Reference>,
}

impl MovieInput {
    /// Validates the payload against the catalog invariants
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title is required".to_string());
        }
        let max_year = Utc::now().year() + 1;
        if self.release_year < MIN_RELEASE_YEAR || self.release_year > max_year {
            return Err(format!(
                "Release year must be between {} and {}",
                MIN_RELEASE_YEAR, max_year
            ));
        }
        if let Some(duration) = self.duration {
            if duration <= 0 {
                return Err("Duration must be a positive number of minutes".to_string());
            }
        }
        Ok(())
    }
}

/// Filter parameters accepted by the movie list endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieFilters {
    pub genre: Option<String>,
    pub min_rating: Option<f64>,
    pub max_rating: Option<f64>,
    pub search: Option<String>,
    pub status: Option<MovieStatus>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// Columns the movie list may be sorted by
///
/// The sort parameter is matched against this whitelist and silently falls
/// back to the default for anything else, so it can never reach the SQL text.
pub const MOVIE_SORT_WHITELIST: [&str; 5] =
    ["title", "release_year", "created_at", "director", "duration"];

/// Default sort column for movie listings
pub const MOVIE_SORT_DEFAULT: &str = "created_at";

impl MovieFilters {
    /// Resolved (column, direction) pair, whitelisted
    pub fn sort(&self) -> (&str, &str) {
        let column = self
            .sort_by
            .as_deref()
            .filter(|c| MOVIE_SORT_WHITELIST.contains(c))
            .unwrap_or(MOVIE_SORT_DEFAULT);
        let direction = match self.sort_order.as_deref() {
            Some("asc") | Some("ASC") => "ASC",
            _ => "DESC",
        };
        (column, direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> MovieInput {
        MovieInput {
            title: "Брат".to_string(),
            release_year: 1997,
            ..Default::default()
        }
    }

    #[test]
    fn test_release_year_bounds() {
        let mut input = valid_input();
        assert!(input.validate().is_ok());

        input.release_year = 1700;
        assert!(input.validate().is_err());

        input.release_year = 3000;
        assert!(input.validate().is_err());

        input.release_year = MIN_RELEASE_YEAR;
        assert!(input.validate().is_ok());

        input.release_year = Utc::now().year() + 1;
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_blank_title_rejected() {
        let mut input = valid_input();
        input.title = "   ".to_string();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_nonpositive_duration_rejected() {
        let mut input = valid_input();
        input.duration = Some(0);
        assert!(input.validate().is_err());
        input.duration = Some(131);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_sort_whitelist_fallback() {
        let filters = MovieFilters {
            sort_by: Some("title; DROP TABLE movies".to_string()),
            sort_order: Some("asc".to_string()),
            ..Default::default()
        };
        assert_eq!(filters.sort(), (MOVIE_SORT_DEFAULT, "ASC"));

        let filters = MovieFilters {
            sort_by: Some("release_year".to_string()),
            sort_order: None,
            ..Default::default()
        };
        assert_eq!(filters.sort(), ("release_year", "DESC"));
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!("watched".parse::<MovieStatus>(), Ok(MovieStatus::Watched));
        assert_eq!(
            "watchlist".parse::<MovieStatus>(),
            Ok(MovieStatus::Watchlist)
        );
        assert!("queued".parse::<MovieStatus>().is_err());
    }
}
