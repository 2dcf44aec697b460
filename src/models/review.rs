use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt::Display;
use std::str::FromStr;

/// The two fixed reviewer personas
///
/// This is not a user system: every review belongs to one of these two names,
/// and each may leave at most one review per movie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reviewer {
    #[serde(rename = "Цеха")]
    Tsekha,
    #[serde(rename = "Паша")]
    Pasha,
}

impl Reviewer {
    pub const ALL: [Reviewer; 2] = [Reviewer::Tsekha, Reviewer::Pasha];

    pub fn as_str(&self) -> &'static str {
        match self {
            Reviewer::Tsekha => "Цеха",
            Reviewer::Pasha => "Паша",
        }
    }
}

impl Display for Reviewer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Reviewer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Цеха" => Ok(Reviewer::Tsekha),
            "Паша" => Ok(Reviewer::Pasha),
            other => Err(format!("Unknown reviewer: {}", other)),
        }
    }
}

/// Lowest and highest allowed rating, inclusive
pub const RATING_RANGE: (i32, i32) = (1, 10);

/// Minimum review text length after trimming
pub const MIN_REVIEW_TEXT_LEN: usize = 10;

/// A stored review
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: i64,
    pub movie_id: i64,
    pub reviewer_name: String,
    pub rating: i32,
    pub review_text: String,
    pub review_date: DateTime<Utc>,
}

/// A review joined with its movie's title for the cross-movie listings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReviewWithMovie {
    pub id: i64,
    pub movie_id: i64,
    pub movie_title: String,
    pub reviewer_name: String,
    pub rating: i32,
    pub review_text: String,
    pub review_date: DateTime<Utc>,
}

/// Aggregate review statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewStats {
    pub total_reviews: i64,
    pub avg_rating: Option<f64>,
    pub reviewers: Vec<ReviewerStats>,
}

/// Per-reviewer breakdown
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReviewerStats {
    pub reviewer_name: String,
    pub review_count: i64,
    pub avg_rating: Option<f64>,
}

/// Incoming payload for review creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewInput {
    pub reviewer_name: String,
    pub rating: i32,
    pub review_text: String,
}

impl ReviewInput {
    /// Validates reviewer, rating range and text length
    pub fn validate(&self) -> Result<Reviewer, String> {
        let reviewer: Reviewer = self.reviewer_name.parse()?;
        validate_rating(self.rating)?;
        validate_review_text(&self.review_text)?;
        Ok(reviewer)
    }
}

/// Incoming payload for review update; the reviewer is fixed at creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewUpdate {
    pub rating: i32,
    pub review_text: String,
}

impl ReviewUpdate {
    pub fn validate(&self) -> Result<(), String> {
        validate_rating(self.rating)?;
        validate_review_text(&self.review_text)
    }
}

/// Filter parameters for the cross-movie review listing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewFilters {
    pub reviewer: Option<String>,
    pub min_rating: Option<i32>,
    pub max_rating: Option<i32>,
    pub movie_id: Option<i64>,
}

/// Checks a rating is an integer in the allowed range
pub fn validate_rating(rating: i32) -> Result<(), String> {
    let (min, max) = RATING_RANGE;
    if rating < min || rating > max {
        return Err(format!("Rating must be between {} and {}", min, max));
    }
    Ok(())
}

/// Checks the trimmed review text meets the minimum length
pub fn validate_review_text(text: &str) -> Result<(), String> {
    if text.trim().chars().count() < MIN_REVIEW_TEXT_LEN {
        return Err(format!(
            "Review text must be at least {} characters",
            MIN_REVIEW_TEXT_LEN
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(reviewer: &str, rating: i32, text: &str) -> ReviewInput {
        ReviewInput {
            reviewer_name: reviewer.to_string(),
            rating,
            review_text: text.to_string(),
        }
    }

    #[test]
    fn test_known_reviewers_accepted() {
        assert_eq!(
            input("Цеха", 8, "Отличный фильм, стоит пересмотреть").validate(),
            Ok(Reviewer::Tsekha)
        );
        assert_eq!(
            input("Паша", 8, "Отличный фильм, стоит пересмотреть").validate(),
            Ok(Reviewer::Pasha)
        );
    }

    #[test]
    fn test_unknown_reviewer_rejected() {
        assert!(input("Вася", 8, "Отличный фильм, стоит пересмотреть")
            .validate()
            .is_err());
    }

    #[test]
    fn test_rating_bounds() {
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(11).is_err());
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(10).is_ok());
    }

    #[test]
    fn test_short_text_rejected() {
        assert!(input("Паша", 7, "коротко").validate().is_err());
        // Whitespace does not count toward the minimum
        assert!(input("Паша", 7, "   ab   ").validate().is_err());
    }

    #[test]
    fn test_reviewer_serde_uses_cyrillic_name() {
        let json = serde_json::to_string(&Reviewer::Pasha).unwrap();
        assert_eq!(json, "\"Паша\"");
    }
}
