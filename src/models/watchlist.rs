use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt::Display;
use std::str::FromStr;

/// Viewing priority of a watchlist entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("Invalid priority: {}", other)),
        }
    }
}

/// A watchlist entry joined with its movie
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WatchlistEntry {
    pub movie_id: i64,
    pub title: String,
    pub original_title: Option<String>,
    pub release_year: i32,
    pub poster_url: Option<String>,
    pub priority: String,
    pub notes: Option<String>,
    pub added_date: DateTime<Utc>,
}

/// Incoming payload for adding a movie to the watchlist
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WatchlistInput {
    pub priority: Option<Priority>,
    pub notes: Option<String>,
}

impl WatchlistInput {
    /// Priority to store, defaulting to medium
    pub fn priority(&self) -> Priority {
        self.priority.unwrap_or(Priority::Medium)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_round_trip() {
        for p in [Priority::Low, Priority::Medium, Priority::High] {
            assert_eq!(p.as_str().parse::<Priority>().unwrap(), p);
        }
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_default_priority_is_medium() {
        let input = WatchlistInput::default();
        assert_eq!(input.priority(), Priority::Medium);
    }
}
