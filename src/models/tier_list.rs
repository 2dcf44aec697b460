use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;

use super::{Movie, Tier};

/// A tier list row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TierList {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A tier list with its assignment count, for the index view
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TierListSummary {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub movie_count: i64,
}

/// A movie inside one bucket, carrying its stored position
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TierMovie {
    pub movie_id: i64,
    pub title: String,
    pub original_title: Option<String>,
    pub release_year: i32,
    pub poster_url: Option<String>,
    pub position: i32,
}

/// Full board state returned by the tier list detail endpoint
///
/// `tiers` maps every bucket (including empty ones) to its movies in position
/// order. `unassigned` lists catalog movies absent from all buckets; it stays
/// empty until the list has at least one assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierListDetail {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub tiers: BTreeMap<Tier, Vec<TierMovie>>,
    pub unassigned: Vec<Movie>,
}

impl TierListDetail {
    /// Assembles the detail view from bucket rows ordered by position
    pub fn assemble(list: TierList, rows: Vec<(Tier, TierMovie)>, unassigned: Vec<Movie>) -> Self {
        let mut tiers: BTreeMap<Tier, Vec<TierMovie>> =
            Tier::ALL.iter().map(|&t| (t, Vec::new())).collect();
        for (tier, movie) in rows {
            tiers.entry(tier).or_default().push(movie);
        }
        Self {
            id: list.id,
            name: list.name,
            created_at: list.created_at,
            tiers,
            unassigned,
        }
    }
}

/// Incoming payload for tier list creation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierListInput {
    pub name: String,
    #[serde(default)]
    pub movie_ids: Vec<i64>,
}

impl TierListInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Tier list name is required".to_string());
        }
        Ok(())
    }
}

/// Incoming payload for renaming a tier list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierListRename {
    pub name: String,
}

/// Incoming payload for placing a movie into a bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTierMovieInput {
    pub movie_id: i64,
    pub tier: Tier,
    #[serde(default)]
    pub position: Option<i32>,
}

/// Incoming payload for moving a movie to a tier and position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveTierMovieInput {
    pub tier: Tier,
    pub position: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier_movie(movie_id: i64, position: i32) -> TierMovie {
        TierMovie {
            movie_id,
            title: format!("movie-{}", movie_id),
            original_title: None,
            release_year: 2000,
            poster_url: None,
            position,
        }
    }

    #[test]
    fn test_assemble_includes_empty_buckets() {
        let list = TierList {
            id: 1,
            name: "Мой рейтинг".to_string(),
            created_at: Utc::now(),
        };
        let detail = TierListDetail::assemble(list, vec![], vec![]);
        assert_eq!(detail.tiers.len(), 6);
        assert!(detail.tiers.values().all(Vec::is_empty));
        assert!(detail.unassigned.is_empty());
    }

    #[test]
    fn test_assemble_groups_rows_by_tier() {
        let list = TierList {
            id: 1,
            name: "Мой рейтинг".to_string(),
            created_at: Utc::now(),
        };
        let rows = vec![
            (Tier::S, tier_movie(1, 0)),
            (Tier::S, tier_movie(2, 1)),
            (Tier::B, tier_movie(3, 0)),
        ];
        let detail = TierListDetail::assemble(list, rows, vec![]);
        assert_eq!(detail.tiers[&Tier::S].len(), 2);
        assert_eq!(detail.tiers[&Tier::S][1].movie_id, 2);
        assert_eq!(detail.tiers[&Tier::B].len(), 1);
        assert!(detail.tiers[&Tier::F].is_empty());
    }

    #[test]
    fn test_blank_name_rejected() {
        let input = TierListInput {
            name: " ".to_string(),
            movie_ids: vec![],
        };
        assert!(input.validate().is_err());
    }
}
