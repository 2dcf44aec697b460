use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A movie genre; names are unique across the catalog
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Genre {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Per-genre usage statistics
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GenreStats {
    pub id: i64,
    pub name: String,
    pub movie_count: i64,
    pub avg_rating: Option<f64>,
}

/// Incoming payload for genre create and update
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GenreInput {
    pub name: String,
    pub description: Option<String>,
}

impl GenreInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Genre name is required".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_rejected() {
        let input = GenreInput {
            name: "  ".to_string(),
            description: None,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_valid_name_accepted() {
        let input = GenreInput {
            name: "Драма".to_string(),
            description: None,
        };
        assert!(input.validate().is_ok());
    }
}
