use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An actor; names are unique across the catalog
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Actor {
    pub id: i64,
    pub name: String,
    pub biography: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub photo_url: Option<String>,
}

/// Per-actor usage statistics
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActorStats {
    pub id: i64,
    pub name: String,
    pub movie_count: i64,
}

/// Incoming payload for actor create and update
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ActorInput {
    pub name: String,
    pub biography: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub photo_url: Option<String>,
}

impl ActorInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Actor name is required".to_string());
        }
        if let Some(birth_date) = self.birth_date {
            if birth_date > Utc::now().date_naive() {
                return Err("Birth date cannot be in the future".to_string());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    #[test]
    fn test_future_birth_date_rejected() {
        let input = ActorInput {
            name: "Сергей Бодров".to_string(),
            birth_date: Utc::now().date_naive().checked_add_days(Days::new(2)),
            ..Default::default()
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_past_birth_date_accepted() {
        let input = ActorInput {
            name: "Сергей Бодров".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1971, 12, 27),
            ..Default::default()
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_blank_name_rejected() {
        let input = ActorInput::default();
        assert!(input.validate().is_err());
    }
}
