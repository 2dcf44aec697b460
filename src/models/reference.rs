use serde::{Deserialize, Serialize};

/// Reference to a genre or actor in a movie payload
///
/// Movie create/update accept either the id of an existing row or a name to
/// look up or create. The two shapes arrive as `7` or `{"name": "Drama"}` and
/// are resolved by an explicit lookup-or-create step inside the movie write
/// transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reference {
    ById(i64),
    ByName { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_id_form() {
        let r: Reference = serde_json::from_str("7").unwrap();
        assert_eq!(r, Reference::ById(7));
    }

    #[test]
    fn test_deserialize_name_form() {
        let r: Reference = serde_json::from_str(r#"{"name": "Drama"}"#).unwrap();
        assert_eq!(
            r,
            Reference::ByName {
                name: "Drama".to_string()
            }
        );
    }

    #[test]
    fn test_deserialize_mixed_list() {
        let refs: Vec<Reference> = serde_json::from_str(r#"[1, {"name": "Crime"}, 3]"#).unwrap();
        assert_eq!(refs.len(), 3);
        assert_eq!(refs[0], Reference::ById(1));
        assert_eq!(
            refs[1],
            Reference::ByName {
                name: "Crime".to_string()
            }
        );
    }
}
