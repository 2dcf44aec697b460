use std::fmt::Display;

/// Query-string builder for the entity clients
///
/// Collects key/value pairs, skipping absent and empty values so the server
/// never sees `?search=` style noise. Percent-encoding is left to the HTTP
/// client when the pairs are attached to a request.
#[derive(Debug, Clone, Default)]
pub struct QueryString {
    pairs: Vec<(String, String)>,
}

impl QueryString {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pair unconditionally
    pub fn push(mut self, key: &str, value: impl Display) -> Self {
        self.pairs.push((key.to_string(), value.to_string()));
        self
    }

    /// Adds a pair when the value is present and non-empty
    pub fn push_opt(mut self, key: &str, value: Option<impl Display>) -> Self {
        if let Some(value) = value {
            let value = value.to_string();
            if !value.is_empty() {
                self.pairs.push((key.to_string(), value));
            }
        }
        self
    }

    /// The collected pairs, for the HTTP client to encode
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_none_and_empty() {
        let qs = QueryString::new()
            .push_opt("genre", Some("Драма"))
            .push_opt("search", Some(""))
            .push_opt("minRating", None::<i64>)
            .push("page", 2);

        assert_eq!(
            qs.pairs(),
            &[
                ("genre".to_string(), "Драма".to_string()),
                ("page".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_builder() {
        assert!(QueryString::new().is_empty());
    }
}
