//! Ordered query parameters
//!
//! Values are kept raw and percent-encoded by reqwest when the request is
//! built, so names containing spaces or slashes reach the API intact.

/// Ordered list of query string pairs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair
    pub fn push(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.pairs.push((key.into(), value.to_string()));
        self
    }

    /// Append a pair when a value is present
    pub fn push_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.push(key, value),
            None => self,
        }
    }

    /// Append `key=true` when `enabled`
    pub fn flag(self, key: impl Into<String>, enabled: bool) -> Self {
        if enabled {
            self.push(key, "true")
        } else {
            self
        }
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
