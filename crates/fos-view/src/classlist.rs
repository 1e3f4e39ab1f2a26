//! Class list
//!
//! Class tokens of a view element, kept apart from the attribute map so
//! membership tests never re-parse the `class` string.

/// Set of class tokens, iterated in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    tokens: Vec<String>,
}

impl ClassList {
    /// Create empty class list
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a whitespace-separated string
    pub fn parse(s: &str) -> Self {
        let mut list = Self::new();
        list.set_value(s);
        list
    }

    /// Get number of tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Check if there are no tokens
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Check if token exists
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Add a token, returns `false` if it was already present
    pub fn add(&mut self, token: &str) -> bool {
        if token.is_empty() || self.contains(token) {
            return false;
        }
        self.tokens.push(token.to_string());
        true
    }

    /// Remove a token, returns `true` if it was present
    pub fn remove(&mut self, token: &str) -> bool {
        let before = self.tokens.len();
        self.tokens.retain(|t| t != token);
        self.tokens.len() != before
    }

    /// Remove all tokens
    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    /// Replace the contents with the tokens of `value`
    pub fn set_value(&mut self, value: &str) {
        self.tokens.clear();
        for token in value.split_whitespace() {
            self.add(token);
        }
    }

    /// Serialized `class` attribute value
    pub fn value(&self) -> String {
        self.tokens.join(" ")
    }

    /// Same tokens, order ignored
    pub fn same_set(&self, other: &ClassList) -> bool {
        self.len() == other.len() && self.iter().all(|t| other.contains(t))
    }

    /// Iterate over tokens
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|s| s.as_str())
    }
}

impl std::fmt::Display for ClassList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value())
    }
}
