//! Inline styles
//!
//! Ordered property → value map backing a view element's `style` attribute.

/// Inline style declarations in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleMap {
    declarations: Vec<(String, String)>,
}

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an inline style string such as `color:red; margin: 0 auto`
    pub fn parse(s: &str) -> Self {
        let mut styles = Self::new();
        styles.set_value(s);
        styles
    }

    /// Replace all declarations with the ones parsed from `value`.
    ///
    /// Declarations without a colon, with an empty value, or whose property
    /// contains whitespace are dropped.
    pub fn set_value(&mut self, value: &str) {
        self.declarations.clear();
        for declaration in value.split(';') {
            let Some((property, value)) = declaration.split_once(':') else {
                continue;
            };
            let property = property.trim();
            let value = value.trim();
            if property.is_empty()
                || value.is_empty()
                || property.chars().any(char::is_whitespace)
            {
                continue;
            }
            self.set(property, value);
        }
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Get the value of a property
    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, property: &str) -> bool {
        self.get(property).is_some()
    }

    /// Set a property, keeping its original slot when overwriting
    pub fn set(&mut self, property: &str, value: &str) {
        match self.declarations.iter_mut().find(|(p, _)| p == property) {
            Some((_, v)) => *v = value.to_string(),
            None => self
                .declarations
                .push((property.to_string(), value.to_string())),
        }
    }

    /// Remove a property, returns `true` if it was present
    pub fn remove(&mut self, property: &str) -> bool {
        let before = self.declarations.len();
        self.declarations.retain(|(p, _)| p != property);
        self.declarations.len() != before
    }

    pub fn clear(&mut self) {
        self.declarations.clear();
    }

    /// Serialized `style` attribute value: `prop:value;` per declaration
    pub fn value(&self) -> String {
        self.declarations
            .iter()
            .map(|(p, v)| format!("{p}:{v};"))
            .collect()
    }

    /// Same declarations, order ignored
    pub fn same_declarations(&self, other: &StyleMap) -> bool {
        self.len() == other.len() && self.iter().all(|(p, v)| other.get(p) == Some(v))
    }

    /// Property names in insertion order
    pub fn properties(&self) -> impl Iterator<Item = &str> {
        self.declarations.iter().map(|(p, _)| p.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations
            .iter()
            .map(|(p, v)| (p.as_str(), v.as_str()))
    }
}
