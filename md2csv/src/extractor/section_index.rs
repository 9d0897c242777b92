//! Lookup of section titles by section name

use std::collections::HashMap;

/// Titles of the numbered sections seen so far in one document
///
/// Used to resolve the category of a nested section from its parent's title.
#[derive(Debug, Default)]
pub struct SectionIndex {
    titles: HashMap<String, String>,
}

impl SectionIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the title of a section, replacing any earlier entry
    pub fn record(&mut self, name: &str, title: &str) {
        self.titles.insert(name.to_string(), title.to_string());
    }

    /// Title recorded for a section name
    pub fn title(&self, name: &str) -> Option<&str> {
        self.titles.get(name).map(String::as_str)
    }

    /// Number of sections recorded
    pub fn count(&self) -> usize {
        self.titles.len()
    }
}
