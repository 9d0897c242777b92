//! Section rows as written to the CSV output

use serde::Serialize;

/// Column headers of the CSV output, in record order
pub const HEADERS: [&str; 5] = ["Category", "Name", "Title", "Description", "Notes"];

/// A single extracted section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Row {
    /// Title of the nearest enclosing top-level (or parent) section
    pub category: String,

    /// Section number with surrounding dots trimmed (e.g. "3.2")
    pub name: String,

    /// Heading text following the section number
    pub title: String,

    /// Body text accumulated under the section heading
    pub description: String,

    /// Reserved, always empty
    pub notes: String,
}

/// Section titles whose rows are never written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipList {
    titles: Vec<String>,
}

impl SkipList {
    /// Sections left out of the output unless configured otherwise
    pub const DEFAULT_TITLES: [&'static str; 8] = [
        "Introduction",
        "Scope",
        "Definitions",
        "Acronyms",
        "Revisions",
        "Publication and Repository Responsibilities",
        "Acknowledgements",
        "References",
    ];

    /// Create a skip list from arbitrary titles
    pub fn new<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            titles: titles.into_iter().map(Into::into).collect(),
        }
    }

    /// Case-insensitive exact match against the list
    pub fn contains(&self, title: &str) -> bool {
        let title = title.to_lowercase();
        self.titles.iter().any(|t| t.to_lowercase() == title)
    }

    /// Whether a row with this category and title must be dropped
    pub fn skips(&self, row: &Row) -> bool {
        self.contains(&row.category) || self.contains(&row.title)
    }
}

impl Default for SkipList {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TITLES)
    }
}
