//! Section number recognition for numbered headings

use regex::Regex;
use std::sync::OnceLock;

/// Matches "3", "3.", "3.2", "3.2.1." and so on
static SECTION_FORMAT: OnceLock<Regex> = OnceLock::new();

fn section_format() -> &'static Regex {
    SECTION_FORMAT
        .get_or_init(|| Regex::new(r"^([0-9]+\.?)+$").expect("Invalid section number regex"))
}

/// A heading split into its section number and title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedHeading {
    /// Section name with surrounding dots removed (e.g. "3.2")
    pub name: String,
    /// Heading text after the number, trimmed of whitespace and dots
    pub title: String,
}

impl NumberedHeading {
    /// Classify the text of a heading's first text child
    ///
    /// Splits on the first whitespace character. The first part must look like
    /// a section number; headings such as "Appendix Notes" or a bare "3" yield
    /// `None` and are not section boundaries.
    ///
    /// # Parameters
    /// * `text` - Literal text of the heading's first child
    ///
    /// # Returns
    /// * `Some(NumberedHeading)` - The heading opens a numbered section
    /// * `None` - The heading is not a numbered section heading
    pub fn parse(text: &str) -> Option<Self> {
        let (number, rest) = text.split_once(char::is_whitespace)?;

        let number = number.trim();
        if !section_format().is_match(number) {
            return None;
        }

        Some(Self {
            name: number.trim_matches('.').to_string(),
            title: rest.trim().trim_matches('.').to_string(),
        })
    }

    /// Nesting depth of the section ("3" is 0, "3.2.1" is 2)
    pub fn depth(&self) -> usize {
        self.name.matches('.').count()
    }

    /// Name of the enclosing section, if this is not a top-level section
    ///
    /// "3.2.1" -> "3.2", "3" -> `None`
    pub fn parent_name(&self) -> Option<&str> {
        self.name.rfind('.').map(|idx| &self.name[..idx])
    }
}
