//! Section extraction
//!
//! Turns a markdown document into section rows: numbered headings open
//! sections, body text accumulates under the active section, and each
//! section is categorized by its top-level or parent section title.

mod error;
mod row;
mod section_index;
mod section_number;
mod visitor;

pub use error::ExtractError;
pub use row::{Row, SkipList, HEADERS};
pub use visitor::SectionExtractor;
