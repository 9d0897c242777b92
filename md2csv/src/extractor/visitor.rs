//! Section extraction over the markdown event stream
//!
//! pulldown-cmark yields the document tree in document order: `Start` enters a
//! node, `End` leaves it, and everything else is a leaf. Numbered headings open
//! sections; the text between two of them becomes the description of the first.

use super::error::ExtractError;
use super::row::{Row, SkipList};
use super::section_index::SectionIndex;
use super::section_number::NumberedHeading;
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd, TextMergeStream};
use regex::Regex;
use std::sync::OnceLock;

/// Whitespace at the start of a line, including whole blank lines
static LEADING_BLANKS: OnceLock<Regex> = OnceLock::new();

fn leading_blanks() -> &'static Regex {
    LEADING_BLANKS.get_or_init(|| Regex::new(r"(?m)^\s+").expect("Invalid blank line regex"))
}

/// Markdown extensions enabled when parsing source documents
fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// Where the walk is relative to the heading currently open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeadingState {
    /// Not inside a heading, or inside a heading treated as body text
    Outside,
    /// Heading entered, its first child not seen yet
    AwaitingFirstChild,
    /// Heading consumed for classification; children are ignored until it closes
    Skipping,
}

/// Walks one document and pushes completed section rows to `emit`
///
/// Holds the single "current section" accumulator, the section index and the
/// stack of open nodes. All of it is scoped to one document.
pub struct SectionExtractor<'a, F> {
    /// Titles whose sections are dropped
    skip_list: &'a SkipList,

    /// Receives each completed row, in document order
    emit: F,

    /// Section being accumulated
    current: Row,

    /// Titles of the sections seen so far
    index: SectionIndex,

    /// Closing tags of the nodes entered but not yet left
    open: Vec<TagEnd>,

    /// Heading classification state
    heading: HeadingState,

    /// Depth of containers whose content is dropped (code and HTML blocks, metadata)
    suppressed: usize,

    /// Print one dot per visited node
    progress: bool,

    /// Rows handed to `emit`
    emitted: usize,
}

impl<'a, F> SectionExtractor<'a, F>
where
    F: FnMut(Row) -> Result<(), ExtractError>,
{
    /// Create an extractor with an empty accumulator
    ///
    /// # Parameters
    /// * `skip_list` - Titles whose sections are never emitted
    /// * `emit` - Called once per completed row; an error aborts the walk
    pub fn new(skip_list: &'a SkipList, emit: F) -> Self {
        Self {
            skip_list,
            emit,
            current: Row::default(),
            index: SectionIndex::new(),
            open: Vec::new(),
            heading: HeadingState::Outside,
            suppressed: 0,
            progress: false,
            emitted: 0,
        }
    }

    /// Print a dot to stdout for every node visited
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Parse markdown and walk the whole document
    ///
    /// # Parameters
    /// * `markdown` - Source document text
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of rows emitted
    /// * `Err(ExtractError)` - Inconsistent parser output or the sink hung up
    pub fn run(mut self, markdown: &str) -> Result<usize, ExtractError> {
        let parser = Parser::new_ext(markdown, parser_options());
        self.walk(TextMergeStream::new(parser))?;
        self.finish()
    }

    /// Visit a sequence of events in document order
    pub fn walk<'e, I>(&mut self, events: I) -> Result<(), ExtractError>
    where
        I: IntoIterator<Item = Event<'e>>,
    {
        for event in events {
            self.process_event(event)?;
        }
        Ok(())
    }

    /// Leave the document: flush the last open section
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of rows emitted over the whole walk
    /// * `Err(ExtractError)` - Nodes left open, or the sink hung up
    pub fn finish(mut self) -> Result<usize, ExtractError> {
        if !self.open.is_empty() {
            return Err(ExtractError::UnterminatedNodes {
                open: self.open.len(),
            });
        }

        self.flush()?;

        if self.progress {
            println!();
        }
        log::debug!(
            "Indexed {} numbered sections, emitted {} rows",
            self.index.count(),
            self.emitted
        );

        Ok(self.emitted)
    }

    /// Process a single event
    fn process_event(&mut self, event: Event<'_>) -> Result<(), ExtractError> {
        if self.progress {
            print!(".");
        }

        self.track_nesting(&event)?;

        match self.heading {
            HeadingState::Outside => {}
            HeadingState::Skipping => {
                if matches!(event, Event::End(TagEnd::Heading(_))) {
                    self.heading = HeadingState::Outside;
                }
                return Ok(());
            }
            HeadingState::AwaitingFirstChild => match &event {
                Event::Text(text) => {
                    if self.enter_heading(text)? {
                        self.heading = HeadingState::Skipping;
                        return Ok(());
                    }
                    // Not numbered: the heading is body text like any other
                    self.heading = HeadingState::Outside;
                }
                Event::End(TagEnd::Heading(_)) => {
                    self.heading = HeadingState::Outside;
                }
                _ => {
                    log::debug!("Skipping heading that does not start with plain text");
                    self.heading = HeadingState::Skipping;
                    return Ok(());
                }
            },
        }

        match event {
            Event::Start(tag) => self.handle_start_tag(&tag),
            Event::End(tag_end) => self.handle_end_tag(tag_end),
            Event::Text(text) => self.append(&text),
            Event::SoftBreak => self.append("\n"),
            Event::HardBreak => self.append("\n\n"),
            // Literal payloads that never reach the description
            Event::Code(_)
            | Event::InlineMath(_)
            | Event::DisplayMath(_)
            | Event::Html(_)
            | Event::InlineHtml(_)
            | Event::FootnoteReference(_)
            | Event::Rule
            | Event::TaskListMarker(_) => {}
        }

        Ok(())
    }

    /// Check that every leaving event closes the innermost entered node
    fn track_nesting(&mut self, event: &Event<'_>) -> Result<(), ExtractError> {
        match event {
            Event::Start(tag) => self.open.push(tag.to_end()),
            Event::End(tag_end) => match self.open.pop() {
                Some(open) if open == *tag_end => {}
                Some(open) => {
                    return Err(ExtractError::ParseInconsistency {
                        expected: format!("{open:?}"),
                        found: format!("{tag_end:?}"),
                    });
                }
                None => {
                    return Err(ExtractError::ParseInconsistency {
                        expected: "Document".to_string(),
                        found: format!("{tag_end:?}"),
                    });
                }
            },
            _ => {}
        }
        Ok(())
    }

    /// Handle entering a node
    fn handle_start_tag(&mut self, tag: &Tag<'_>) {
        match tag {
            Tag::Paragraph => self.append("\n"),
            Tag::Heading { .. } => self.heading = HeadingState::AwaitingFirstChild,
            Tag::Item => self.append("\t"),

            // Literal payloads arrive as Text inside these
            Tag::CodeBlock(_) | Tag::HtmlBlock | Tag::MetadataBlock(_) => self.suppressed += 1,

            // Traversed for their children only
            Tag::BlockQuote(_)
            | Tag::List(_)
            | Tag::Table(_)
            | Tag::TableHead
            | Tag::TableRow
            | Tag::TableCell
            | Tag::Emphasis
            | Tag::Strong
            | Tag::Strikethrough
            | Tag::Superscript
            | Tag::Subscript
            | Tag::Link { .. }
            | Tag::Image { .. }
            | Tag::FootnoteDefinition(_)
            | Tag::DefinitionList
            | Tag::DefinitionListTitle
            | Tag::DefinitionListDefinition => {}
        }
    }

    /// Handle leaving a node
    fn handle_end_tag(&mut self, tag_end: TagEnd) {
        match tag_end {
            TagEnd::CodeBlock | TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {
                self.suppressed = self.suppressed.saturating_sub(1);
            }

            TagEnd::Paragraph
            | TagEnd::Heading(_)
            | TagEnd::Item
            | TagEnd::BlockQuote(_)
            | TagEnd::List(_)
            | TagEnd::Table
            | TagEnd::TableHead
            | TagEnd::TableRow
            | TagEnd::TableCell
            | TagEnd::Emphasis
            | TagEnd::Strong
            | TagEnd::Strikethrough
            | TagEnd::Superscript
            | TagEnd::Subscript
            | TagEnd::Link
            | TagEnd::Image
            | TagEnd::FootnoteDefinition
            | TagEnd::DefinitionList
            | TagEnd::DefinitionListTitle
            | TagEnd::DefinitionListDefinition => {}
        }
    }

    /// Classify a heading from the text of its first child
    ///
    /// # Returns
    /// * `Ok(true)` - The heading opened a new section
    /// * `Ok(false)` - The heading is not a numbered section heading
    fn enter_heading(&mut self, text: &str) -> Result<bool, ExtractError> {
        let Some(heading) = NumberedHeading::parse(text) else {
            log::debug!("Heading {text:?} is not a numbered section");
            return Ok(false);
        };

        self.flush()?;

        self.current.name = heading.name.clone();
        self.current.title = heading.title.clone();
        self.current.description.clear();

        if heading.name.starts_with(self.current.category.as_str()) {
            self.current.category = heading.title.clone();
        }

        self.index.record(&heading.name, &heading.title);

        match heading.parent_name() {
            None => self.current.category = heading.title.clone(),
            Some(parent) => {
                if let Some(parent_title) = self.index.title(parent) {
                    self.current.category = parent_title.to_string();
                }
            }
        }

        log::debug!(
            "Section {} {:?} (depth {}) in category {:?}",
            self.current.name,
            self.current.title,
            heading.depth(),
            self.current.category
        );

        Ok(true)
    }

    /// Append body text if a section is active and the content is not dropped
    fn append(&mut self, text: &str) {
        if self.current.category.is_empty() || self.suppressed > 0 {
            return;
        }
        self.current.description.push_str(text);
    }

    /// Emit the accumulated section unless it is empty or skipped
    fn flush(&mut self) -> Result<(), ExtractError> {
        let description = leading_blanks()
            .replace_all(self.current.description.trim(), "\n")
            .into_owned();

        if description.is_empty() {
            return Ok(());
        }
        if self.skip_list.skips(&self.current) {
            log::debug!(
                "Skipping section {} {:?} (category {:?})",
                self.current.name,
                self.current.title,
                self.current.category
            );
            return Ok(());
        }

        let row = Row {
            category: self.current.category.clone(),
            name: self.current.name.clone(),
            title: self.current.title.clone(),
            description,
            notes: String::new(),
        };
        (self.emit)(row)?;
        self.emitted += 1;

        Ok(())
    }
}
