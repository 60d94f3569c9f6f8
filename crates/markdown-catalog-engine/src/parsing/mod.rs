//! # Structural Parsing
//!
//! Rebuilds the catalog hierarchy from a token tree in a single depth-first
//! pass.
//!
//! ## Modules
//!
//! - **`tags`**: `TagTracker`, the open-tag stack and its context queries
//! - **`builder`**: `HierarchyBuilder`, reacting to heading and link boundaries
//! - **`classify`**: `classify_text`, deciding which field a text token fills
//!
//! ## Key Invariants
//!
//! - Every close token must match the innermost open tag; any mismatch fails
//!   the whole parse
//! - No tag may remain open once the traversal ends
//! - Traversal is iterative; nesting beyond `ParseOptions::max_depth` fails
//!   instead of growing without bound

pub mod builder;
pub mod classify;
pub mod tags;

use crate::models::{Document, Section};
use crate::tokens::{Attrs, PulldownTokenizer, Tag, Token, Tokenizer};

use builder::HierarchyBuilder;
use classify::classify_text;
use tags::TagTracker;

pub const DEFAULT_MAX_DEPTH: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Unexpected closing tag </{tag}> with no open tag")]
    UnexpectedClose { tag: Tag },
    #[error("Mismatched closing tag: expected </{expected}>, found </{found}>")]
    MismatchedClose { expected: Tag, found: Tag },
    #[error("Unclosed tags at end of document: {}", format_tags(.open))]
    UnclosedTags { open: Vec<Tag> },
    #[error("Token nesting exceeds the limit of {limit}")]
    NestingTooDeep { limit: usize },
}

fn format_tags(tags: &[Tag]) -> String {
    tags.iter()
        .map(|t| format!("<{t}>"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum number of open tags plus nested token levels.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Parses catalog markdown into a [`Document`].
pub struct Parser<T: Tokenizer = PulldownTokenizer> {
    tokenizer: T,
    options: ParseOptions,
}

impl Parser {
    pub fn new(options: ParseOptions) -> Self {
        Self::with_tokenizer(PulldownTokenizer::new(), options)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(ParseOptions::default())
    }
}

impl<T: Tokenizer> Parser<T> {
    pub fn with_tokenizer(tokenizer: T, options: ParseOptions) -> Self {
        Self { tokenizer, options }
    }

    /// Tokenizes `text` and parses the result.
    pub fn parse(&self, text: &str) -> Result<Document, ParseError> {
        let tokens = self.tokenizer.tokenize(text);
        self.parse_tokens(text, &tokens)
    }

    /// Parses an already tokenized document; `text` is kept as the source.
    pub fn parse_tokens(&self, text: &str, tokens: &[Token]) -> Result<Document, ParseError> {
        let mut traversal = Traversal::new(self.options);
        traversal.run(tokens)?;
        let document = Document::new(text, traversal.finish()?);
        log::debug!(
            "parsed {} sections with {} links",
            document.sections.len(),
            document.link_count()
        );
        Ok(document)
    }
}

/// Parses `text` with the default tokenizer and options.
pub fn parse(text: &str) -> Result<Document, ParseError> {
    Parser::default().parse(text)
}

/// Parses a token tree produced by the caller.
pub fn parse_tokens(text: &str, tokens: &[Token]) -> Result<Document, ParseError> {
    Parser::default().parse_tokens(text, tokens)
}

/// Per-call traversal context shared by the tracker, builder and classifier.
struct Traversal {
    tags: TagTracker,
    builder: HierarchyBuilder,
    options: ParseOptions,
}

impl Traversal {
    fn new(options: ParseOptions) -> Self {
        Self {
            tags: TagTracker::new(),
            builder: HierarchyBuilder::new(),
            options,
        }
    }

    /// Visits tokens depth first, children before the parent's next sibling.
    fn run(&mut self, tokens: &[Token]) -> Result<(), ParseError> {
        let mut pending = vec![tokens.iter()];
        while let Some(level) = pending.last_mut() {
            let Some(token) = level.next() else {
                pending.pop();
                continue;
            };
            // Open tags plus the child levels entered below the root.
            let nesting = self.tags.depth() + pending.len() - 1;
            match token {
                Token::Open { tag, attrs } => {
                    self.check_depth(nesting + 1)?;
                    self.open(tag, attrs);
                }
                Token::Close { tag } => self.close(tag)?,
                Token::Text(text) => {
                    classify_text(&self.tags, &mut self.builder, text);
                }
                Token::Inline(children) | Token::Image { children, .. } => {
                    self.check_depth(nesting + 1)?;
                    pending.push(children.iter());
                }
                Token::Code(_) | Token::Break => {}
            }
        }
        Ok(())
    }

    fn check_depth(&self, depth: usize) -> Result<(), ParseError> {
        if depth > self.options.max_depth {
            return Err(ParseError::NestingTooDeep {
                limit: self.options.max_depth,
            });
        }
        Ok(())
    }

    fn open(&mut self, tag: &Tag, attrs: &Attrs) {
        match tag {
            Tag::Heading(2) => {
                self.builder.open_section();
            }
            Tag::Heading(3) => {
                self.builder.open_subsection();
            }
            Tag::Link => {
                if let Some(href) = attrs.get("href") {
                    self.builder.open_link(href);
                }
            }
            _ => {}
        }
        self.tags.push(tag.clone(), attrs.clone());
    }

    fn close(&mut self, tag: &Tag) -> Result<(), ParseError> {
        self.tags.pop(tag)?;
        if *tag == Tag::Link {
            self.builder.close_link();
        }
        Ok(())
    }

    fn finish(self) -> Result<Vec<Section>, ParseError> {
        if !self.tags.is_empty() {
            return Err(ParseError::UnclosedTags {
                open: self.tags.open_tags(),
            });
        }
        Ok(self.builder.finish())
    }
}

#[cfg(test)]
mod tests;
