//! # Token Tree
//!
//! The parser consumes markdown as a tree of tokens rather than raw text.
//! Block-level open/close tokens sit at the top level; the inline run of a
//! heading or paragraph is wrapped in a single [`Token::Inline`] whose
//! children carry the emphasis, link and text tokens.
//!
//! ## Modules
//!
//! - **`tokenizer`**: [`Tokenizer`] trait and the `pulldown-cmark` backed
//!   [`PulldownTokenizer`]
//!
//! ## Key Invariants
//!
//! - Every [`Token::Open`] has a matching [`Token::Close`] with the same tag,
//!   at the same level of the tree
//! - Open/close pairs nest (stack discipline)

pub mod tokenizer;

use std::fmt;

pub use tokenizer::{PulldownTokenizer, Tokenizer};

/// The element an open/close token pair delimits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    /// `h1`..`h6`
    Heading(u8),
    Paragraph,
    BlockQuote,
    CodeBlock,
    HtmlBlock,
    BulletList,
    OrderedList,
    ListItem,
    Table,
    TableHead,
    TableRow,
    TableCell,
    FootnoteDefinition,
    Emphasis,
    Strong,
    Strikethrough,
    Link,
    /// Anything without a dedicated variant, by name.
    Other(String),
}

impl Tag {
    pub const H1: Tag = Tag::Heading(1);
    pub const H2: Tag = Tag::Heading(2);
    pub const H3: Tag = Tag::Heading(3);

    /// HTML-style element name (`h2`, `p`, `a`, `ul`, ...).
    pub fn name(&self) -> &str {
        match self {
            Tag::Heading(1) => "h1",
            Tag::Heading(2) => "h2",
            Tag::Heading(3) => "h3",
            Tag::Heading(4) => "h4",
            Tag::Heading(5) => "h5",
            Tag::Heading(_) => "h6",
            Tag::Paragraph => "p",
            Tag::BlockQuote => "blockquote",
            Tag::CodeBlock => "pre",
            Tag::HtmlBlock => "html",
            Tag::BulletList => "ul",
            Tag::OrderedList => "ol",
            Tag::ListItem => "li",
            Tag::Table => "table",
            Tag::TableHead => "thead",
            Tag::TableRow => "tr",
            Tag::TableCell => "td",
            Tag::FootnoteDefinition => "footnote",
            Tag::Emphasis => "em",
            Tag::Strong => "strong",
            Tag::Strikethrough => "s",
            Tag::Link => "a",
            Tag::Other(name) => name,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered name/value attribute list of an open token.
///
/// Lookups return the first attribute with a given name, so order matters
/// when a name repeats.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attrs(Vec<(String, String)>);

impl Attrs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Attrs::push`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// Value of the first attribute called `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// One node of the token tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Start of an element.
    Open { tag: Tag, attrs: Attrs },
    /// End of the most recently opened element with the same tag.
    Close { tag: Tag },
    /// Plain text.
    Text(String),
    /// Literal content (inline code, code blocks, math). Never classified.
    Code(String),
    /// Soft or hard line break.
    Break,
    /// An image; its alt text is carried as child tokens.
    Image { attrs: Attrs, children: Vec<Token> },
    /// The inline run of a heading or paragraph.
    Inline(Vec<Token>),
}

impl Token {
    pub fn open(tag: Tag) -> Self {
        Token::Open {
            tag,
            attrs: Attrs::new(),
        }
    }

    pub fn close(tag: Tag) -> Self {
        Token::Close { tag }
    }

    pub fn link_open(href: impl Into<String>) -> Self {
        Token::Open {
            tag: Tag::Link,
            attrs: Attrs::new().with("href", href),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Token::Text(content.into())
    }

    pub fn inline(children: Vec<Token>) -> Self {
        Token::Inline(children)
    }
}
