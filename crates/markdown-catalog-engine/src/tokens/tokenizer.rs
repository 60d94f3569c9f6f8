use pulldown_cmark::{CowStr, Event, HeadingLevel, Options, Parser, Tag as MdTag};

use super::{Attrs, Tag, Token};

/// Turns markdown text into a token tree.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<Token>;
}

/// [`Tokenizer`] backed by `pulldown-cmark`'s event stream.
#[derive(Debug, Clone, Copy)]
pub struct PulldownTokenizer {
    options: Options,
}

impl PulldownTokenizer {
    pub fn new() -> Self {
        Self {
            options: Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH,
        }
    }

    pub fn with_options(options: Options) -> Self {
        Self { options }
    }
}

impl Default for PulldownTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for PulldownTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut builder = TreeBuilder::default();
        for event in Parser::new_ext(text, self.options) {
            builder.push(event);
        }
        builder.finish()
    }
}

/// Folds the flat event stream into block tokens with inline runs.
#[derive(Default)]
struct TreeBuilder {
    out: Vec<Token>,
    /// Every tag started and not yet ended, innermost last.
    open: Vec<Tag>,
    /// Inline run being collected; deeper levels hold image alt text.
    inline: Vec<Vec<Token>>,
    /// Attributes of images whose alt text is being collected.
    images: Vec<Attrs>,
    /// Whether the current inline run sits in a paragraph we opened ourselves.
    implicit_paragraph: bool,
}

impl TreeBuilder {
    fn push(&mut self, event: Event<'_>) {
        match event {
            Event::Start(MdTag::Image {
                dest_url, title, ..
            }) => {
                self.ensure_inline();
                let mut attrs = Attrs::new().with("src", dest_url.into_string());
                if !title.is_empty() {
                    attrs.push("title", title.into_string());
                }
                self.images.push(attrs);
                self.inline.push(Vec::new());
                self.open.push(Tag::Other("img".to_string()));
            }
            Event::Start(tag) => {
                let (tag, attrs) = convert_tag(tag);
                if is_inline(&tag) {
                    self.ensure_inline();
                    self.sink().push(Token::Open {
                        tag: tag.clone(),
                        attrs,
                    });
                } else {
                    self.flush_inline();
                    self.out.push(Token::Open {
                        tag: tag.clone(),
                        attrs,
                    });
                }
                self.open.push(tag);
            }
            Event::End(_) => self.end(),
            Event::Text(text) => {
                if matches!(self.open.last(), Some(Tag::CodeBlock)) {
                    self.out.push(Token::Code(text.into_string()));
                } else {
                    self.push_text(text);
                }
            }
            Event::Code(code) | Event::InlineMath(code) | Event::DisplayMath(code) => {
                self.ensure_inline();
                self.sink().push(Token::Code(code.into_string()));
            }
            Event::SoftBreak | Event::HardBreak => {
                self.ensure_inline();
                self.sink().push(Token::Break);
            }
            // Raw html, rules, task markers and footnote references carry no
            // text the parser classifies.
            _ => {}
        }
    }

    fn end(&mut self) {
        let Some(tag) = self.open.pop() else {
            return;
        };
        if let Tag::Other(name) = &tag
            && name == "img"
        {
            let children = self.inline.pop().unwrap_or_default();
            let attrs = self.images.pop().unwrap_or_default();
            self.sink().push(Token::Image { attrs, children });
        } else if is_inline(&tag) {
            self.sink().push(Token::Close { tag });
        } else {
            self.flush_inline();
            self.out.push(Token::Close { tag });
        }
    }

    fn push_text(&mut self, text: CowStr<'_>) {
        self.ensure_inline();
        let sink = self.sink();
        if let Some(Token::Text(previous)) = sink.last_mut() {
            previous.push_str(&text);
        } else {
            sink.push(Token::Text(text.into_string()));
        }
    }

    /// Opens an inline run if none is in progress.
    ///
    /// Inline content directly inside a block that is not a leaf (a tight list
    /// item) gets wrapped in a paragraph so it reads like loose content.
    fn ensure_inline(&mut self) {
        if !self.inline.is_empty() {
            return;
        }
        if !self.open.last().is_some_and(holds_inline) {
            self.out.push(Token::open(Tag::Paragraph));
            self.implicit_paragraph = true;
        }
        self.inline.push(Vec::new());
    }

    fn flush_inline(&mut self) {
        // Image levels can only be left open by an unterminated image, which
        // pulldown-cmark never produces; fold them down regardless.
        while self.inline.len() > 1 {
            let children = self.inline.pop().unwrap_or_default();
            let attrs = self.images.pop().unwrap_or_default();
            self.sink().push(Token::Image { attrs, children });
        }
        if let Some(run) = self.inline.pop() {
            self.out.push(Token::Inline(run));
        }
        if self.implicit_paragraph {
            self.out.push(Token::close(Tag::Paragraph));
            self.implicit_paragraph = false;
        }
    }

    fn sink(&mut self) -> &mut Vec<Token> {
        if self.inline.is_empty() {
            self.inline.push(Vec::new());
        }
        let last = self.inline.len() - 1;
        &mut self.inline[last]
    }

    fn finish(mut self) -> Vec<Token> {
        self.flush_inline();
        self.out
    }
}

fn convert_tag(tag: MdTag<'_>) -> (Tag, Attrs) {
    let converted = match tag {
        MdTag::Paragraph => Tag::Paragraph,
        MdTag::Heading { level, .. } => Tag::Heading(heading_level(level)),
        MdTag::BlockQuote(_) => Tag::BlockQuote,
        MdTag::CodeBlock(_) => Tag::CodeBlock,
        MdTag::HtmlBlock => Tag::HtmlBlock,
        MdTag::List(None) => Tag::BulletList,
        MdTag::List(Some(_)) => Tag::OrderedList,
        MdTag::Item => Tag::ListItem,
        MdTag::FootnoteDefinition(_) => Tag::FootnoteDefinition,
        MdTag::Table(_) => Tag::Table,
        MdTag::TableHead => Tag::TableHead,
        MdTag::TableRow => Tag::TableRow,
        MdTag::TableCell => Tag::TableCell,
        MdTag::Emphasis => Tag::Emphasis,
        MdTag::Strong => Tag::Strong,
        MdTag::Strikethrough => Tag::Strikethrough,
        MdTag::Link {
            dest_url, title, ..
        } => {
            let mut attrs = Attrs::new().with("href", dest_url.into_string());
            if !title.is_empty() {
                attrs.push("title", title.into_string());
            }
            return (Tag::Link, attrs);
        }
        other => Tag::Other(format!("{other:?}")),
    };
    (converted, Attrs::new())
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn is_inline(tag: &Tag) -> bool {
    matches!(
        tag,
        Tag::Emphasis | Tag::Strong | Tag::Strikethrough | Tag::Link
    )
}

/// Leaf blocks whose content is an inline run.
fn holds_inline(tag: &Tag) -> bool {
    matches!(tag, Tag::Paragraph | Tag::Heading(_) | Tag::TableCell) || is_inline(tag)
}
