use crate::tokens::{Attrs, Tag};

use super::ParseError;

/// A frame of the open-tag stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenTag {
    pub tag: Tag,
    pub attrs: Attrs,
}

/// Stack of currently open tags, innermost last.
///
/// Knows nothing about catalog semantics: it enforces open/close pairing and
/// answers containment queries.
#[derive(Debug, Default)]
pub struct TagTracker {
    stack: Vec<OpenTag>,
}

impl TagTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tag: Tag, attrs: Attrs) {
        self.stack.push(OpenTag { tag, attrs });
    }

    /// Closes the innermost tag, which must be `tag`.
    pub fn pop(&mut self, tag: &Tag) -> Result<OpenTag, ParseError> {
        match self.stack.pop() {
            None => Err(ParseError::UnexpectedClose { tag: tag.clone() }),
            Some(top) if top.tag != *tag => {
                let expected = top.tag.clone();
                self.stack.push(top);
                Err(ParseError::MismatchedClose {
                    expected,
                    found: tag.clone(),
                })
            }
            Some(top) => Ok(top),
        }
    }

    /// True when the innermost tags are exactly `context`, in order.
    ///
    /// With a stack of `[div, p, a]`, `[p, a]` and `[a]` match but `[div, p]`
    /// does not.
    pub fn matches_context(&self, context: &[Tag]) -> bool {
        if context.len() > self.stack.len() {
            return false;
        }
        let suffix = &self.stack[self.stack.len() - context.len()..];
        suffix
            .iter()
            .zip(context)
            .all(|(open, tag)| open.tag == *tag)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Tags still open, outermost first.
    pub fn open_tags(&self) -> Vec<Tag> {
        self.stack.iter().map(|open| open.tag.clone()).collect()
    }
}
