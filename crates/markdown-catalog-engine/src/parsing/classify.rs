use std::sync::OnceLock;

use regex::Regex;

use crate::tokens::Tag;

use super::{builder::HierarchyBuilder, tags::TagTracker};

/// The field a piece of text was assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    Group,
    Title,
    Subtitle,
    LinkTitle,
    LinkDescription,
}

/// Assigns `text` to at most one field based on the open-tag context.
///
/// Returns the field written, or `None` when the text is not structurally
/// significant and is dropped.
pub fn classify_text(
    tags: &TagTracker,
    builder: &mut HierarchyBuilder,
    text: &str,
) -> Option<TextRole> {
    if tags.matches_context(&[Tag::H1]) {
        builder.set_group(text);
        return Some(TextRole::Group);
    }

    if tags.matches_context(&[Tag::H2]) || tags.matches_context(&[Tag::H3]) {
        if let Some(section) = builder.current_section_mut()
            && section.title.is_none()
        {
            section.title = Some(text.to_string());
            return Some(TextRole::Title);
        }
    } else if tags.matches_context(&[Tag::Paragraph, Tag::Emphasis]) {
        if let Some(section) = builder.current_section_mut()
            && section.subtitle.is_none()
            && section.links.is_empty()
        {
            section.subtitle = Some(text.to_string());
            return Some(TextRole::Subtitle);
        }
    } else if tags.matches_context(&[Tag::Link]) {
        if let Some(link) = builder.current_link_mut()
            && link.title.is_none()
        {
            link.title = Some(text.to_string());
            return Some(TextRole::LinkTitle);
        }
    } else if tags.matches_context(&[Tag::BulletList, Tag::ListItem, Tag::Paragraph])
        && let Some(link) = builder.previous_link_mut()
        && link.description.is_none()
        && let Some(description) = trailing_description(text)
    {
        link.description = Some(description.to_string());
        return Some(TextRole::LinkDescription);
    }

    log::trace!("discarding text {text:?}");
    None
}

/// Extracts `rest` from text shaped like `  - rest`.
fn trailing_description(text: &str) -> Option<&str> {
    static DESCRIPTION: OnceLock<Regex> = OnceLock::new();
    let re = DESCRIPTION
        .get_or_init(|| Regex::new(r"^\s*-\s+(.*)").expect("Invalid description regex"));
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
