use serde::{Deserialize, Serialize};

/// A parsed catalog: the source text plus its top-level sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// The markdown the document was parsed from.
    pub source: String,
    /// Sections opened by level-2 headings, in document order.
    pub sections: Vec<Section>,
}

impl Document {
    pub fn new(source: impl Into<String>, sections: Vec<Section>) -> Self {
        Self {
            source: source.into(),
            sections,
        }
    }

    /// Iterate over every section, top-level sections followed by their subsections.
    pub fn iter_sections(&self) -> impl Iterator<Item = &Section> {
        self.sections
            .iter()
            .flat_map(|s| std::iter::once(s).chain(s.subsections.iter()))
    }

    /// Total number of links across all sections and subsections.
    pub fn link_count(&self) -> usize {
        self.iter_sections().map(|s| s.links.len()).sum()
    }
}

/// A heading-delimited unit of the catalog.
///
/// Level-2 headings produce top-level sections; level-3 headings produce
/// subsections of the level-2 section above them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Text of the level-1 heading in effect when the section was opened.
    /// Only top-level sections carry a group.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub title: Option<String>,
    /// One-line description given in emphasis before the first link.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub subsections: Vec<Section>,
    #[serde(default)]
    pub links: Vec<Link>,
}

/// An annotated link inside a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    /// Visible link text.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub title: Option<String>,
    /// Trailing `- text` explanation following the link.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    /// Reserved classification slot. The parser never fills it in.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none", default)]
    pub kind: Option<LinkKind>,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            title: None,
            description: None,
            kind: None,
        }
    }
}

/// Where a link points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// An in-page `#fragment`.
    Anchor,
    Github,
    External,
}
