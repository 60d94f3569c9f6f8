use crate::models::{Link, Section};

/// Index of a section in the builder's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionId(usize);

/// A section under construction. Subsections are arena ids until `finish`.
#[derive(Debug, Default)]
pub struct SectionDraft {
    pub group: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub links: Vec<Link>,
    subsections: Vec<SectionId>,
}

/// Position of a closed link inside its section.
#[derive(Debug, Clone, Copy)]
struct LinkRef {
    section: SectionId,
    index: usize,
}

/// Rebuilds the section tree from the flat stream of heading and link
/// boundaries.
///
/// Level-2 headings open top-level sections, level-3 headings open
/// subsections of the last level-2 section, and links attach to whichever
/// section is current when they open.
#[derive(Debug, Default)]
pub struct HierarchyBuilder {
    arena: Vec<SectionDraft>,
    top_level: Vec<SectionId>,
    current_group: Option<String>,
    current_section: Option<SectionId>,
    current_parent: Option<SectionId>,
    current_link: Option<Link>,
    previous_link: Option<LinkRef>,
}

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a top-level section in the current group.
    pub fn open_section(&mut self) -> SectionId {
        let id = self.alloc(SectionDraft {
            group: self.current_group.clone(),
            ..SectionDraft::default()
        });
        self.top_level.push(id);
        self.current_section = Some(id);
        self.current_parent = None;
        log::debug!("opened section #{} in group {:?}", id.0, self.current_group);
        id
    }

    /// Starts a subsection of the enclosing top-level section.
    ///
    /// Returns `None` (and does nothing) before any section exists.
    pub fn open_subsection(&mut self) -> Option<SectionId> {
        let current = self.current_section?;
        let parent = *self.current_parent.get_or_insert(current);
        let id = self.alloc(SectionDraft::default());
        self.arena[parent.0].subsections.push(id);
        self.current_section = Some(id);
        log::debug!("opened subsection #{} under #{}", id.0, parent.0);
        Some(id)
    }

    /// Starts a link in the current section. Ignored without a section.
    pub fn open_link(&mut self, href: &str) -> bool {
        if self.current_section.is_none() {
            log::trace!("ignoring link to {href} outside any section");
            return false;
        }
        self.current_link = Some(Link::new(href));
        true
    }

    /// Attaches the open link, if any, to the current section.
    pub fn close_link(&mut self) {
        let (Some(link), Some(section)) = (self.current_link.take(), self.current_section) else {
            return;
        };
        let links = &mut self.arena[section.0].links;
        log::debug!("closed link to {} in section #{}", link.href, section.0);
        links.push(link);
        self.previous_link = Some(LinkRef {
            section,
            index: links.len() - 1,
        });
    }

    pub fn set_group(&mut self, group: &str) {
        self.current_group = Some(group.to_string());
    }

    pub fn current_group(&self) -> Option<&str> {
        self.current_group.as_deref()
    }

    pub fn current_section(&self) -> Option<&SectionDraft> {
        self.current_section.map(|id| &self.arena[id.0])
    }

    pub fn current_section_mut(&mut self) -> Option<&mut SectionDraft> {
        self.current_section.map(|id| &mut self.arena[id.0])
    }

    pub fn current_link_mut(&mut self) -> Option<&mut Link> {
        self.current_link.as_mut()
    }

    /// The most recently closed link, the candidate for a trailing description.
    pub fn previous_link_mut(&mut self) -> Option<&mut Link> {
        let LinkRef { section, index } = self.previous_link?;
        self.arena[section.0].links.get_mut(index)
    }

    /// Assembles the owned section tree.
    pub fn finish(self) -> Vec<Section> {
        let mut slots: Vec<Option<SectionDraft>> = self.arena.into_iter().map(Some).collect();
        self.top_level
            .into_iter()
            .filter_map(|id| assemble(&mut slots, id))
            .collect()
    }

    fn alloc(&mut self, draft: SectionDraft) -> SectionId {
        self.arena.push(draft);
        SectionId(self.arena.len() - 1)
    }
}

fn assemble(slots: &mut [Option<SectionDraft>], id: SectionId) -> Option<Section> {
    let draft = slots.get_mut(id.0)?.take()?;
    Some(Section {
        group: draft.group,
        title: draft.title,
        subtitle: draft.subtitle,
        subsections: draft
            .subsections
            .into_iter()
            .filter_map(|child| assemble(slots, child))
            .collect(),
        links: draft.links,
    })
}
