//! Integration tests for the parsing module.
//!
//! Uses snapshot testing with a plain-text outline for readability.
//! Fixtures (.md) and snapshots (.snap) are co-located in `fixtures/`.


use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::models::{Document, Link, Section};
use crate::parsing::{ParseError, ParseOptions, Parser, parse, parse_tokens};
use crate::tokens::{Attrs, Tag, Token};

// Fixture-based snapshot tests

#[test]
fn fixture_catalog() {
    assert_fixture("catalog");
}

fn assert_fixture(name: &str) {
    let fixtures_dir = format!("{}/src/parsing/tests/fixtures", env!("CARGO_MANIFEST_DIR"));
    let md = std::fs::read_to_string(format!("{fixtures_dir}/{name}.md")).unwrap();

    let doc = parse(&md).unwrap();
    invariants::check(&doc);

    let outline = normalize::outline(&doc);
    insta::with_settings!({
        snapshot_path => fixtures_dir.as_str(),
        prepend_module_to_snapshot => false,
    }, {
        insta::assert_snapshot!(name, outline);
    });
}

fn link(href: &str, title: &str, description: Option<&str>) -> Link {
    Link {
        title: Some(title.to_string()),
        description: description.map(str::to_string),
        ..Link::new(href)
    }
}

fn titles(sections: &[Section]) -> Vec<&str> {
    sections.iter().filter_map(|s| s.title.as_deref()).collect()
}

// Structural scenarios

/// Group, title, subtitle, link and description all land in their fields.
#[test]
fn subtitle_link_and_description() {
    let md = "# Group\n## SectionA\n*Subtitle text*\n\n- [LinkTitle](http://example.com) - Link description\n";
    let doc = parse(md).unwrap();

    assert_eq!(
        doc,
        Document {
            source: md.to_string(),
            sections: vec![Section {
                group: Some("Group".to_string()),
                title: Some("SectionA".to_string()),
                subtitle: Some("Subtitle text".to_string()),
                subsections: vec![],
                links: vec![link(
                    "http://example.com",
                    "LinkTitle",
                    Some("Link description")
                )],
            }],
        }
    );
}

/// Level-3 headings nest under the level-2 section and own their links.
#[test]
fn subsections_own_their_links() {
    let md = "## Parent\n\n### Child A\n\n- [A](https://a.example)\n\n### Child B\n\n- [B](https://b.example)\n";
    let doc = parse(md).unwrap();

    assert_eq!(doc.sections.len(), 1);
    let parent = &doc.sections[0];
    assert!(parent.links.is_empty());
    assert_eq!(titles(&parent.subsections), vec!["Child A", "Child B"]);
    assert_eq!(
        parent.subsections[0].links,
        vec![link("https://a.example", "A", None)]
    );
    assert_eq!(
        parent.subsections[1].links,
        vec![link("https://b.example", "B", None)]
    );
    invariants::check(&doc);
}

/// Emphasis after the first link is not a subtitle.
#[test]
fn subtitle_only_before_first_link() {
    let md = "## Section\n\n- [A](https://a.example)\n\n*Emphasis after links*\n";
    let doc = parse(md).unwrap();

    assert_eq!(doc.sections[0].subtitle, None);
    assert_eq!(doc.sections[0].links.len(), 1);
}

/// A second emphasis paragraph does not replace the subtitle.
#[test]
fn subtitle_is_set_once() {
    let doc = parse("## S\n\n*first*\n\n*second*\n").unwrap();

    assert_eq!(doc.sections[0].subtitle.as_deref(), Some("first"));
    assert!(doc.sections[0].links.is_empty());
}

/// Each level-1 heading replaces the group for the sections that follow.
#[test]
fn group_follows_latest_h1() {
    let md = "# One\n\n## First\n\n# Two\n\n## Second\n";
    let doc = parse(md).unwrap();

    let groups: Vec<_> = doc.sections.iter().map(|s| s.group.as_deref()).collect();
    assert_eq!(groups, vec![Some("One"), Some("Two")]);
}

#[rstest]
#[case::bare_link("## S\n\n- [A](https://a.example)\n")]
#[case::no_dash("## S\n\n- [A](https://a.example) trailing words\n")]
#[case::dash_without_space("## S\n\n- [A](https://a.example) -tight\n")]
#[case::outside_list("## S\n\n[A](https://a.example) - not in a list\n")]
fn description_left_unset(#[case] md: &str) {
    let doc = parse(md).unwrap();
    assert_eq!(
        doc.sections[0].links,
        vec![link("https://a.example", "A", None)]
    );
}

/// A new level-2 heading resets the subsection parent.
#[test]
fn new_section_resets_subsection_parent() {
    let md = "## First\n\n### Sub A\n\n## Second\n\n### Sub B\n";
    let doc = parse(md).unwrap();

    assert_eq!(titles(&doc.sections), vec!["First", "Second"]);
    assert_eq!(titles(&doc.sections[0].subsections), vec!["Sub A"]);
    assert_eq!(titles(&doc.sections[1].subsections), vec!["Sub B"]);
}

#[test]
fn loose_list_descriptions() {
    let md = "## S\n\n- [A](https://a.example) - about A\n\n- [B](https://b.example) - about B\n";
    let doc = parse(md).unwrap();

    assert_eq!(
        doc.sections[0].links,
        vec![
            link("https://a.example", "A", Some("about A")),
            link("https://b.example", "B", Some("about B")),
        ]
    );
}

/// The trailing description belongs to the nearest preceding link.
#[test]
fn description_goes_to_nearest_link() {
    let md = "## S\n\n- [A](https://a.example) [B](https://b.example) - about B\n";
    let doc = parse(md).unwrap();

    assert_eq!(
        doc.sections[0].links,
        vec![
            link("https://a.example", "A", None),
            link("https://b.example", "B", Some("about B")),
        ]
    );
}

#[test]
fn links_before_any_section_are_dropped() {
    let md = "- [A](https://a.example) - orphan\n\n## S\n\n- [B](https://b.example)\n";
    let doc = parse(md).unwrap();

    assert_eq!(doc.sections.len(), 1);
    assert_eq!(
        doc.sections[0].links,
        vec![link("https://b.example", "B", None)]
    );
}

#[test]
fn badge_alt_text_is_link_title() {
    let md = "## S\n\n- [![logo](https://img.example/x.svg)](https://x.example) - With badge\n";
    let doc = parse(md).unwrap();

    assert_eq!(
        doc.sections[0].links,
        vec![link("https://x.example", "logo", Some("With badge"))]
    );
}

/// A heading with no text degrades to an untitled section.
#[test]
fn empty_heading_leaves_title_unset() {
    let doc = parse("##\n\n- [A](https://a.example)\n").unwrap();

    assert_eq!(doc.sections.len(), 1);
    assert_eq!(doc.sections[0].title, None);
    assert_eq!(doc.sections[0].links.len(), 1);
}

#[test]
fn deeper_headings_open_no_section() {
    let doc = parse("## S\n\n#### Notes\n\n- [A](https://a.example)\n").unwrap();

    assert_eq!(doc.sections[0].title.as_deref(), Some("S"));
    assert!(doc.sections[0].subsections.is_empty());
    assert_eq!(doc.sections[0].links.len(), 1);
}

// Invariant tests

/// Parsing the same input twice yields equal documents.
#[test]
fn parsing_is_idempotent() {
    let md = std::fs::read_to_string(format!(
        "{}/src/parsing/tests/fixtures/catalog.md",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap();

    assert_eq!(parse(&md).unwrap(), parse(&md).unwrap());
}

#[test]
fn empty_document() {
    let doc = parse("").unwrap();
    assert!(doc.sections.is_empty());
    assert_eq!(doc.source, "");
}

#[test]
fn balanced_tokens_parse() {
    let tokens = vec![
        Token::open(Tag::H2),
        Token::inline(vec![Token::text("Title")]),
        Token::close(Tag::H2),
        Token::open(Tag::Paragraph),
        Token::inline(vec![
            Token::link_open("https://a.example"),
            Token::text("A"),
            Token::close(Tag::Link),
        ]),
        Token::close(Tag::Paragraph),
    ];

    let doc = parse_tokens("## Title", &tokens).unwrap();
    assert_eq!(doc.source, "## Title");
    assert_eq!(
        doc.sections[0].links,
        vec![link("https://a.example", "A", None)]
    );
}

/// A link token without `href` opens no link, and its text is dropped.
#[test]
fn link_without_href_is_ignored() {
    let tokens = vec![
        Token::open(Tag::H2),
        Token::inline(vec![Token::text("Title")]),
        Token::close(Tag::H2),
        Token::open(Tag::Paragraph),
        Token::inline(vec![
            Token::Open {
                tag: Tag::Link,
                attrs: Attrs::new().with("title", "t"),
            },
            Token::text("Nowhere"),
            Token::close(Tag::Link),
            Token::link_open("https://a.example"),
            Token::text("A"),
            Token::close(Tag::Link),
        ]),
        Token::close(Tag::Paragraph),
    ];

    let doc = parse_tokens("", &tokens).unwrap();
    assert_eq!(titles(&doc.sections), vec!["Title"]);
    assert_eq!(
        doc.sections[0].links,
        vec![link("https://a.example", "A", None)]
    );
}

#[test]
fn close_without_open_fails() {
    let tokens = vec![Token::close(Tag::Paragraph)];
    let err = parse_tokens("", &tokens).unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedClose { tag } if tag == Tag::Paragraph));
}

#[test]
fn mismatched_close_fails() {
    let tokens = vec![
        Token::open(Tag::Paragraph),
        Token::inline(vec![Token::open(Tag::Emphasis), Token::text("x")]),
        Token::close(Tag::Paragraph),
    ];
    let err = parse_tokens("", &tokens).unwrap_err();
    assert!(matches!(
        err,
        ParseError::MismatchedClose {
            expected: Tag::Emphasis,
            found: Tag::Paragraph,
        }
    ));
    assert_eq!(
        err.to_string(),
        "Mismatched closing tag: expected </em>, found </p>"
    );
}

#[test]
fn unclosed_tags_fail() {
    let tokens = vec![Token::open(Tag::BulletList), Token::open(Tag::ListItem)];
    let err = parse_tokens("", &tokens).unwrap_err();
    assert!(matches!(&err, ParseError::UnclosedTags { open } if open.len() == 2));
    assert_eq!(
        err.to_string(),
        "Unclosed tags at end of document: <ul>, <li>"
    );
}

#[test]
fn nesting_limit_is_enforced() {
    let parser = Parser::new(ParseOptions { max_depth: 3 });
    let err = parser.parse("> > > > deep").unwrap_err();
    assert!(matches!(err, ParseError::NestingTooDeep { limit: 3 }));
}

#[test]
fn nested_lists_fit_default_limit() {
    let md = "## S\n\n- [A](https://a.example) - a\n  - [B](https://b.example) - b\n    - [C](https://c.example) - c\n";
    let doc = parse(md).unwrap();

    let descriptions: Vec<_> = doc.sections[0]
        .links
        .iter()
        .map(|l| l.description.as_deref())
        .collect();
    assert_eq!(descriptions, vec![Some("a"), Some("b"), Some("c")]);
}
