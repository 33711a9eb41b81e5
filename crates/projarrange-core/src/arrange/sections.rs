//! Option sections.
//!
//! A pair of marker comments scopes a run of siblings to its own options:
//!
//! ```xml
//! <!-- Options: SortRootElements, KeepCommentWithNext -->
//! ...
//! <!-- /Options -->
//! ```
//!
//! Siblings outside any marker pair form implicit sections that use the
//! global options. Marker comments themselves never take part in sorting.
//!
//! Marker grammar, matched against the whole comment text:
//!
//! ```text
//! open  = \s* "Options:" \s* flag ( \s* "," \s* flag )* \s*
//! close = \s* "/Options" \s*
//! flag  = CombineRootElements | KeepCommentWithNext | KeepImportWithNext
//!       | SortRootElements | SplitItemGroups | None | All | NoRoot
//! ```
//!
//! Whitespace is allowed on both sides of each comma, so
//! `Options: SortRootElements , SplitItemGroups` opens a section. Flag names
//! are case-sensitive. A comment that does not match is ordinary content.

use indextree::NodeId;
use log::debug;

use super::options::ArrangeOptions;
use crate::xml::XmlDocument;

const OPEN_MARKER: &str = "Options:";
const CLOSE_MARKER: &str = "/Options";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    /// Opening marker comment, `None` for implicit sections.
    pub open: Option<NodeId>,
    /// Closing marker comment, `None` when missing or implicit.
    pub close: Option<NodeId>,
    /// Options parsed from the opening marker.
    pub options: Option<ArrangeOptions>,
    /// Sortable content between the markers.
    pub nodes: Vec<NodeId>,
}

impl Section {
    fn explicit(open: NodeId, options: ArrangeOptions) -> Self {
        Self {
            open: Some(open),
            options: Some(options),
            ..Self::default()
        }
    }

    /// True when the section carries its own options.
    pub fn is_option_section(&self) -> bool {
        self.options.is_some()
    }

    pub fn resolve_options(&self, global: ArrangeOptions) -> ArrangeOptions {
        self.options.unwrap_or(global)
    }
}

/// Parses the text of an opening marker comment:
/// `\s*Options:\s*Flag(\s*,\s*Flag)*\s*`. Unknown flag names make the whole
/// comment an ordinary comment.
pub fn parse_open_marker(text: &str) -> Option<ArrangeOptions> {
    let list = text.trim_start().strip_prefix(OPEN_MARKER)?.trim();
    if list.is_empty() {
        return None;
    }
    ArrangeOptions::parse_list(list)
}

/// Matches `\s*/Options\s*`.
pub fn is_close_marker(text: &str) -> bool {
    text.trim() == CLOSE_MARKER
}

/// Splits `nodes` into sections, in document order.
pub fn fold_sections(doc: &XmlDocument, nodes: &[NodeId]) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current = Section::default();

    for &node in nodes {
        let comment = doc.get(node).and_then(|data| data.comment_text());
        let Some(text) = comment else {
            current.nodes.push(node);
            continue;
        };

        if current.is_option_section() && is_close_marker(text) {
            current.close = Some(node);
            sections.push(std::mem::take(&mut current));
        } else if let Some(options) = parse_open_marker(text) {
            if current.is_option_section() {
                debug!("options section opened before the previous one was closed");
            }
            if current.is_option_section() || !current.nodes.is_empty() {
                sections.push(std::mem::take(&mut current));
            }
            debug!("options section: {}", options);
            current = Section::explicit(node, options);
        } else {
            current.nodes.push(node);
        }
    }

    if current.is_option_section() {
        debug!("options section not closed before end of input");
    }
    if current.is_option_section() || !current.nodes.is_empty() {
        sections.push(current);
    }

    sections
}

/// Puts sections without options first and coalesces them into one
/// implicit section, so unsectioned siblings are arranged as a single run
/// no matter where the markers sat. Option sections keep their relative
/// order after it.
pub fn order_sections(sections: Vec<Section>) -> Vec<Section> {
    let (option_sections, implicit): (Vec<_>, Vec<_>) =
        sections.into_iter().partition(Section::is_option_section);

    let mut ordered = Vec::with_capacity(option_sections.len() + 1);
    if !implicit.is_empty() {
        ordered.push(Section {
            nodes: implicit.into_iter().flat_map(|section| section.nodes).collect(),
            ..Section::default()
        });
    }
    ordered.extend(option_sections);
    ordered
}

/// Emits each section as open marker, content, close marker, after
/// ordering the sections with [`order_sections`].
pub fn unfold_sections(sections: Vec<Section>) -> Vec<NodeId> {
    order_sections(sections)
        .into_iter()
        .flat_map(|section| {
            section
                .open
                .into_iter()
                .chain(section.nodes)
                .chain(section.close)
        })
        .collect()
}
