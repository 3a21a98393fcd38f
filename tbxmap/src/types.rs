//! Typed view of the TBX elements the mapper rewrites.
//!
//! A [`Document`] owns the whole XML tree. Term entries are lifted out of it
//! into [`TermEntry`] values, rebuilt, and lowered back with `into_element`.
//! Anything the mapper does not care about travels along as an opaque [`Node`].

use std::{
    fmt::{Display, Formatter},
    io::{BufRead, Write},
};

use crate::{
    error::Error,
    traits::Parser,
    xml::{Element, Node, XmlTree},
};

pub const TEXT: &str = "text";
pub const BODY: &str = "body";
pub const TERM_ENTRY: &str = "termEntry";
pub const LANG_SET: &str = "langSet";
pub const TERM_GROUP: &str = "tig";
pub const DESCRIP: &str = "descrip";
pub const TERM_NOTE: &str = "termNote";
pub const TYPE_ATTR: &str = "type";
pub const XML_LANG: &str = "xml:lang";

pub const GERMAN: &str = "de-DE";
pub const ENGLISH: &str = "en-GB";

pub const DEFINITION: &str = "Definition";
pub const CONCEPT_DEFINITION: &str = "conceptDefinition";
pub const CONCEPT_DOMAIN: &str = "conceptDomain";
pub const CONCEPT_SUBDOMAIN: &str = "conceptSubdomain";

/// A complete term base: `martif` → `text` → `body` → `termEntry*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub tree: XmlTree,
}

impl Parser for Document {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        XmlTree::from_reader(reader).map(Document::from)
    }

    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error> {
        self.tree.to_writer(writer)
    }
}

impl From<XmlTree> for Document {
    fn from(tree: XmlTree) -> Self {
        Document { tree }
    }
}

impl Document {
    pub fn root(&self) -> &Element {
        &self.tree.root
    }

    /// Every `text/body` container, in document order.
    pub fn bodies(&self) -> impl Iterator<Item = &Element> {
        self.tree
            .root
            .child_elements()
            .filter(|e| e.name == TEXT)
            .flat_map(|text| text.child_elements().filter(|e| e.name == BODY))
    }

    pub fn bodies_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.tree
            .root
            .child_elements_mut()
            .filter(|e| e.name == TEXT)
            .flat_map(|text| text.child_elements_mut().filter(|e| e.name == BODY))
    }

    /// Raw `termEntry` elements in document order.
    pub fn term_entry_elements(&self) -> impl Iterator<Item = &Element> {
        self.bodies()
            .flat_map(|body| body.child_elements())
            .filter(|e| e.name == TERM_ENTRY)
    }

    pub fn term_entry_count(&self) -> usize {
        self.term_entry_elements().count()
    }

    /// Typed copies of every term entry.
    pub fn term_entries(&self) -> Vec<TermEntry> {
        self.term_entry_elements()
            .cloned()
            .map(TermEntry::from)
            .collect()
    }
}

/// Child of a `termEntry`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryChild {
    Description(Description),
    LangSet(LangSet),
    Other(Node),
}

/// One terminology concept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermEntry {
    pub attributes: Vec<(String, String)>,
    pub children: Vec<EntryChild>,
}

impl From<Element> for TermEntry {
    fn from(element: Element) -> Self {
        let children = element
            .children
            .into_iter()
            .map(|node| match node {
                Node::Element(e) if e.name == DESCRIP => {
                    EntryChild::Description(Description::from(e))
                }
                Node::Element(e) if e.name == LANG_SET => EntryChild::LangSet(LangSet::from(e)),
                other => EntryChild::Other(other),
            })
            .collect();
        TermEntry {
            attributes: element.attributes,
            children,
        }
    }
}

impl TermEntry {
    pub fn id(&self) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == "id")
            .map(|(_, v)| v.as_str())
    }

    pub fn descriptions(&self) -> impl Iterator<Item = &Description> {
        self.children.iter().filter_map(|child| match child {
            EntryChild::Description(d) => Some(d),
            _ => None,
        })
    }

    pub fn lang_sets(&self) -> impl Iterator<Item = &LangSet> {
        self.children.iter().filter_map(|child| match child {
            EntryChild::LangSet(l) => Some(l),
            _ => None,
        })
    }

    /// Text of the first `Definition` description directly under a language set
    /// tagged `lang`, searching the whole entry subtree in document order.
    pub fn definition(&self, lang: &str) -> Option<String> {
        self.children.iter().find_map(|child| match child {
            EntryChild::LangSet(lang_set) => lang_set.definition_in_subtree(lang),
            EntryChild::Description(d) => nested_definition(d.element(), lang),
            EntryChild::Other(Node::Element(e)) => nested_definition(e, lang),
            _ => None,
        })
    }

    pub fn into_element(self) -> Element {
        let mut element = Element::new(TERM_ENTRY);
        element.attributes = self.attributes;
        element.children = self
            .children
            .into_iter()
            .map(|child| match child {
                EntryChild::Description(d) => Node::Element(d.into_element()),
                EntryChild::LangSet(l) => Node::Element(l.into_element()),
                EntryChild::Other(node) => node,
            })
            .collect();
        element
    }
}

/// Definition lookup over `element` and everything below it.
fn nested_definition(element: &Element, lang: &str) -> Option<String> {
    std::iter::once(element)
        .chain(element.descendants())
        .filter(|e| e.name == LANG_SET && e.attribute(XML_LANG) == Some(lang))
        .find_map(|lang_set| {
            lang_set
                .child_elements()
                .find(|e| e.name == DESCRIP && e.attribute(TYPE_ATTR) == Some(DEFINITION))
                .map(Element::leading_text)
        })
}

/// Child of a `langSet`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LangSetChild {
    Description(Description),
    TermGroup(TermGroup),
    Other(Node),
}

/// The language-scoped part of a term entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LangSet {
    pub attributes: Vec<(String, String)>,
    pub children: Vec<LangSetChild>,
}

impl From<Element> for LangSet {
    fn from(element: Element) -> Self {
        let children = element
            .children
            .into_iter()
            .map(|node| match node {
                Node::Element(e) if e.name == DESCRIP => {
                    LangSetChild::Description(Description::from(e))
                }
                Node::Element(e) if e.name == TERM_GROUP => {
                    LangSetChild::TermGroup(TermGroup::from(e))
                }
                other => LangSetChild::Other(other),
            })
            .collect();
        LangSet {
            attributes: element.attributes,
            children,
        }
    }
}

impl LangSet {
    /// The `xml:lang` tag.
    pub fn lang(&self) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == XML_LANG)
            .map(|(_, v)| v.as_str())
    }

    pub fn descriptions(&self) -> impl Iterator<Item = &Description> {
        self.children.iter().filter_map(|child| match child {
            LangSetChild::Description(d) => Some(d),
            _ => None,
        })
    }

    pub fn term_groups(&self) -> impl Iterator<Item = &TermGroup> {
        self.children.iter().filter_map(|child| match child {
            LangSetChild::TermGroup(t) => Some(t),
            _ => None,
        })
    }

    pub fn definition(&self) -> Option<String> {
        self.descriptions()
            .find(|d| d.kind() == Some(DEFINITION))
            .map(Description::text)
    }

    /// This set's own definition when tagged `lang`, else the first one found
    /// in a language set nested below it.
    fn definition_in_subtree(&self, lang: &str) -> Option<String> {
        let own = if self.lang() == Some(lang) {
            self.definition()
        } else {
            None
        };
        own.or_else(|| {
            self.children.iter().find_map(|child| match child {
                LangSetChild::Description(d) => nested_definition(d.element(), lang),
                LangSetChild::TermGroup(group) => group.children.iter().find_map(|c| match c {
                    TermGroupChild::TermNote(note) => nested_definition(&note.0, lang),
                    TermGroupChild::Other(Node::Element(e)) => nested_definition(e, lang),
                    TermGroupChild::Other(_) => None,
                }),
                LangSetChild::Other(Node::Element(e)) => nested_definition(e, lang),
                LangSetChild::Other(_) => None,
            })
        })
    }

    pub fn into_element(self) -> Element {
        let mut element = Element::new(LANG_SET);
        element.attributes = self.attributes;
        element.children = self
            .children
            .into_iter()
            .map(|child| match child {
                LangSetChild::Description(d) => Node::Element(d.into_element()),
                LangSetChild::TermGroup(t) => Node::Element(t.into_element()),
                LangSetChild::Other(node) => node,
            })
            .collect();
        element
    }
}

/// Child of a `tig`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermGroupChild {
    TermNote(TermNote),
    Other(Node),
}

/// One surface term (`tig`) within a language set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermGroup {
    pub attributes: Vec<(String, String)>,
    pub children: Vec<TermGroupChild>,
}

impl From<Element> for TermGroup {
    fn from(element: Element) -> Self {
        let children = element
            .children
            .into_iter()
            .map(|node| match node {
                Node::Element(e) if e.name == TERM_NOTE => TermGroupChild::TermNote(TermNote::from(e)),
                other => TermGroupChild::Other(other),
            })
            .collect();
        TermGroup {
            attributes: element.attributes,
            children,
        }
    }
}

impl TermGroup {
    /// The `term` text, if present.
    pub fn term(&self) -> Option<String> {
        self.children.iter().find_map(|child| match child {
            TermGroupChild::Other(Node::Element(e)) if e.name == "term" => Some(e.leading_text()),
            _ => None,
        })
    }

    pub fn term_notes(&self) -> impl Iterator<Item = &TermNote> {
        self.children.iter().filter_map(|child| match child {
            TermGroupChild::TermNote(n) => Some(n),
            _ => None,
        })
    }

    /// Value of the highest-priority usage note, if any.
    pub fn usage_value(&self) -> Option<String> {
        UsageNoteKind::PRIORITY.iter().find_map(|kind| {
            self.term_notes()
                .find(|note| note.kind() == Some(kind.as_str()))
                .map(TermNote::text)
        })
    }

    /// Drops every usage note of any source variant.
    pub fn without_usage_notes(mut self) -> Self {
        self.children.retain(|child| match child {
            TermGroupChild::TermNote(note) => note.usage_kind().is_none(),
            _ => true,
        });
        self
    }

    pub fn into_element(self) -> Element {
        let mut element = Element::new(TERM_GROUP);
        element.attributes = self.attributes;
        element.children = self
            .children
            .into_iter()
            .map(|child| match child {
                TermGroupChild::TermNote(n) => Node::Element(n.into_element()),
                TermGroupChild::Other(node) => node,
            })
            .collect();
        element
    }
}

/// A typed freeform annotation (`descrip`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description(Element);

impl From<Element> for Description {
    fn from(element: Element) -> Self {
        Description(element)
    }
}

impl Description {
    pub fn new(kind: &str, text: impl Into<String>) -> Self {
        Description(
            Element::new(DESCRIP)
                .with_attribute(TYPE_ATTR, kind)
                .with_text(text),
        )
    }

    pub fn kind(&self) -> Option<&str> {
        self.0.attribute(TYPE_ATTR)
    }

    pub fn text(&self) -> String {
        self.0.leading_text()
    }

    pub fn element(&self) -> &Element {
        &self.0
    }

    pub fn into_element(self) -> Element {
        self.0
    }
}

/// A typed annotation on a term group (`termNote`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermNote(Element);

impl From<Element> for TermNote {
    fn from(element: Element) -> Self {
        TermNote(element)
    }
}

impl TermNote {
    pub fn new(kind: &str, text: impl Into<String>) -> Self {
        TermNote(
            Element::new(TERM_NOTE)
                .with_attribute(TYPE_ATTR, kind)
                .with_text(text),
        )
    }

    pub fn kind(&self) -> Option<&str> {
        self.0.attribute(TYPE_ATTR)
    }

    /// The source usage variant this note belongs to, if it is one.
    pub fn usage_kind(&self) -> Option<UsageNoteKind> {
        self.kind().and_then(UsageNoteKind::from_note_type)
    }

    pub fn text(&self) -> String {
        self.0.leading_text()
    }

    pub fn into_element(self) -> Element {
        self.0
    }
}

/// The `termNote` types that carry a usage status in source exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UsageNoteKind {
    Usage,
    UsageTechDok,
    UsageMarketing,
}

impl UsageNoteKind {
    /// Lookup order when a term group carries more than one variant.
    pub const PRIORITY: [UsageNoteKind; 3] = [
        UsageNoteKind::Usage,
        UsageNoteKind::UsageTechDok,
        UsageNoteKind::UsageMarketing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UsageNoteKind::Usage => "Usage",
            UsageNoteKind::UsageTechDok => "Usage TechDok",
            UsageNoteKind::UsageMarketing => "Usage Marketing",
        }
    }

    pub fn from_note_type(note_type: &str) -> Option<Self> {
        Self::PRIORITY
            .into_iter()
            .find(|kind| kind.as_str() == note_type)
    }
}

impl Display for UsageNoteKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recognized usage statuses. Matching is case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UsageCategory {
    Preferred,
    Deprecated,
    Admitted,
}

impl UsageCategory {
    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "Preferred" => Some(UsageCategory::Preferred),
            "Deprecated" => Some(UsageCategory::Deprecated),
            "Admitted" => Some(UsageCategory::Admitted),
            _ => None,
        }
    }

    pub fn flags(self) -> UsageFlags {
        match self {
            UsageCategory::Preferred => UsageFlags {
                forbidden: false,
                case_sensitive: false,
                preferred: true,
            },
            UsageCategory::Deprecated => UsageFlags {
                forbidden: true,
                case_sensitive: false,
                preferred: false,
            },
            UsageCategory::Admitted => UsageFlags {
                forbidden: false,
                case_sensitive: true,
                preferred: false,
            },
        }
    }
}

/// Boolean usage flags understood by the import side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageFlags {
    pub forbidden: bool,
    pub case_sensitive: bool,
    pub preferred: bool,
}

impl UsageFlags {
    /// `(note type, value)` pairs in output order.
    pub fn pairs(&self) -> [(&'static str, bool); 3] {
        [
            ("forbidden", self.forbidden),
            ("caseSensitive", self.case_sensitive),
            ("preferred", self.preferred),
        ]
    }

    pub fn to_term_notes(self) -> [TermNote; 3] {
        self.pairs()
            .map(|(kind, value)| TermNote::new(kind, if value { "true" } else { "false" }))
    }
}
