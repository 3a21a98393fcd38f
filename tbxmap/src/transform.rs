//! The term-entry transformer.
//!
//! Every `termEntry` under a `text/body` container is consumed and rebuilt:
//!
//! - `conceptDomain` and `conceptSubdomain` descriptions are appended to the entry;
//! - each language set loses its descriptions and gets a single leading
//!   `conceptDefinition`, sourced from the entry's own `de-DE` or `en-GB`
//!   `Definition` (empty for any other tag);
//! - each term group's usage note is replaced by the `forbidden`,
//!   `caseSensitive` and `preferred` flags.
//!
//! Entries are independent of each other and processed in document order.
//! The transformation is not idempotent: mapped output no longer carries the
//! `Definition` and usage notes it reads, so a second pass empties every
//! `conceptDefinition` and appends another domain pair.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    options::MapOptions,
    types::{
        CONCEPT_DEFINITION, CONCEPT_DOMAIN, CONCEPT_SUBDOMAIN, Description, Document, ENGLISH,
        EntryChild, GERMAN, LangSet, LangSetChild, TERM_ENTRY, TermEntry, TermGroup,
        TermGroupChild, UsageCategory,
    },
    xml::Node,
};

/// Receives completion percentages (0–100) while a document is mapped.
pub trait ProgressSink {
    fn report(&mut self, percent: u8);
}

impl<F: FnMut(u8)> ProgressSink for F {
    fn report(&mut self, percent: u8) {
        self(percent)
    }
}

/// A progress sink that ignores every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _percent: u8) {}
}

/// Counters describing what a mapping run touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MappingSummary {
    pub term_entries: usize,
    pub lang_sets: usize,
    pub term_groups: usize,
    /// Term groups whose usage value mapped to a flag triple.
    pub usage_mapped: usize,
    /// Term groups whose usage value was not a known category.
    pub usage_unrecognized: usize,
    /// Term groups without any usage note.
    pub usage_missing: usize,
}

/// Integer completion percentage; an empty run is complete.
pub fn percent_complete(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    (done.min(total) * 100 / total) as u8
}

/// Rewrites term entries according to [`MapOptions`].
#[derive(Debug, Clone, Default)]
pub struct Transformer {
    options: MapOptions,
}

impl Transformer {
    pub fn new(options: MapOptions) -> Self {
        Transformer { options }
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    /// Maps every term entry of `document` in place.
    ///
    /// `progress` is called after each entry, and exactly once with `100` for a
    /// document without entries.
    pub fn apply<P: ProgressSink + ?Sized>(
        &self,
        document: &mut Document,
        progress: &mut P,
    ) -> MappingSummary {
        let mut summary = MappingSummary::default();

        let total = document.term_entry_count();
        if total == 0 {
            if document.bodies().next().is_none() {
                debug!("document has no text/body container");
            }
            progress.report(100);
            return summary;
        }

        let mut done = 0;
        for body in document.bodies_mut() {
            let children = std::mem::take(&mut body.children);
            let mut rebuilt = Vec::with_capacity(children.len());
            for node in children {
                match node {
                    Node::Element(element) if element.name == TERM_ENTRY => {
                        let entry = self.map_entry(TermEntry::from(element), &mut summary);
                        rebuilt.push(Node::Element(entry.into_element()));
                        done += 1;
                        progress.report(percent_complete(done, total));
                    }
                    other => rebuilt.push(other),
                }
            }
            body.children = rebuilt;
        }

        info!(
            term_entries = summary.term_entries,
            term_groups = summary.term_groups,
            usage_mapped = summary.usage_mapped,
            usage_unrecognized = summary.usage_unrecognized,
            "mapped term base"
        );
        summary
    }

    /// Builds the mapped version of a single term entry.
    pub fn map_entry(&self, entry: TermEntry, summary: &mut MappingSummary) -> TermEntry {
        let german = entry.definition(GERMAN).unwrap_or_default();
        let english = entry.definition(ENGLISH).unwrap_or_default();
        debug!(
            entry = entry.id().unwrap_or_default(),
            has_german_definition = !german.is_empty(),
            has_english_definition = !english.is_empty(),
            "mapping term entry"
        );

        let mut children: Vec<EntryChild> = entry
            .children
            .into_iter()
            .map(|child| match child {
                EntryChild::LangSet(lang_set) => {
                    let definition = match lang_set.lang() {
                        Some(GERMAN) => german.as_str(),
                        Some(ENGLISH) => english.as_str(),
                        _ => "",
                    };
                    EntryChild::LangSet(map_lang_set(lang_set, definition, summary))
                }
                other => other,
            })
            .collect();
        children.push(EntryChild::Description(Description::new(
            CONCEPT_DOMAIN,
            self.options.concept_domain.as_str(),
        )));
        children.push(EntryChild::Description(Description::new(
            CONCEPT_SUBDOMAIN,
            self.options.concept_subdomain.as_str(),
        )));

        summary.term_entries += 1;
        TermEntry {
            attributes: entry.attributes,
            children,
        }
    }
}

fn map_lang_set(lang_set: LangSet, definition: &str, summary: &mut MappingSummary) -> LangSet {
    let mut children = vec![LangSetChild::Description(Description::new(
        CONCEPT_DEFINITION,
        definition,
    ))];
    for child in lang_set.children {
        match child {
            LangSetChild::Description(_) => {}
            LangSetChild::TermGroup(group) => {
                children.push(LangSetChild::TermGroup(map_term_group(group, summary)))
            }
            other => children.push(other),
        }
    }

    summary.lang_sets += 1;
    LangSet {
        attributes: lang_set.attributes,
        children,
    }
}

fn map_term_group(group: TermGroup, summary: &mut MappingSummary) -> TermGroup {
    let usage = group.usage_value();
    let mut group = group.without_usage_notes();

    match usage.as_deref().map(|value| (value, UsageCategory::from_value(value))) {
        Some((_, Some(category))) => {
            group.children.extend(
                category
                    .flags()
                    .to_term_notes()
                    .into_iter()
                    .map(TermGroupChild::TermNote),
            );
            summary.usage_mapped += 1;
        }
        Some((value, None)) => {
            warn!(term = %group.term().unwrap_or_default(), value, "unrecognized usage value");
            summary.usage_unrecognized += 1;
        }
        None => summary.usage_missing += 1,
    }

    summary.term_groups += 1;
    group
}
