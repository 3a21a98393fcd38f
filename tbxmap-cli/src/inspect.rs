use std::collections::BTreeMap;

use serde::Serialize;
use tbxmap::{Document, traits::Parser};

const NONE_KEY: &str = "(none)";

/// Read-only overview of a term base.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Inspection {
    pub term_entries: usize,
    /// Language sets per `xml:lang` tag.
    pub lang_sets: BTreeMap<String, usize>,
    /// Language sets carrying a `Definition`, per tag.
    pub definitions: BTreeMap<String, usize>,
    pub term_groups: usize,
    /// Retained usage value per term group, after priority selection.
    pub usage_values: BTreeMap<String, usize>,
}

pub fn inspect_document(document: &Document) -> Inspection {
    let mut inspection = Inspection::default();

    for entry in document.term_entries() {
        inspection.term_entries += 1;
        for lang_set in entry.lang_sets() {
            let lang = lang_set.lang().unwrap_or(NONE_KEY).to_string();
            if lang_set.definition().is_some() {
                *inspection.definitions.entry(lang.clone()).or_insert(0) += 1;
            }
            *inspection.lang_sets.entry(lang).or_insert(0) += 1;

            for group in lang_set.term_groups() {
                inspection.term_groups += 1;
                let usage = group.usage_value().unwrap_or_else(|| NONE_KEY.to_string());
                *inspection.usage_values.entry(usage).or_insert(0) += 1;
            }
        }
    }

    inspection
}

/// Run the inspect command: print counts without modifying anything.
pub fn run_inspect_command(input: String, json_output: bool) {
    let document = match Document::read_from(&input) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("❌ Error reading {}: {}", input, e);
            std::process::exit(1);
        }
    };
    let inspection = inspect_document(&document);

    if json_output {
        match serde_json::to_string_pretty(&inspection) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing to JSON: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    println!("=== Term base ===");
    println!("Term entries: {}", inspection.term_entries);
    println!("Term groups: {}", inspection.term_groups);
    println!("\nLanguage sets:");
    for (lang, count) in &inspection.lang_sets {
        let definitions = inspection.definitions.get(lang).copied().unwrap_or(0);
        println!("  {}: {} ({} with definition)", lang, count, definitions);
    }
    println!("\nUsage values:");
    for (usage, count) in &inspection.usage_values {
        println!("  {}: {}", usage, count);
    }
}
