use std::fs;
use std::path::{Path, PathBuf};

use tbxmap::traits::Parser;
use tbxmap::types::{CONCEPT_DEFINITION, CONCEPT_DOMAIN, CONCEPT_SUBDOMAIN};
use tbxmap::{
    Document, Error, LangSet, MapOptions, NoProgress, NoStatus, TermEntry, TermGroup,
    default_output_path, map_file, serialize, transform,
};
use tempfile::TempDir;

fn data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("data")
}

/// Copies a fixture into a temp dir so the output lands beside it.
fn stage(temp_dir: &TempDir, fixture: &str) -> PathBuf {
    let target = temp_dir.path().join(fixture);
    fs::copy(data_dir().join(fixture), &target).unwrap();
    target
}

fn entry<'a>(entries: &'a [TermEntry], id: &str) -> &'a TermEntry {
    entries
        .iter()
        .find(|e| e.id() == Some(id))
        .unwrap_or_else(|| panic!("missing entry {id}"))
}

fn lang_set<'a>(entry: &'a TermEntry, lang: &str) -> &'a LangSet {
    entry
        .lang_sets()
        .find(|l| l.lang() == Some(lang))
        .unwrap_or_else(|| panic!("missing langSet {lang}"))
}

fn group<'a>(lang_set: &'a LangSet, term: &str) -> &'a TermGroup {
    lang_set
        .term_groups()
        .find(|g| g.term().as_deref() == Some(term))
        .unwrap_or_else(|| panic!("missing term {term}"))
}

fn notes(group: &TermGroup) -> Vec<(String, String)> {
    group
        .term_notes()
        .map(|n| (n.kind().unwrap_or_default().to_string(), n.text()))
        .collect()
}

fn flag_notes(group: &TermGroup) -> Vec<(String, String)> {
    notes(group)
        .into_iter()
        .filter(|(kind, _)| ["forbidden", "caseSensitive", "preferred"].contains(&kind.as_str()))
        .collect()
}

fn triple(forbidden: bool, case_sensitive: bool, preferred: bool) -> Vec<(String, String)> {
    vec![
        ("forbidden".to_string(), forbidden.to_string()),
        ("caseSensitive".to_string(), case_sensitive.to_string()),
        ("preferred".to_string(), preferred.to_string()),
    ]
}

fn mapped_corpus() -> Vec<TermEntry> {
    let (document, _) = transform(
        data_dir().join("congree_export.tbx"),
        &MapOptions::new(),
        &mut NoProgress,
    )
    .unwrap();
    document.term_entries()
}

#[test]
fn test_reference_scenario_definitions_and_usage() {
    let entries = mapped_corpus();
    let c1 = entry(&entries, "C1001");

    let de = lang_set(c1, "de-DE");
    let de_descriptions: Vec<(Option<&str>, String)> =
        de.descriptions().map(|d| (d.kind(), d.text())).collect();
    assert_eq!(
        de_descriptions,
        vec![(Some(CONCEPT_DEFINITION), "Reinigungsmittel".to_string())]
    );
    assert_eq!(
        notes(group(de, "Reiniger")),
        [
            vec![("partOfSpeech".to_string(), "noun".to_string())],
            triple(false, false, true)
        ]
        .concat()
    );

    let en = lang_set(c1, "en-GB");
    assert_eq!(en.descriptions().count(), 1);
    assert_eq!(en.descriptions().next().unwrap().text(), "cleaning agent");
    assert_eq!(flag_notes(group(en, "detergent")), triple(false, false, true));
}

#[test]
fn test_entry_level_descriptions_end_with_domain_pair() {
    for entry in mapped_corpus() {
        let descriptions: Vec<(Option<String>, String)> = entry
            .descriptions()
            .map(|d| (d.kind().map(str::to_string), d.text()))
            .collect();
        let tail = &descriptions[descriptions.len() - 2..];
        assert_eq!(
            tail,
            &[
                (Some(CONCEPT_DOMAIN.to_string()), "Kärcher".to_string()),
                (Some(CONCEPT_SUBDOMAIN.to_string()), "General".to_string()),
            ]
        );
    }
    let entries = mapped_corpus();
    assert_eq!(entry(&entries, "C1001").descriptions().count(), 3);
}

#[test]
fn test_priority_and_unrecognized_usage_values() {
    let entries = mapped_corpus();
    let c2 = entry(&entries, "C1002");

    let de = lang_set(c2, "de-DE");
    // "Usage" wins over "Usage Marketing" even though it comes second.
    assert_eq!(notes(group(de, "Hochdruckreiniger")), triple(true, false, false));
    assert_eq!(notes(group(de, "HD-Reiniger")), triple(false, true, false));
    assert_eq!(de.descriptions().next().unwrap().text(), "");

    let en = lang_set(c2, "en-GB");
    assert!(notes(group(en, "pressure washer")).is_empty());
}

#[test]
fn test_other_languages_get_empty_definition() {
    let entries = mapped_corpus();
    let fr = lang_set(entry(&entries, "C1003"), "fr-FR");
    let descriptions: Vec<String> = fr.descriptions().map(|d| d.text()).collect();
    assert_eq!(descriptions, vec![String::new()]);
    assert_eq!(
        notes(group(fr, "nettoyeur haute pression")),
        triple(false, false, true)
    );
}

#[test]
fn test_header_and_doctype_are_preserved() {
    let temp_dir = TempDir::new().unwrap();
    let input = stage(&temp_dir, "congree_export.tbx");
    let output = default_output_path(&input);

    map_file(&input, &output, &MapOptions::new(), &mut NoProgress, &mut NoStatus).unwrap();

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(written.contains("<!DOCTYPE martif SYSTEM \"TBXcoreStructV02.dtd\">"));
    assert!(written.contains("<p>Congree Terminology Export</p>"));
    assert!(written.contains("\n    <martifHeader>\n"));
    assert!(!written.contains("type=\"Usage\""));
    assert!(!written.contains("type=\"Definition\""));
    assert_eq!(output.file_name().unwrap(), "congree_export_mapped.tbx");
}

#[test]
fn test_written_output_reparses_to_same_document() {
    let temp_dir = TempDir::new().unwrap();
    let input = stage(&temp_dir, "congree_export.tbx");
    let output = temp_dir.path().join("phrase.tbx");

    let (document, summary) = transform(&input, &MapOptions::new(), &mut NoProgress).unwrap();
    serialize(&document, &output).unwrap();

    let reread = Document::read_from(&output).unwrap();
    assert_eq!(reread, document);
    assert_eq!(summary.term_entries, 3);
    assert_eq!(summary.lang_sets, 5);
    assert_eq!(summary.term_groups, 6);
    assert_eq!(summary.usage_mapped, 5);
    assert_eq!(summary.usage_unrecognized, 1);
    assert_eq!(summary.usage_missing, 0);
}

#[test]
fn test_empty_body_reports_complete_immediately() {
    let temp_dir = TempDir::new().unwrap();
    let input = stage(&temp_dir, "empty_body.tbx");
    let output = default_output_path(&input);

    let mut reports = Vec::new();
    let mut progress = |p: u8| reports.push(p);
    let summary = map_file(&input, &output, &MapOptions::new(), &mut progress, &mut NoStatus).unwrap();

    assert_eq!(reports, vec![100]);
    assert_eq!(summary.term_entries, 0);
    let reread = Document::read_from(&output).unwrap();
    assert_eq!(reread.term_entry_count(), 0);
}

#[test]
fn test_progress_ends_at_100() {
    let mut reports = Vec::new();
    let mut progress = |p: u8| reports.push(p);
    transform(
        data_dir().join("congree_export.tbx"),
        &MapOptions::new(),
        &mut progress,
    )
    .unwrap();
    assert_eq!(reports, vec![33, 66, 100]);
}

#[test]
fn test_utf16_export_is_decoded() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("utf16.tbx");
    let xml = "<martif><text><body><termEntry><langSet xml:lang=\"de-DE\">\
               <descrip type=\"Definition\">Bürste</descrip></langSet></termEntry>\
               </body></text></martif>";
    let mut bytes = vec![0xFF, 0xFE];
    for unit in xml.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    fs::write(&input, bytes).unwrap();

    let (document, _) = transform(&input, &MapOptions::new(), &mut NoProgress).unwrap();
    let entries = document.term_entries();
    let de = lang_set(&entries[0], "de-DE");
    assert_eq!(de.descriptions().next().unwrap().text(), "Bürste");
}

#[test]
fn test_latin1_export_uses_declared_encoding() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("latin1.tbx");
    let mut bytes = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n\
<martif><text><body><termEntry id=\"L1\"><langSet xml:lang=\"de-DE\">\
<descrip type=\"Definition\">B"
        .to_vec();
    bytes.push(0xFC);
    bytes.extend_from_slice(
        b"rste</descrip></langSet></termEntry></body></text></martif>\n",
    );
    fs::write(&input, bytes).unwrap();

    let output = default_output_path(&input);
    map_file(&input, &output, &MapOptions::new(), &mut NoProgress, &mut NoStatus).unwrap();

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(written.contains("<descrip type=\"conceptDefinition\">Bürste</descrip>"));
}

#[test]
fn test_padded_definition_is_copied_verbatim() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("padded.tbx");
    fs::write(
        &input,
        "<martif><text><body><termEntry><langSet xml:lang=\"en-GB\">\
         <descrip type=\"Definition\">  cleaning agent  </descrip>\
         <tig><term>Hoch druck <hi type=\"b\">reiniger</hi> neu</term></tig>\
         </langSet></termEntry></body></text></martif>",
    )
    .unwrap();
    let output = default_output_path(&input);
    map_file(&input, &output, &MapOptions::new(), &mut NoProgress, &mut NoStatus).unwrap();

    let mapped = Document::read_from(&output).unwrap().term_entries();
    let en = lang_set(&mapped[0], "en-GB");
    assert_eq!(en.descriptions().next().unwrap().text(), "  cleaning agent  ");
    let written = fs::read_to_string(&output).unwrap();
    assert!(written.contains("<term>Hoch druck <hi type=\"b\">reiniger</hi> neu</term>"));
}

#[test]
fn test_malformed_input_fails_before_processing() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("broken.tbx");
    fs::write(&input, "<martif><text><body><termEntry id=\"x\">").unwrap();
    let output = default_output_path(&input);

    let mut reports = Vec::new();
    let mut progress = |p: u8| reports.push(p);
    let err = map_file(&input, &output, &MapOptions::new(), &mut progress, &mut NoStatus)
        .unwrap_err();

    assert!(matches!(err, Error::InvalidDocument(_) | Error::XmlParse(_)));
    assert!(reports.is_empty());
    assert!(!output.exists());
}
