//! File-level pipeline: read a TBX export, map it, write the result.
//!
//! A run has exactly one outcome. Input failures are reported before any
//! output file is created; output failures surface as [`Error::Output`].

use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::{
    error::Error,
    options::MapOptions,
    traits::Parser,
    transform::{MappingSummary, ProgressSink, Transformer},
    types::Document,
};

/// Suffix appended to the input stem for the default output name.
pub const MAPPED_SUFFIX: &str = "_mapped";
pub const TBX_EXTENSION: &str = "tbx";

/// Receives the terminal outcome of [`map_file`].
pub trait StatusSink {
    fn succeeded(&mut self, output: &Path);
    fn failed(&mut self, error: &Error);
}

/// A status sink that ignores the outcome.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStatus;

impl StatusSink for NoStatus {
    fn succeeded(&mut self, _output: &Path) {}
    fn failed(&mut self, _error: &Error) {}
}

/// Reads `input` and maps every term entry.
///
/// Parsing completes before the first entry is touched, so a malformed file
/// never yields a partially mapped document.
pub fn transform<P: AsRef<Path>, S: ProgressSink + ?Sized>(
    input: P,
    options: &MapOptions,
    progress: &mut S,
) -> Result<(Document, MappingSummary), Error> {
    let input = input.as_ref();
    debug!(input = %input.display(), "reading term base");
    let mut document = Document::read_from(input)?;
    let summary = Transformer::new(options.clone()).apply(&mut document, progress);
    Ok((document, summary))
}

/// Writes `document` to `output` with four-space indentation.
pub fn serialize<P: AsRef<Path>>(document: &Document, output: P) -> Result<(), Error> {
    let output = output.as_ref();
    debug!(output = %output.display(), "writing term base");
    document.write_to(output)
}

/// Maps `input` into `output`, notifying `status` exactly once.
pub fn map_file<I, O, P, S>(
    input: I,
    output: O,
    options: &MapOptions,
    progress: &mut P,
    status: &mut S,
) -> Result<MappingSummary, Error>
where
    I: AsRef<Path>,
    O: AsRef<Path>,
    P: ProgressSink + ?Sized,
    S: StatusSink + ?Sized,
{
    let output = output.as_ref();
    let result = transform(input.as_ref(), options, progress)
        .and_then(|(document, summary)| serialize(&document, output).map(|()| summary));

    match &result {
        Ok(summary) => {
            info!(
                input = %input.as_ref().display(),
                output = %output.display(),
                term_entries = summary.term_entries,
                "mapping complete"
            );
            status.succeeded(output);
        }
        Err(e) => {
            error!(input = %input.as_ref().display(), error = %e, "mapping failed");
            status.failed(e);
        }
    }
    result
}

/// `<stem>_mapped.tbx` in the input's directory.
pub fn default_output_path<P: AsRef<Path>>(input: P) -> PathBuf {
    let input = input.as_ref();
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_path_with_name(input, &format!("{stem}{MAPPED_SUFFIX}"))
}

/// Resolves a bare output name (extension optional) next to `input`.
///
/// A blank name falls back to [`default_output_path`].
pub fn output_path_with_name<P: AsRef<Path>>(input: P, name: &str) -> PathBuf {
    let input = input.as_ref();
    let name = name.trim();
    if name.is_empty() {
        return default_output_path(input);
    }
    let name = name
        .strip_suffix(&format!(".{TBX_EXTENSION}"))
        .unwrap_or(name);
    let folder = input.parent().unwrap_or_else(|| Path::new(""));
    folder.join(format!("{name}.{TBX_EXTENSION}"))
}
