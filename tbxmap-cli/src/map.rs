use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tbxmap::{
    Error, MapOptions, MappingSummary, StatusSink, default_output_path, map_file,
    output_path_with_name,
};

use crate::validation::{validate_file_path, validate_output_path};

#[derive(Debug, Clone, Default)]
pub struct MapArgs {
    pub input: String,
    pub output: Option<String>,
    pub name: Option<String>,
    pub domain: Option<String>,
    pub subdomain: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

impl MapArgs {
    /// Builds library options, keeping the defaults for anything not given.
    pub fn map_options(&self) -> MapOptions {
        let mut options = MapOptions::new();
        if let Some(domain) = &self.domain {
            options = options.with_concept_domain(domain.as_str());
        }
        if let Some(subdomain) = &self.subdomain {
            options = options.with_concept_subdomain(subdomain.as_str());
        }
        options
    }
}

/// Explicit output path > bare output name > `<stem>_mapped.tbx`.
pub fn resolve_output_path(input: &str, output: Option<&str>, name: Option<&str>) -> PathBuf {
    match (output, name) {
        (Some(output), _) => PathBuf::from(output),
        (None, Some(name)) => output_path_with_name(input, name),
        (None, None) => default_output_path(input),
    }
}

#[derive(Serialize)]
struct MapReport<'a> {
    input: &'a str,
    output: String,
    summary: MappingSummary,
}

struct ConsoleStatus<'a> {
    progress_bar: &'a ProgressBar,
    quiet: bool,
}

impl StatusSink for ConsoleStatus<'_> {
    fn succeeded(&mut self, output: &Path) {
        self.progress_bar.finish_and_clear();
        if !self.quiet {
            println!("✅ Mapping complete: {}", output.display());
        }
    }

    fn failed(&mut self, error: &Error) {
        self.progress_bar.abandon();
        eprintln!("❌ Error: {}", error);
    }
}

/// Run the map command: rewrite one TBX export next to the original.
pub fn run_map_command(args: MapArgs) {
    if let Err(e) = validate_file_path(&args.input) {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }

    let output = resolve_output_path(&args.input, args.output.as_deref(), args.name.as_deref());
    if let Err(e) = validate_output_path(Path::new(&args.input), &output) {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }

    let progress_bar = if args.quiet || args.json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(100)
    };
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40.yellow/white}] {pos:>3}%")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    progress_bar.set_message("Mapping");

    let mut progress = |percent: u8| progress_bar.set_position(u64::from(percent));
    let mut status = ConsoleStatus {
        progress_bar: &progress_bar,
        quiet: args.quiet || args.json,
    };

    let summary = match map_file(
        &args.input,
        &output,
        &args.map_options(),
        &mut progress,
        &mut status,
    ) {
        Ok(summary) => summary,
        Err(_) => std::process::exit(1),
    };

    if args.json {
        let report = MapReport {
            input: &args.input,
            output: output.display().to_string(),
            summary,
        };
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing to JSON: {}", e);
                std::process::exit(1);
            }
        }
    } else if !args.quiet {
        println!(
            "   {} term entries, {} term groups ({} usage values mapped, {} unrecognized)",
            summary.term_entries,
            summary.term_groups,
            summary.usage_mapped,
            summary.usage_unrecognized
        );
    }
}
