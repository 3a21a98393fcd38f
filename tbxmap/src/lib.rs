#![forbid(unsafe_code)]
//! Maps TBX term bases exported from Congree into the layout the Phrase TMS
//! TBX import expects.
//!
//! The heavy lifting happens in [`Transformer`]: each `termEntry` gets a
//! `conceptDomain`/`conceptSubdomain` pair, each `langSet` gets a single
//! `conceptDefinition`, and the categorical `Usage` notes on every `tig` are
//! turned into `forbidden`/`caseSensitive`/`preferred` flags.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tbxmap::{MapOptions, NoProgress, NoStatus, default_output_path, map_file};
//!
//! let input = "export.tbx";
//! let output = default_output_path(input); // export_mapped.tbx
//! map_file(input, &output, &MapOptions::new(), &mut NoProgress, &mut NoStatus)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Progress can be observed with any `FnMut(u8)`:
//!
//! ```rust,no_run
//! use tbxmap::{MapOptions, transform, serialize};
//!
//! let (document, summary) = transform("export.tbx", &MapOptions::new(), &mut |percent: u8| {
//!     println!("{percent}%");
//! })?;
//! serialize(&document, "export_mapped.tbx")?;
//! println!("{} term entries", summary.term_entries);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod mapper;
pub mod options;
pub mod traits;
pub mod transform;
pub mod types;
pub mod xml;

// Re-export most used types for easy consumption
pub use crate::{
    error::Error,
    mapper::{
        NoStatus, StatusSink, default_output_path, map_file, output_path_with_name, serialize,
        transform,
    },
    options::MapOptions,
    transform::{MappingSummary, NoProgress, ProgressSink, Transformer, percent_complete},
    types::{
        Description, Document, LangSet, TermEntry, TermGroup, TermNote, UsageCategory,
        UsageFlags, UsageNoteKind,
    },
};
