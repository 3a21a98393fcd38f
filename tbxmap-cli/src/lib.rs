//! CLI library for testing purposes

pub mod inspect;
pub mod map;
pub mod validation;

pub use inspect::{Inspection, inspect_document};
pub use map::{MapArgs, resolve_output_path};
