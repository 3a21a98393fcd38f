//! All error types for the tbxmap crate.
//!
//! Input failures (`Io`, `XmlParse`, `InvalidDocument`) abort a run before any
//! term entry is touched; `Output` is reserved for failures while writing the
//! mapped file.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("cannot write output `{}`: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Creates a new structural document error.
    pub fn invalid_document(message: impl Into<String>) -> Self {
        Error::InvalidDocument(message.into())
    }

    /// Creates a new output error for `path`.
    pub fn output(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Output {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` when the error happened while reading or parsing the input.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, Error::Output { .. })
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(value: quick_xml::events::attributes::AttrError) -> Self {
        Error::InvalidDocument(format!("malformed attribute: {value}"))
    }
}
