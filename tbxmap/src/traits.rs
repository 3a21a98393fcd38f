//! Traits for reading and writing TBX documents.

use std::{
    fs::File,
    io::{BufRead, Cursor, Read, Write},
    path::Path,
};

use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE};
use quick_xml::{Reader, events::Event};

use crate::error::Error;

/// A trait for parsing and writing one XML file.
///
/// # Example
///
/// ```rust,no_run
/// use tbxmap::{Document, traits::Parser};
/// let document = Document::read_from("export.tbx")?;
/// document.write_to("export_copy.tbx")?;
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Parser {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error>
    where
        Self: Sized;

    /// Parse from file path.
    ///
    /// Exports are often UTF-16 with a BOM, so the file is decoded to UTF-8 first.
    /// Without a BOM, a single-byte encoding named in the XML declaration
    /// (e.g. `ISO-8859-1`) is used.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let mut bytes = Vec::new();
        File::open(path)
            .and_then(|mut file| file.read_to_end(&mut bytes))
            .map_err(Error::Io)?;
        // Auto-detect BOM, decode to UTF-8; passthrough UTF-8
        let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
            .encoding(declared_encoding(&bytes))
            .bom_override(true)
            .build(bytes.as_slice());

        let mut decoded = String::new();
        decoder.read_to_string(&mut decoded).map_err(Error::Io)?;

        Self::from_str(&decoded)
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error>;

    /// Write to file path.
    ///
    /// The document is rendered in memory first, so a rendering failure never
    /// leaves a truncated file behind.
    fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        let mut rendered = Vec::new();
        self.to_writer(&mut rendered)?;
        std::fs::write(path, rendered).map_err(|e| Error::output(path, e))
    }

    /// Parse from a string.
    fn from_str(s: &str) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(s))
    }

    /// Parse from bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(bytes))
    }
}

/// The encoding named by a leading `<?xml ... encoding="..."?>`, when it is one
/// that needs transcoding.
///
/// UTF-8 keeps the strict passthrough. UTF-16 labels are ignored: a declaration
/// readable as ASCII cannot be UTF-16, and real UTF-16 files carry a BOM.
fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let mut reader = Reader::from_reader(bytes);
    let mut buf = Vec::new();
    let label = match reader.read_event_into(&mut buf) {
        Ok(Event::Decl(decl)) => decl.encoding()?.ok()?.into_owned(),
        _ => return None,
    };
    Encoding::for_label(&label).filter(|e| ![UTF_8, UTF_16LE, UTF_16BE].contains(e))
}
