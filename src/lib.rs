//! # pdbx_cif
//!
//! A reader and writer for the PDBx/mmCIF format: the dictionary-driven
//! text format used to exchange macromolecular structural data (atomic
//! coordinates, experimental metadata, and the schema dictionaries that
//! define valid categories and items).
//!
//! ## What's in a file
//!
//! A file is a sequence of named `data_` blocks. Each block holds
//! categories of tagged values, either one row at a time:
//!
//! ```text
//! data_1ABC
//! _cell.length_a   58.39
//! _cell.length_b   86.70
//! ```
//!
//! or as a `loop_` table with tags declared once and rows following:
//!
//! ```text
//! loop_
//! _atom_site.id
//! _atom_site.type_symbol
//! 1 N
//! 2 C
//! ```
//!
//! Dictionary files additionally nest `save_` frames that describe the
//! schema itself; [`Dictionary`] gives a name-keyed view over those.
//!
//! ## Quick start
//!
//! ```rust
//! use pdbx_cif::{parse_str, to_string, Value};
//!
//! let input = "data_demo\n_cell.length_a 58.39\n";
//! let mut containers = parse_str(input).unwrap();
//!
//! let cell = containers[0].category("cell").unwrap();
//! assert_eq!(cell.first("length_a").and_then(Value::as_str), Some("58.39"));
//!
//! // Mutate and write back out.
//! containers[0]
//!     .category_mut("cell")
//!     .unwrap()
//!     .set("length_a", 0, Value::from("60.00"))
//!     .unwrap();
//! let output = to_string(&containers).unwrap();
//! assert!(output.contains("60.00"));
//! ```
//!
//! ## Guarantees
//!
//! - **Single pass**: parsing and writing are O(n) in the input with no
//!   backtracking; the full result is materialized before a read returns
//! - **Fail fast**: any failure aborts the call with a typed [`Error`];
//!   a partial container list is never returned
//! - **Order preserving**: categories, items, and rows keep declaration
//!   order through a read–write cycle, and writing is idempotent
//! - **Sentinel fidelity**: the `?` (unknown) and `.` (inapplicable)
//!   sentinels are distinct from literal `"?"`/`"."` data and stay
//!   distinct across round trips
//! - **Per-call options**: ASCII enforcement and character-reference
//!   conversion are parameters on each call, never global state
//!
//! File handles are scoped to the call and released on every exit path.
//! The engine holds no state between calls; a container list is a plain
//! value the caller owns, but it must not be mutated and serialized from
//! multiple threads at once without external synchronization.

pub mod dict;
pub mod error;
pub mod model;
pub mod options;

mod parse;
mod token;
mod write;

pub use dict::{CategoryDef, Dictionary, ItemDef};
pub use error::{Error, Result};
pub use model::{Category, Container, ContainerKind, Value};
pub use options::{ReadOptions, WriteOptions};

use std::fs::File;
use std::io::{BufWriter, Read, Write as IoWrite};
use std::path::Path;

/// Parses a string of PDBx/mmCIF text into its ordered data blocks.
///
/// # Examples
///
/// ```rust
/// use pdbx_cif::parse_str;
///
/// let containers = parse_str("data_x\n_a.b 1\n").unwrap();
/// assert_eq!(containers[0].name(), "x");
/// ```
///
/// # Errors
///
/// [`Error::Syntax`] on a tokenizer or grammar violation,
/// [`Error::Structural`] on loop or naming conflicts.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_str(input: &str) -> Result<Vec<Container>> {
    parse_str_with_options(input, ReadOptions::default())
}

/// Parses a string with explicit [`ReadOptions`].
///
/// # Examples
///
/// ```rust
/// use pdbx_cif::{parse_str_with_options, ReadOptions};
///
/// let options = ReadOptions::new().with_enforce_ascii(true);
/// assert!(parse_str_with_options("data_x\n_a.b caf\u{e9}\n", options).is_err());
/// ```
///
/// # Errors
///
/// As [`parse_str`], plus [`Error::Encoding`] for non-ASCII input under
/// enforcement.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_str_with_options(input: &str, options: ReadOptions) -> Result<Vec<Container>> {
    parse::parse(input, &options)
}

/// Parses PDBx/mmCIF text from any reader.
///
/// # Errors
///
/// [`Error::Io`] if reading fails, otherwise as
/// [`parse_str_with_options`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_reader<R: Read>(mut reader: R, options: ReadOptions) -> Result<Vec<Container>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let text = decode(&bytes, &options)?;
    parse::parse(&text, &options)
}

/// Reads and parses a file.
///
/// The file handle is scoped to this call and released on every exit
/// path, including mid-parse failures.
///
/// # Errors
///
/// [`Error::Io`] if the path cannot be opened or read, otherwise as
/// [`parse_str_with_options`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn read_file(path: impl AsRef<Path>) -> Result<Vec<Container>> {
    read_file_with_options(path, ReadOptions::default())
}

/// Reads and parses a file with explicit [`ReadOptions`].
///
/// # Errors
///
/// As [`read_file`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn read_file_with_options(
    path: impl AsRef<Path>,
    options: ReadOptions,
) -> Result<Vec<Container>> {
    let file = File::open(path.as_ref())?;
    parse_reader(file, options)
}

/// Serializes a container list to a string.
///
/// # Examples
///
/// ```rust
/// use pdbx_cif::{parse_str, to_string};
///
/// let containers = parse_str("data_x\n_a.b 'two words'\n").unwrap();
/// let text = to_string(&containers).unwrap();
/// assert!(text.contains("'two words'"));
/// ```
///
/// # Errors
///
/// [`Error::Encoding`] when ASCII enforcement rejects an output value.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string(containers: &[Container]) -> Result<String> {
    to_string_with_options(containers, WriteOptions::default())
}

/// Serializes a container list to a string with explicit
/// [`WriteOptions`].
///
/// # Errors
///
/// As [`to_string`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options(containers: &[Container], options: WriteOptions) -> Result<String> {
    let mut buffer = Vec::new();
    write::write(&mut buffer, containers, &options)?;
    // The writer only ever emits UTF-8.
    String::from_utf8(buffer).map_err(|e| Error::io(e.to_string()))
}

/// Serializes a container list to a writer.
///
/// # Errors
///
/// [`Error::Io`] if the writer fails, otherwise as [`to_string`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W: IoWrite>(writer: W, containers: &[Container]) -> Result<()> {
    to_writer_with_options(writer, containers, WriteOptions::default())
}

/// Serializes a container list to a writer with explicit
/// [`WriteOptions`].
///
/// # Errors
///
/// As [`to_writer`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W: IoWrite>(
    mut writer: W,
    containers: &[Container],
    options: WriteOptions,
) -> Result<()> {
    write::write(&mut writer, containers, &options)
}

/// Serializes a container list to a file, creating or truncating it.
///
/// # Errors
///
/// [`Error::Io`] if the destination cannot be created or written,
/// otherwise as [`to_string`]. No partial-file guarantee is made beyond
/// what the underlying file handle provides.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn write_file(path: impl AsRef<Path>, containers: &[Container]) -> Result<()> {
    write_file_with_options(path, containers, WriteOptions::default())
}

/// Serializes a container list to a file with explicit [`WriteOptions`].
///
/// # Errors
///
/// As [`write_file`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn write_file_with_options(
    path: impl AsRef<Path>,
    containers: &[Container],
    options: WriteOptions,
) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write::write(&mut writer, containers, &options)?;
    writer.flush()?;
    Ok(())
}

/// Decodes raw bytes, locating the first offending byte for encoding
/// diagnostics instead of reporting a bare UTF-8 error.
fn decode(bytes: &[u8], options: &ReadOptions) -> Result<String> {
    if options.enforce_ascii {
        if let Some(idx) = bytes.iter().position(|b| !b.is_ascii()) {
            let (line, col) = position_of(bytes, idx);
            return Err(Error::encoding(
                line,
                col,
                format!("byte 0x{:02X} with ASCII enforcement", bytes[idx]),
            ));
        }
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text.to_string()),
        Err(e) => {
            let (line, col) = position_of(bytes, e.valid_up_to());
            Err(Error::encoding(line, col, "input is not valid UTF-8"))
        }
    }
}

fn position_of(bytes: &[u8], idx: usize) -> (usize, usize) {
    let line = 1 + bytes[..idx].iter().filter(|&&b| b == b'\n').count();
    let col = idx - bytes[..idx].iter().rposition(|&b| b == b'\n').map_or(0, |p| p + 1) + 1;
    (line, col)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_preserves_structure() {
        let input = "data_TEST\n_cat.val 'hello world'\nloop_\n_l.a\n_l.b\n1 2\n3 4\n";
        let containers = parse_str(input).unwrap();
        let text = to_string(&containers).unwrap();
        let reparsed = parse_str(&text).unwrap();
        assert_eq!(containers, reparsed);
    }

    #[test]
    fn serialization_is_idempotent() {
        let input = "data_d\n_a.b 'x y'\n_a.c .\nloop_\n_l.m\n_l.n\n? .\n'1' \"2\"\n";
        let once = to_string(&parse_str(input).unwrap()).unwrap();
        let twice = to_string(&parse_str(&once).unwrap()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn literal_dot_roundtrips_as_data() {
        let mut block = Container::data("d");
        let mut cat = Category::new("c");
        cat.add_item("v").unwrap();
        cat.append_row(vec![Value::from(".")]).unwrap();
        block.insert_category(cat).unwrap();

        let text = to_string(&[block]).unwrap();
        assert!(text.contains("'.'"));
        let reparsed = parse_str(&text).unwrap();
        let v = reparsed[0].category("c").unwrap().first("v").unwrap();
        assert_eq!(v, &Value::Present(".".to_string()));
    }

    #[test]
    fn ascii_enforcement_on_read() {
        let input = "data_x\n_a.b caf\u{e9}\n";
        let strict = ReadOptions::new().with_enforce_ascii(true);
        assert!(parse_str_with_options(input, strict).unwrap_err().is_encoding());
        assert!(parse_str(input).is_ok());
    }

    #[test]
    fn char_ref_conversion_on_write() {
        let containers = parse_str("data_x\n_a.b '\u{3b1}-helix'\n").unwrap();
        let options = WriteOptions::new().with_convert_char_refs(true);
        let text = to_string_with_options(&containers, options).unwrap();
        assert!(text.contains("&#945;-helix"));
        assert!(text.is_ascii());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_file("/no/such/path.cif").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
