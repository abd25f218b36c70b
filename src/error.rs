//! Error types for PDBx/mmCIF reading and writing.
//!
//! The engine reports exactly four kinds of failure, modeled as a closed
//! enum so callers can discriminate with a `match` rather than downcasting:
//!
//! - **Syntax**: the tokenizer or grammar rejected the input; carries the
//!   line and column where scanning stopped
//! - **Encoding**: a byte ≥ 128 was seen while ASCII enforcement was
//!   requested, or the input was not valid UTF-8
//! - **Structural**: the token stream was well-formed but the container
//!   graph it describes is not (loop value count not a multiple of the
//!   tag count, duplicate item or container names)
//! - **Io**: the underlying file could not be read or written
//!
//! All parse-time failures are fail-fast: the current file's parse aborts
//! immediately and no partial container list is ever returned.
//!
//! ## Examples
//!
//! ```rust
//! use pdbx_cif::{parse_str, Error};
//!
//! let result = parse_str("data_x\n_cat.val 'unterminated");
//! match result {
//!     Err(Error::Syntax { line, .. }) => assert_eq!(line, 2),
//!     other => panic!("expected syntax error, got {:?}", other),
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// All failures the engine can report.
///
/// Each variant carries enough context to produce a useful diagnostic;
/// the syntax and encoding variants locate the failure in the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Tokenizer or grammar violation.
    #[error("syntax error at line {line}, column {col}: {msg}")]
    Syntax {
        line: usize,
        col: usize,
        msg: String,
    },

    /// Disallowed byte under ASCII enforcement, or invalid UTF-8.
    #[error("encoding error at line {line}, column {col}: {msg}")]
    Encoding {
        line: usize,
        col: usize,
        msg: String,
    },

    /// Well-formed tokens describing an invalid container graph.
    #[error("structural error: {msg}")]
    Structural { msg: String },

    /// File could not be opened, read, or written.
    #[error("I/O error: {0}")]
    Io(String),
}

impl Error {
    /// Creates a syntax error located at `line`/`col` (both 1-based).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pdbx_cif::Error;
    ///
    /// let err = Error::syntax(10, 5, "unterminated quoted value");
    /// assert!(err.to_string().contains("line 10"));
    /// ```
    pub fn syntax(line: usize, col: usize, msg: impl fmt::Display) -> Self {
        Error::Syntax {
            line,
            col,
            msg: msg.to_string(),
        }
    }

    /// Creates an encoding error located at `line`/`col` (both 1-based).
    pub fn encoding(line: usize, col: usize, msg: impl fmt::Display) -> Self {
        Error::Encoding {
            line,
            col,
            msg: msg.to_string(),
        }
    }

    /// Creates a structural error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pdbx_cif::Error;
    ///
    /// let err = Error::structural("duplicate item name in loop: _cat.x");
    /// assert!(err.to_string().contains("duplicate item"));
    /// ```
    pub fn structural(msg: impl fmt::Display) -> Self {
        Error::Structural {
            msg: msg.to_string(),
        }
    }

    /// Creates an I/O error from a display message.
    pub fn io(msg: impl fmt::Display) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns `true` for the [`Error::Syntax`] variant.
    #[must_use]
    pub const fn is_syntax(&self) -> bool {
        matches!(self, Error::Syntax { .. })
    }

    /// Returns `true` for the [`Error::Structural`] variant.
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        matches!(self, Error::Structural { .. })
    }

    /// Returns `true` for the [`Error::Encoding`] variant.
    #[must_use]
    pub const fn is_encoding(&self) -> bool {
        matches!(self, Error::Encoding { .. })
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_carries_position() {
        let err = Error::syntax(3, 14, "malformed keyword");
        match err {
            Error::Syntax { line, col, ref msg } => {
                assert_eq!(line, 3);
                assert_eq!(col, 14);
                assert_eq!(msg, "malformed keyword");
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn display_includes_kind() {
        assert!(Error::structural("x").to_string().starts_with("structural"));
        assert!(Error::io("x").to_string().starts_with("I/O"));
    }
}
