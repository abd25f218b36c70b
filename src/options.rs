//! Per-call configuration for reading and writing.
//!
//! Every knob is an explicit parameter on the call that uses it — there
//! is no process-wide state, so concurrent reads and writes with
//! different settings cannot interfere.
//!
//! ## Examples
//!
//! ```rust
//! use pdbx_cif::{ReadOptions, WriteOptions};
//!
//! // Reject any byte >= 128 while reading.
//! let read = ReadOptions::new().with_enforce_ascii(true);
//! assert!(read.enforce_ascii);
//!
//! // Re-encode non-ASCII characters as decimal character references.
//! let write = WriteOptions::new().with_convert_char_refs(true);
//! assert!(write.convert_char_refs);
//! ```

/// Configuration for a single read call.
#[derive(Clone, Debug, Default)]
pub struct ReadOptions {
    /// When `true`, any input byte ≥ 128 raises an encoding error.
    /// When `false` (the default) the input is accepted as UTF-8.
    pub enforce_ascii: bool,
}

impl ReadOptions {
    /// Creates the default options (UTF-8 accepted).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets ASCII enforcement.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pdbx_cif::ReadOptions;
    ///
    /// let options = ReadOptions::new().with_enforce_ascii(true);
    /// assert!(options.enforce_ascii);
    /// ```
    #[must_use]
    pub fn with_enforce_ascii(mut self, enforce: bool) -> Self {
        self.enforce_ascii = enforce;
        self
    }
}

/// Configuration for a single write call.
#[derive(Clone, Debug)]
pub struct WriteOptions {
    /// When `true`, refuse to emit any non-ASCII character that is not
    /// being converted to a character reference.
    pub enforce_ascii: bool,
    /// When `true`, non-ASCII characters are written as decimal numeric
    /// character references (`&#NNNN;`); when `false` they are emitted
    /// in their native UTF-8 encoding.
    pub convert_char_refs: bool,
    /// Values longer than this are emitted as `;`-delimited multi-line
    /// fields regardless of content.
    pub max_line_width: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        WriteOptions {
            enforce_ascii: false,
            convert_char_refs: false,
            max_line_width: 2048,
        }
    }
}

impl WriteOptions {
    /// Creates the default options (UTF-8 output, 2048-column width).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets ASCII enforcement for output.
    #[must_use]
    pub fn with_enforce_ascii(mut self, enforce: bool) -> Self {
        self.enforce_ascii = enforce;
        self
    }

    /// Enables or disables character-reference conversion.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pdbx_cif::WriteOptions;
    ///
    /// let options = WriteOptions::new().with_convert_char_refs(true);
    /// assert!(options.convert_char_refs);
    /// ```
    #[must_use]
    pub fn with_convert_char_refs(mut self, convert: bool) -> Self {
        self.convert_char_refs = convert;
        self
    }

    /// Sets the maximum single-line value width.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pdbx_cif::WriteOptions;
    ///
    /// let options = WriteOptions::new().with_max_line_width(80);
    /// assert_eq!(options.max_line_width, 80);
    /// ```
    #[must_use]
    pub fn with_max_line_width(mut self, width: usize) -> Self {
        self.max_line_width = width;
        self
    }
}
