//! Serialization of the container graph back to PDBx/mmCIF text.
//!
//! Every value is rendered with the least quoting that survives a
//! re-read, evaluated in order:
//!
//! 1. bare, when nothing in the value could be mistaken for markup
//! 2. single-quoted, unless the content holds a `'` followed by
//!    whitespace (which would close the token early)
//! 3. double-quoted, by the same rule for `"`
//! 4. a `;`-delimited multi-line field, always used for values with
//!    newlines or longer than the configured line width
//!
//! The `?`/`.` sentinels are written bare; a real data string equal to
//! `.` or `?` is forced into quotes so it re-reads as data and never as
//! a sentinel. Loops are written with tags once, then rows in declared
//! item order. Nothing is ever reordered.
//!
//! With character-reference conversion enabled, non-ASCII characters are
//! re-encoded as decimal references (`&#NNNN;`) before quoting is chosen;
//! with plain ASCII enforcement, a non-ASCII character in the output is
//! an encoding error instead.

use crate::model::{Category, Container, Value};
use crate::{Error, Result, WriteOptions};
use std::io::Write as IoWrite;

/// Renders a container list to `out`.
pub(crate) fn write<W: IoWrite>(
    out: &mut W,
    containers: &[Container],
    options: &WriteOptions,
) -> Result<()> {
    let mut writer = Writer {
        out,
        options,
        line: 1,
    };
    for container in containers {
        writer.write_block(container)?;
    }
    Ok(())
}

struct Writer<'a, W: IoWrite> {
    out: &'a mut W,
    options: &'a WriteOptions,
    line: usize,
}

enum Rendered {
    /// Fits on the current line, quoting already applied.
    Inline(String),
    /// Must be emitted as a `;`-delimited field, content verbatim.
    Field(String),
}

impl<W: IoWrite> Writer<'_, W> {
    fn emit(&mut self, text: &str) -> Result<()> {
        self.line += text.matches('\n').count();
        self.out.write_all(text.as_bytes())?;
        Ok(())
    }

    fn write_block(&mut self, block: &Container) -> Result<()> {
        self.emit(&format!("data_{}\n#\n", block.name()))?;
        for category in block.categories() {
            self.write_category(category)?;
        }
        for frame in block.frames() {
            self.write_frame(frame)?;
        }
        Ok(())
    }

    fn write_frame(&mut self, frame: &Container) -> Result<()> {
        self.emit(&format!("save_{}\n", frame.name()))?;
        for category in frame.categories() {
            self.write_category(category)?;
        }
        self.emit("save_\n#\n")
    }

    fn write_category(&mut self, category: &Category) -> Result<()> {
        if category.is_empty() || category.row_count() == 0 {
            return Ok(());
        }
        if category.row_count() == 1 {
            self.write_single_row(category)?;
        } else {
            self.write_loop(category)?;
        }
        self.emit("#\n")
    }

    /// One tag–value line per item, values aligned past the longest tag.
    fn write_single_row(&mut self, category: &Category) -> Result<()> {
        let tag_width = category
            .items()
            .iter()
            .map(|item| category.name().len() + item.len() + 2)
            .max()
            .unwrap_or(0);
        let row = &category.rows()[0];
        for (item, value) in category.items().iter().zip(row) {
            let tag = format!("_{}.{}", category.name(), item);
            match self.render(value)? {
                Rendered::Inline(text) => {
                    self.emit(&format!("{:<width$}   {}\n", tag, text, width = tag_width))?;
                }
                Rendered::Field(text) => {
                    self.emit(&format!("{}\n", tag))?;
                    self.emit_field(&text)?;
                }
            }
        }
        Ok(())
    }

    fn write_loop(&mut self, category: &Category) -> Result<()> {
        self.emit("loop_\n")?;
        for item in category.items() {
            self.emit(&format!("_{}.{}\n", category.name(), item))?;
        }
        for row in category.rows() {
            let mut pending = String::new();
            for value in row {
                match self.render(value)? {
                    Rendered::Inline(text) => {
                        if !pending.is_empty() {
                            pending.push(' ');
                        }
                        pending.push_str(&text);
                    }
                    Rendered::Field(text) => {
                        if !pending.is_empty() {
                            pending.push('\n');
                            let flush = std::mem::take(&mut pending);
                            self.emit(&flush)?;
                        }
                        self.emit_field(&text)?;
                    }
                }
            }
            if !pending.is_empty() {
                pending.push('\n');
                self.emit(&pending)?;
            }
        }
        Ok(())
    }

    fn emit_field(&mut self, text: &str) -> Result<()> {
        self.emit(&format!(";{}\n;\n", text))
    }

    fn render(&mut self, value: &Value) -> Result<Rendered> {
        let text = match value {
            Value::Unknown => return Ok(Rendered::Inline("?".to_string())),
            Value::Inapplicable => return Ok(Rendered::Inline(".".to_string())),
            Value::Present(text) => text,
        };
        let text = if self.options.convert_char_refs {
            encode_char_refs(text)
        } else {
            if self.options.enforce_ascii {
                if let Some(ch) = text.chars().find(|c| !c.is_ascii()) {
                    return Err(Error::encoding(
                        self.line,
                        1,
                        format!(
                            "non-ASCII character U+{:04X} in output with ASCII enforcement",
                            ch as u32
                        ),
                    ));
                }
            }
            text.clone()
        };
        Ok(match quote_style(&text, self.options.max_line_width) {
            QuoteStyle::Bare => Rendered::Inline(text),
            QuoteStyle::Single => Rendered::Inline(format!("'{}'", text)),
            QuoteStyle::Double => Rendered::Inline(format!("\"{}\"", text)),
            QuoteStyle::Field => Rendered::Field(text),
        })
    }
}

#[derive(Debug, PartialEq, Eq)]
enum QuoteStyle {
    Bare,
    Single,
    Double,
    Field,
}

/// Picks the lightest representation that re-reads to the same string.
fn quote_style(text: &str, max_width: usize) -> QuoteStyle {
    if text.contains('\n') || text.len() > max_width {
        return QuoteStyle::Field;
    }
    if can_write_bare(text) {
        return QuoteStyle::Bare;
    }
    if !quote_would_close(text, '\'') {
        return QuoteStyle::Single;
    }
    if !quote_would_close(text, '"') {
        return QuoteStyle::Double;
    }
    QuoteStyle::Field
}

fn can_write_bare(text: &str) -> bool {
    if text.is_empty() || text == "." || text == "?" {
        return false;
    }
    if text.chars().any(|c| c.is_whitespace() || c == '\'' || c == '"') {
        return false;
    }
    // Leading characters with reserved meaning at token start.
    if matches!(
        text.as_bytes()[0],
        b'_' | b'#' | b'$' | b';' | b'[' | b']'
    ) {
        return false;
    }
    // A bare keyword would be re-read as structure, not data.
    let lower = text.to_ascii_lowercase();
    if lower.starts_with("data_")
        || lower.starts_with("save_")
        || lower == "loop_"
        || lower == "stop_"
        || lower == "global_"
    {
        return false;
    }
    true
}

/// True when `quote` followed by whitespace occurs inside `text`, which
/// would terminate the quoted token early on re-read. A trailing quote
/// is safe: the re-reader sees it glued to the closing delimiter and
/// keeps it as content.
fn quote_would_close(text: &str, quote: char) -> bool {
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == quote {
            if let Some(next) = chars.peek() {
                if next.is_whitespace() {
                    return true;
                }
            }
        }
    }
    false
}

/// Re-encodes non-ASCII characters as decimal numeric character
/// references, leaving ASCII untouched.
fn encode_char_refs(text: &str) -> String {
    if text.is_ascii() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        if ch.is_ascii() {
            out.push(ch);
        } else {
            out.push_str(&format!("&#{};", ch as u32));
        }
    }
    out
}
