//! Tokenizer for the PDBx/mmCIF wire format.
//!
//! Hand-written single-pass character scanner. Emits keywords, tags, and
//! values with the 1-based line/column where each token starts, so grammar
//! diagnostics can point at the input. Comments are discarded here and
//! never reach the parser.
//!
//! Quoting follows the CIF rules rather than ordinary string syntax: a
//! closing `'` or `"` only terminates the value when it is followed by
//! whitespace or end of input, so `O5'` and `can't stop` tokenize with the
//! quote as content. A `;` in column one opens a literal text field that
//! runs to the next line beginning with `;`, preserving everything in
//! between verbatim (quotes, `#`, newlines).
//!
//! Numeric character references (`&#NNNN;`) are ordinary content to the
//! scanner; they pass through untouched in either enforcement mode. The
//! writer is what produces them, see [`crate::write`].

use crate::{Error, Result};

/// A lexical token plus the position where it starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub col: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// `data_<name>` keyword; the name is never empty.
    Data(String),
    /// `save_<name>` keyword; an empty name terminates a frame.
    Save(String),
    /// `loop_` keyword.
    Loop,
    /// `stop_` keyword.
    Stop,
    /// `global_` keyword.
    Global,
    /// `_category.item` tag, split at the first `.`.
    Tag { category: String, item: String },
    /// A bare (undelimited) value. `.` and `?` sentinels arrive here.
    Bare(String),
    /// A `'`- or `"`-delimited value.
    Quoted(String),
    /// A `;`-delimited multi-line text field.
    Field(String),
}

pub(crate) struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    col: usize,
    enforce_ascii: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str, enforce_ascii: bool) -> Self {
        Tokenizer {
            input,
            pos: 0,
            line: 1,
            col: 1,
            enforce_ascii,
        }
    }

    /// Scans the whole input into a token vector, fail-fast.
    pub fn run(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn next_char(&mut self) -> Result<Option<char>> {
        let Some(ch) = self.input[self.pos..].chars().next() else {
            return Ok(None);
        };
        if self.enforce_ascii && !ch.is_ascii() {
            return Err(Error::encoding(
                self.line,
                self.col,
                format!("non-ASCII character U+{:04X} with ASCII enforcement", ch as u32),
            ));
        }
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Ok(Some(ch))
    }

    /// Emits the next token, or `None` at end of input.
    fn next_token(&mut self) -> Result<Option<Token>> {
        loop {
            let (line, col) = (self.line, self.col);
            match self.peek_char() {
                None => return Ok(None),
                Some(ch) if ch.is_whitespace() => {
                    self.next_char()?;
                }
                Some('#') => {
                    self.skip_comment()?;
                }
                Some(';') if self.col == 1 => {
                    let text = self.scan_text_field(line, col)?;
                    return Ok(Some(Token {
                        kind: TokenKind::Field(text),
                        line,
                        col,
                    }));
                }
                Some(quote @ ('\'' | '"')) => {
                    let text = self.scan_quoted(quote, line, col)?;
                    return Ok(Some(Token {
                        kind: TokenKind::Quoted(text),
                        line,
                        col,
                    }));
                }
                Some(_) => {
                    let word = self.scan_word()?;
                    let kind = classify_word(&word, line, col)?;
                    return Ok(Some(Token { kind, line, col }));
                }
            }
        }
    }

    fn skip_comment(&mut self) -> Result<()> {
        while let Some(ch) = self.peek_char() {
            if ch == '\n' {
                break;
            }
            self.next_char()?;
        }
        Ok(())
    }

    /// Consumes characters up to the next whitespace or end of input.
    /// A `#` inside a word is content, not a comment.
    fn scan_word(&mut self) -> Result<String> {
        let start = self.pos;
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() {
                break;
            }
            self.next_char()?;
        }
        Ok(self.input[start..self.pos].to_string())
    }

    /// Consumes a `'`- or `"`-delimited value. The closing quote counts
    /// only when followed by whitespace or end of input; quoted values
    /// cannot span lines.
    fn scan_quoted(&mut self, quote: char, line: usize, col: usize) -> Result<String> {
        self.next_char()?; // opening quote
        let mut text = String::new();
        loop {
            match self.peek_char() {
                None | Some('\n') => {
                    return Err(Error::syntax(line, col, "unterminated quoted value"));
                }
                Some(ch) if ch == quote => {
                    self.next_char()?;
                    match self.peek_char() {
                        None => return Ok(text),
                        Some(next) if next.is_whitespace() => return Ok(text),
                        // Quote-in-word: part of the content.
                        Some(_) => text.push(ch),
                    }
                }
                Some(ch) => {
                    self.next_char()?;
                    text.push(ch);
                }
            }
        }
    }

    /// Consumes a `;`-delimited text field opened in column one. Interior
    /// content is preserved verbatim; the final newline before the
    /// closing `;` is not part of the value.
    fn scan_text_field(&mut self, line: usize, col: usize) -> Result<String> {
        self.next_char()?; // opening ';'
        let start = self.pos;
        loop {
            match self.peek_char() {
                None => {
                    return Err(Error::syntax(line, col, "unterminated multi-line text field"));
                }
                Some(';') if self.col == 1 => {
                    let end = self.pos;
                    self.next_char()?; // closing ';'
                    let text = self.input[start..end]
                        .strip_suffix('\n')
                        .map(|t| t.strip_suffix('\r').unwrap_or(t))
                        .unwrap_or(&self.input[start..end]);
                    return Ok(text.to_string());
                }
                Some(_) => {
                    self.next_char()?;
                }
            }
        }
    }
}

/// Sorts a bare word into keyword, tag, or value.
fn classify_word(word: &str, line: usize, col: usize) -> Result<TokenKind> {
    let lower = word.to_ascii_lowercase();
    if let Some(name) = strip_keyword(word, &lower, "data_") {
        if name.is_empty() {
            return Err(Error::syntax(line, col, "data_ keyword without a block name"));
        }
        return Ok(TokenKind::Data(name.to_string()));
    }
    if let Some(name) = strip_keyword(word, &lower, "save_") {
        return Ok(TokenKind::Save(name.to_string()));
    }
    match lower.as_str() {
        "loop_" => return Ok(TokenKind::Loop),
        "stop_" => return Ok(TokenKind::Stop),
        "global_" => return Ok(TokenKind::Global),
        _ => {}
    }
    if let Some(tag) = word.strip_prefix('_') {
        let Some((category, item)) = tag.split_once('.') else {
            return Err(Error::syntax(
                line,
                col,
                format!("tag {} is not of the form _category.item", word),
            ));
        };
        if category.is_empty() || item.is_empty() {
            return Err(Error::syntax(
                line,
                col,
                format!("tag {} has an empty category or item name", word),
            ));
        }
        return Ok(TokenKind::Tag {
            category: category.to_string(),
            item: item.to_string(),
        });
    }
    Ok(TokenKind::Bare(word.to_string()))
}

/// Case-insensitive keyword match that preserves the case of the name.
fn strip_keyword<'a>(word: &'a str, lower: &str, keyword: &str) -> Option<&'a str> {
    if lower.starts_with(keyword) {
        Some(&word[keyword.len()..])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(input: &str) -> Vec<TokenKind> {
        Tokenizer::new(input, false)
            .run()
            .expect("tokenize")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn keywords_case_insensitive() {
        let tokens = tokenize("DATA_abc Loop_ STOP_ global_ SAVE_x save_");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Data("abc".into()),
                TokenKind::Loop,
                TokenKind::Stop,
                TokenKind::Global,
                TokenKind::Save("x".into()),
                TokenKind::Save(String::new()),
            ]
        );
    }

    #[test]
    fn tag_splits_category_item() {
        let tokens = tokenize("_atom_site.Cartn_x");
        assert_eq!(
            tokens,
            vec![TokenKind::Tag {
                category: "atom_site".into(),
                item: "Cartn_x".into()
            }]
        );
    }

    #[test]
    fn tag_without_dot_rejected() {
        let err = Tokenizer::new("_plain_tag", false).run().unwrap_err();
        assert!(err.is_syntax());
    }

    #[test]
    fn quote_in_word_is_content() {
        // The apostrophe in can't is glued to a letter, so it stays
        // content; only quote-then-whitespace closes.
        let tokens = tokenize("'can't stop' plain");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Quoted("can't stop".into()),
                TokenKind::Bare("plain".into())
            ]
        );
    }

    #[test]
    fn quote_before_whitespace_closes() {
        let tokens = tokenize("'O5' next");
        assert_eq!(
            tokens,
            vec![TokenKind::Quoted("O5".into()), TokenKind::Bare("next".into())]
        );
    }

    #[test]
    fn closing_quote_at_eof() {
        assert_eq!(tokenize("'abc'"), vec![TokenKind::Quoted("abc".into())]);
    }

    #[test]
    fn unterminated_quote_reports_line() {
        let err = Tokenizer::new("data_x\n_a.b 'oops", false).run().unwrap_err();
        match err {
            Error::Syntax { line, .. } => assert_eq!(line, 2),
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn text_field_preserves_interior() {
        let input = ";\nline one # not a comment\n'quotes' stay\n;\n";
        let tokens = tokenize(input);
        assert_eq!(
            tokens,
            vec![TokenKind::Field("line one # not a comment\n'quotes' stay".into())]
        );
    }

    #[test]
    fn text_field_unterminated() {
        let err = Tokenizer::new(";\nno closing semicolon\n", false)
            .run()
            .unwrap_err();
        assert!(err.is_syntax());
    }

    #[test]
    fn semicolon_mid_line_is_bare_content() {
        assert_eq!(tokenize("a;b"), vec![TokenKind::Bare("a;b".into())]);
    }

    #[test]
    fn comment_discarded() {
        let tokens = tokenize("# leading comment\nvalue # trailing\n");
        assert_eq!(tokens, vec![TokenKind::Bare("value".into())]);
    }

    #[test]
    fn comment_at_token_start_only() {
        // A '#' glued to a word is content; detached it opens a comment.
        assert_eq!(tokenize("ab#cd"), vec![TokenKind::Bare("ab#cd".into())]);
        assert_eq!(tokenize("ab #cd"), vec![TokenKind::Bare("ab".into())]);
    }

    #[test]
    fn ascii_enforcement_rejects_high_bytes() {
        let err = Tokenizer::new("data_x\n_a.b caf\u{e9}\n", true)
            .run()
            .unwrap_err();
        assert!(err.is_encoding());

        // Same input accepted without enforcement.
        assert!(Tokenizer::new("data_x\n_a.b caf\u{e9}\n", false).run().is_ok());
    }

    #[test]
    fn char_refs_pass_through() {
        let tokens = tokenize("&#945;-helix");
        assert_eq!(tokens, vec![TokenKind::Bare("&#945;-helix".into())]);
    }

    #[test]
    fn empty_data_name_rejected() {
        assert!(Tokenizer::new("data_", false).run().unwrap_err().is_syntax());
    }

    #[test]
    fn positions_are_one_based() {
        let tokens = Tokenizer::new("data_x\n  _a.b v\n", false).run().unwrap();
        assert_eq!((tokens[0].line, tokens[0].col), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].col), (2, 3));
        assert_eq!((tokens[2].line, tokens[2].col), (2, 8));
    }
}
