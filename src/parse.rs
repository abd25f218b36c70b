//! Grammar-driven construction of the container graph.
//!
//! The parser consumes the token stream in a single pass with no
//! backtracking:
//!
//! ```text
//! file      := container*
//! container := DATA name (tagValue | loop | saveFrame)*
//! loop      := LOOP tag+ value+ STOP?
//! saveFrame := SAVE name (tagValue | loop)* SAVE(empty)
//! ```
//!
//! Any grammar violation aborts the whole parse; a partial container
//! list is never returned. Syntax diagnostics point at the offending
//! token, structural diagnostics describe the graph-level conflict.

use crate::model::{Category, Container, Value};
use crate::token::{Token, TokenKind, Tokenizer};
use crate::{Error, ReadOptions, Result};
use std::collections::HashSet;

/// Parses an input string into its ordered list of data blocks.
pub(crate) fn parse(input: &str, options: &ReadOptions) -> Result<Vec<Container>> {
    let tokens = Tokenizer::new(input, options.enforce_ascii).run()?;
    Parser::new(tokens).run()
}

struct Parser {
    tokens: Vec<Token>,
    cursor: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, cursor: 0 }
    }

    fn run(mut self) -> Result<Vec<Container>> {
        let mut containers: Vec<Container> = Vec::new();
        let mut seen = HashSet::new();
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::Data(ref name) => {
                    let name = name.clone();
                    if !seen.insert(name.clone()) {
                        return Err(Error::structural(format!(
                            "duplicate data block name {}",
                            name
                        )));
                    }
                    self.advance();
                    containers.push(self.parse_container(name)?);
                }
                _ => return Err(unexpected(&token, "expected data_ block")),
            }
        }
        Ok(containers)
    }

    fn parse_container(&mut self, name: String) -> Result<Container> {
        let mut container = Container::data(name);
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::Data(_) => break,
                TokenKind::Tag { ref category, ref item } => {
                    let (category, item) = (category.clone(), item.clone());
                    self.advance();
                    self.parse_tag_value(&mut container, category, item)?;
                }
                TokenKind::Loop => {
                    self.advance();
                    self.parse_loop(&mut container, &token)?;
                }
                TokenKind::Save(ref frame_name) if !frame_name.is_empty() => {
                    let frame_name = frame_name.clone();
                    self.advance();
                    let frame = self.parse_save_frame(frame_name)?;
                    container.insert_frame(frame)?;
                }
                _ => return Err(unexpected(&token, "expected tag, loop_, or save_")),
            }
        }
        Ok(container)
    }

    /// A bare tag–value statement. Statements for the same category merge
    /// into its single row; a repeated item name is rejected rather than
    /// silently overwritten.
    fn parse_tag_value(
        &mut self,
        container: &mut Container,
        category: String,
        item: String,
    ) -> Result<()> {
        let value = self.expect_value(&category, &item)?;

        let cat = container.category_or_insert(&category);
        if cat.row_count() > 1 {
            return Err(Error::structural(format!(
                "category {} was declared by a loop and cannot take a bare _{}.{} statement",
                category, category, item
            )));
        }
        if cat.has_item(&item) {
            return Err(Error::structural(format!(
                "item _{}.{} assigned more than once",
                category, item
            )));
        }
        cat.add_item(item.clone())?;
        if cat.row_count() == 0 {
            let blanks = vec![Value::Unknown; cat.items().len()];
            cat.append_row(blanks)?;
        }
        cat.set(&item, 0, value)
    }

    fn parse_loop(&mut self, container: &mut Container, loop_token: &Token) -> Result<()> {
        // Tag header: one or more tags, all from the same category.
        let mut category_name: Option<String> = None;
        let mut items: Vec<String> = Vec::new();
        while let Some(token) = self.peek() {
            let TokenKind::Tag { ref category, ref item } = token.kind else {
                break;
            };
            match category_name {
                None => category_name = Some(category.clone()),
                Some(ref first) if first != category => {
                    return Err(Error::syntax(
                        token.line,
                        token.col,
                        format!(
                            "loop_ declares items from more than one category ({} and {})",
                            first, category
                        ),
                    ));
                }
                Some(_) => {}
            }
            if items.contains(item) {
                return Err(Error::structural(format!(
                    "duplicate item name in loop: _{}.{}",
                    category, item
                )));
            }
            items.push(item.clone());
            self.advance();
        }
        let Some(category_name) = category_name else {
            return Err(Error::syntax(
                loop_token.line,
                loop_token.col,
                "loop_ without item declarations",
            ));
        };

        // Value body: runs to the next tag or keyword; stop_ ends it
        // explicitly.
        let mut values: Vec<Value> = Vec::new();
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::Stop => {
                    self.advance();
                    break;
                }
                TokenKind::Bare(_) | TokenKind::Quoted(_) | TokenKind::Field(_) => {
                    values.push(token_value(&token.kind));
                    self.advance();
                }
                _ => break,
            }
        }
        if values.is_empty() {
            return Err(Error::syntax(
                loop_token.line,
                loop_token.col,
                format!("loop_ over category {} has no values", category_name),
            ));
        }
        if values.len() % items.len() != 0 {
            return Err(Error::structural(format!(
                "loop value count {} is not a multiple of tag count {} for category {}",
                values.len(),
                items.len(),
                category_name
            )));
        }

        let mut category = Category::new(&category_name);
        for item in &items {
            category.add_item(item.clone())?;
        }
        let row_count = values.len() / items.len();
        let mut values = values.into_iter();
        for _ in 0..row_count {
            let row: Vec<Value> = values.by_ref().take(items.len()).collect();
            category.append_row(row)?;
        }
        container.insert_category(category)
    }

    /// Save frames hold tag–value statements and loops, closed by a bare
    /// `save_`. They nest exactly one level: another named `save_` or a
    /// `data_` before the terminator is an error.
    fn parse_save_frame(&mut self, name: String) -> Result<Container> {
        let mut frame = Container::save(name);
        loop {
            let Some(token) = self.peek() else {
                return Err(Error::structural(format!(
                    "save frame {} not terminated before end of input",
                    frame.name()
                )));
            };
            match token.kind {
                TokenKind::Save(ref terminator) if terminator.is_empty() => {
                    self.advance();
                    return Ok(frame);
                }
                TokenKind::Tag { ref category, ref item } => {
                    let (category, item) = (category.clone(), item.clone());
                    self.advance();
                    self.parse_tag_value(&mut frame, category, item)?;
                }
                TokenKind::Loop => {
                    self.advance();
                    self.parse_loop(&mut frame, &token)?;
                }
                _ => {
                    return Err(unexpected(
                        &token,
                        "expected tag, loop_, or save_ terminator",
                    ))
                }
            }
        }
    }

    fn expect_value(&mut self, category: &str, item: &str) -> Result<Value> {
        match self.peek() {
            Some(token)
                if matches!(
                    token.kind,
                    TokenKind::Bare(_) | TokenKind::Quoted(_) | TokenKind::Field(_)
                ) =>
            {
                let value = token_value(&token.kind);
                self.advance();
                Ok(value)
            }
            Some(token) => Err(Error::syntax(
                token.line,
                token.col,
                format!("expected a value for _{}.{}", category, item),
            )),
            None => {
                let (line, col) = self.end_position();
                Err(Error::syntax(
                    line,
                    col,
                    format!("expected a value for _{}.{}, found end of input", category, item),
                ))
            }
        }
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.cursor).cloned()
    }

    fn advance(&mut self) {
        self.cursor += 1;
    }

    fn end_position(&self) -> (usize, usize) {
        self.tokens
            .last()
            .map(|t| (t.line, t.col))
            .unwrap_or((1, 1))
    }
}

fn unexpected(token: &Token, expected: &str) -> Error {
    Error::syntax(
        token.line,
        token.col,
        format!("{}, found {}", expected, describe(&token.kind)),
    )
}

/// Maps a value token to the data model. Bare `.` and `?` are the
/// sentinels; a delimited `.` or `?` is a real data string.
fn token_value(kind: &TokenKind) -> Value {
    match kind {
        TokenKind::Bare(s) if s == "." => Value::Inapplicable,
        TokenKind::Bare(s) if s == "?" => Value::Unknown,
        TokenKind::Bare(s) | TokenKind::Quoted(s) | TokenKind::Field(s) => {
            Value::Present(s.clone())
        }
        // Callers only hand value tokens to this function.
        _ => Value::Unknown,
    }
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Data(name) => format!("data_{}", name),
        TokenKind::Save(name) if name.is_empty() => "save_ terminator".to_string(),
        TokenKind::Save(name) => format!("save_{}", name),
        TokenKind::Loop => "loop_".to_string(),
        TokenKind::Stop => "stop_".to_string(),
        TokenKind::Global => "global_".to_string(),
        TokenKind::Tag { category, item } => format!("_{}.{}", category, item),
        TokenKind::Bare(_) | TokenKind::Quoted(_) | TokenKind::Field(_) => "a value".to_string(),
    }
}
