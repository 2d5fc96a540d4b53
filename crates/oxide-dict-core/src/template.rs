//! SQL function templates with positional `{n}` placeholders.

use core::fmt;

use crate::buffer::SqlBuffer;
use crate::error::{DialectError, Result};
use crate::filter::FilterValue;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Text(String),
    Operand(usize),
}

/// A SQL snippet such as `LTRIM({0})` or `(CAST({0} AS VARCHAR(1000)) || CAST({1} AS VARCHAR(1000)))`.
///
/// The template is parsed once when the capability set is built. A `{`
/// that is not followed by digits and `}` is kept as plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlTemplate {
    source: String,
    pieces: Vec<Piece>,
}

impl SqlTemplate {
    /// Parses a template.
    #[must_use]
    pub fn new(source: &str) -> Self {
        let mut pieces = Vec::new();
        let mut text = String::new();
        let mut rest = source;

        while let Some(open) = rest.find('{') {
            text.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let digits = after.bytes().take_while(u8::is_ascii_digit).count();
            let index = after[..digits].parse::<usize>().ok();
            match index {
                Some(index) if after[digits..].starts_with('}') => {
                    if !text.is_empty() {
                        pieces.push(Piece::Text(core::mem::take(&mut text)));
                    }
                    pieces.push(Piece::Operand(index));
                    rest = &after[digits + 1..];
                }
                _ => {
                    text.push('{');
                    rest = after;
                }
            }
        }
        text.push_str(rest);
        if !text.is_empty() {
            pieces.push(Piece::Text(text));
        }

        Self {
            source: String::from(source),
            pieces,
        }
    }

    /// Returns the template source text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Highest referenced operand index plus one.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.pieces
            .iter()
            .filter_map(|p| match p {
                Piece::Operand(i) => Some(i + 1),
                Piece::Text(_) => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Renders the template, appending each referenced operand in place.
    ///
    /// Operands referenced more than once are appended (and their
    /// parameters registered) once per reference, in text order.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::MissingOperand`] if the template references
    /// an operand that was not supplied.
    pub fn render(&self, operands: &[&FilterValue], buf: &mut SqlBuffer) -> Result<()> {
        if let Some(position) = (0..self.arity()).find(|i| *i >= operands.len()) {
            return Err(DialectError::MissingOperand {
                operation: self.source.clone(),
                position,
            });
        }
        for piece in &self.pieces {
            match piece {
                Piece::Text(text) => {
                    buf.append(text);
                }
                Piece::Operand(i) => {
                    buf.append_value(operands[*i]);
                }
            }
        }
        Ok(())
    }

    /// Substitutes plain names (identifiers, not values) for placeholders.
    ///
    /// Placeholders without a matching name are dropped.
    #[must_use]
    pub fn format_names(&self, names: &[&str]) -> String {
        let mut out = String::with_capacity(self.source.len());
        for piece in &self.pieces {
            match piece {
                Piece::Text(text) => out.push_str(text),
                Piece::Operand(i) => {
                    if let Some(name) = names.get(*i) {
                        out.push_str(name);
                    }
                }
            }
        }
        out
    }
}

impl From<&str> for SqlTemplate {
    fn from(source: &str) -> Self {
        Self::new(source)
    }
}

impl fmt::Display for SqlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
