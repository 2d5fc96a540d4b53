//! SQL dialect support.
//!
//! Different databases disagree on function names, argument typing, locking
//! and join syntax. A [`Dialect`] turns portable operations into SQL text for
//! one database family, reading everything family-specific from its
//! [`Capabilities`].
//!
//! A dialect holds no per-query state. One instance (usually behind an
//! `Arc<dyn Dialect>`) serves every statement built against a connection
//! pool, concurrently; operands and the target [`SqlBuffer`] always arrive
//! as parameters.

mod db2;
mod generic;
mod sqlite;

pub use db2::{DEFAULT_VARCHAR_CAST_LENGTH, Db2Dialect, DerbyDialect, db2_family};
pub use generic::GenericDialect;
pub use sqlite::SqliteDialect;

use core::fmt;
use core::str::FromStr;

use tracing::trace;

use crate::buffer::SqlBuffer;
use crate::capabilities::{Capabilities, RangeStyle};
use crate::error::{DialectError, Result};
use crate::filter::FilterValue;
use crate::template::SqlTemplate;
use crate::types::LogicalType;

/// Which side(s) of a string to trim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimSpec {
    /// Leading characters only.
    Leading,
    /// Trailing characters only.
    Trailing,
    /// Both sides.
    Both,
}

impl TrimSpec {
    /// `TRIM(LEADING|TRAILING|BOTH {1} FROM {0})`, accepted by every ANSI database.
    #[must_use]
    pub const fn ansi_template(self) -> &'static str {
        match self {
            Self::Leading => "TRIM(LEADING {1} FROM {0})",
            Self::Trailing => "TRIM(TRAILING {1} FROM {0})",
            Self::Both => "TRIM(BOTH {1} FROM {0})",
        }
    }
}

impl fmt::Display for TrimSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Leading => "leading",
            Self::Trailing => "trailing",
            Self::Both => "both",
        })
    }
}

/// Requested transaction isolation for a locking read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsolationLevel {
    /// Read uncommitted.
    ReadUncommitted,
    /// Read committed.
    ReadCommitted,
    /// Repeatable read.
    RepeatableRead,
    /// Serializable.
    Serializable,
}

/// A portable SQL function a dialect can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `substring(str, start[, length])`, 1-based start.
    Substring,
    /// `indexOf(str, find[, start])`, 1-based position, 0 if absent.
    IndexOf,
    /// `concat(a, b)`.
    Concat,
    /// `length(str)`.
    StringLength,
    /// `trim(str[, char])`.
    Trim(TrimSpec),
    /// `upper(str)`.
    ToUpperCase,
    /// `lower(str)`.
    ToLowerCase,
}

impl Operation {
    /// Operation name as used in errors and on the command line.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Substring => "substring",
            Self::IndexOf => "indexOf",
            Self::Concat => "concat",
            Self::StringLength => "length",
            Self::Trim(TrimSpec::Leading) => "ltrim",
            Self::Trim(TrimSpec::Trailing) => "rtrim",
            Self::Trim(TrimSpec::Both) => "trim",
            Self::ToUpperCase => "upper",
            Self::ToLowerCase => "lower",
        }
    }

    /// Accepted operand count, `(min, max)`.
    #[must_use]
    pub const fn arity(&self) -> (usize, usize) {
        match self {
            Self::Substring | Self::IndexOf => (2, 3),
            Self::Concat => (2, 2),
            Self::Trim(_) => (1, 2),
            Self::StringLength | Self::ToUpperCase | Self::ToLowerCase => (1, 1),
        }
    }

    fn check_arity(self, found: usize) -> Result<()> {
        let (min, max) = self.arity();
        if (min..=max).contains(&found) {
            Ok(())
        } else {
            Err(DialectError::Arity {
                operation: self.name(),
                min,
                max,
                found,
            })
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = DialectError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "substring" | "substr" => Ok(Self::Substring),
            "indexof" | "index_of" | "locate" => Ok(Self::IndexOf),
            "concat" | "concatenate" => Ok(Self::Concat),
            "length" | "string_length" => Ok(Self::StringLength),
            "trim" => Ok(Self::Trim(TrimSpec::Both)),
            "ltrim" => Ok(Self::Trim(TrimSpec::Leading)),
            "rtrim" => Ok(Self::Trim(TrimSpec::Trailing)),
            "upper" | "to_upper_case" => Ok(Self::ToUpperCase),
            "lower" | "to_lower_case" => Ok(Self::ToLowerCase),
            _ => Err(DialectError::UnknownOperation(String::from(s))),
        }
    }
}

/// Trait for SQL dialect-specific behavior.
///
/// Default methods implement ANSI SQL driven by [`Dialect::capabilities`];
/// a family overrides only the operations whose syntax or typing rules
/// differ.
pub trait Dialect: fmt::Debug + Send + Sync {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the capability set fixed at construction.
    fn capabilities(&self) -> &Capabilities;

    /// Returns the identifier quote character.
    fn identifier_quote(&self) -> char {
        '"'
    }

    /// Quotes an identifier, doubling any embedded quote character.
    ///
    /// Column operands are emitted verbatim; names that do not come from
    /// trusted mapping metadata should pass through here first.
    fn quote_identifier(&self, name: &str) -> String {
        let quote = self.identifier_quote();
        let escaped = name.replace(quote, &format!("{quote}{quote}"));
        format!("{quote}{escaped}{quote}")
    }

    /// Renders `operation` over `operands` into `buf`.
    ///
    /// Optional trailing operands (substring length, indexOf start, trim
    /// character) are simply left out of the slice.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::Arity`] when the operand count does not fit
    /// the operation, or any error of the operation itself.
    fn generate(
        &self,
        operation: Operation,
        operands: &[FilterValue],
        buf: &mut SqlBuffer,
    ) -> Result<()> {
        operation.check_arity(operands.len())?;
        trace!(dialect = self.name(), %operation, operands = operands.len(), "generating");
        let opt = |i: usize| operands.get(i);
        match operation {
            Operation::Substring => self.substring(buf, &operands[0], &operands[1], opt(2)),
            Operation::IndexOf => self.index_of(buf, &operands[0], &operands[1], opt(2)),
            Operation::Concat => self.concat(buf, &operands[0], &operands[1]),
            Operation::StringLength => self.string_length(buf, &operands[0]),
            Operation::Trim(spec) => self.trim(buf, &operands[0], opt(1), spec),
            Operation::ToUpperCase => self.to_upper_case(buf, &operands[0]),
            Operation::ToLowerCase => self.to_lower_case(buf, &operands[0]),
        }
    }

    /// Substring extraction, `start` 1-based.
    ///
    /// # Errors
    ///
    /// Propagates literal coercion failures in dialects that inline.
    fn substring(
        &self,
        buf: &mut SqlBuffer,
        string: &FilterValue,
        start: &FilterValue,
        length: Option<&FilterValue>,
    ) -> Result<()> {
        buf.append("SUBSTRING(")
            .append_value(string)
            .append(" FROM ")
            .append_value(start);
        if let Some(length) = length {
            buf.append(" FOR ").append_value(length);
        }
        buf.append(")");
        Ok(())
    }

    /// Position of `find` in `string`, searching from `start` when given.
    ///
    /// # Errors
    ///
    /// Propagates failures of nested operations.
    fn index_of(
        &self,
        buf: &mut SqlBuffer,
        string: &FilterValue,
        find: &FilterValue,
        start: Option<&FilterValue>,
    ) -> Result<()> {
        buf.append("(POSITION((").append_value(find).append(") IN (");
        if let Some(start) = start {
            self.substring(buf, string, start, None)?;
        } else {
            buf.append_value(string);
        }
        buf.append("))");
        if let Some(start) = start {
            buf.append(" - 1 + ").append_value(start);
        }
        buf.append(")");
        Ok(())
    }

    /// String concatenation.
    ///
    /// # Errors
    ///
    /// Fails if the configured template references missing operands.
    fn concat(&self, buf: &mut SqlBuffer, left: &FilterValue, right: &FilterValue) -> Result<()> {
        self.capabilities()
            .concatenate_function
            .render(&[left, right], buf)
    }

    /// Character length.
    ///
    /// # Errors
    ///
    /// Fails if the configured template references missing operands.
    fn string_length(&self, buf: &mut SqlBuffer, string: &FilterValue) -> Result<()> {
        self.capabilities().string_length_function.render(&[string], buf)
    }

    /// Trims `trim_char` (default: a space) from one or both sides.
    ///
    /// Templates that only reference `{0}` can only strip blanks. For any
    /// other trim character the ANSI `TRIM(... FROM ...)` form is emitted
    /// instead.
    ///
    /// # Errors
    ///
    /// Fails if the configured template references missing operands.
    fn trim(
        &self,
        buf: &mut SqlBuffer,
        string: &FilterValue,
        trim_char: Option<&FilterValue>,
        spec: TrimSpec,
    ) -> Result<()> {
        let caps = self.capabilities();
        let template: &SqlTemplate = match spec {
            TrimSpec::Leading => &caps.trim_leading_function,
            TrimSpec::Trailing => &caps.trim_trailing_function,
            TrimSpec::Both => &caps.trim_both_function,
        };
        let space = FilterValue::literal(" ");
        let trim_char = trim_char.unwrap_or(&space);
        if template.arity() < 2 && trim_char != &space {
            trace!(dialect = self.name(), %spec, "trim character needs ANSI TRIM");
            return SqlTemplate::new(spec.ansi_template()).render(&[string, trim_char], buf);
        }
        template.render(&[string, trim_char], buf)
    }

    /// Upper-case conversion.
    ///
    /// # Errors
    ///
    /// Fails if the configured template references missing operands.
    fn to_upper_case(&self, buf: &mut SqlBuffer, string: &FilterValue) -> Result<()> {
        self.capabilities().to_upper_case_function.render(&[string], buf)
    }

    /// Lower-case conversion.
    ///
    /// # Errors
    ///
    /// Fails if the configured template references missing operands.
    fn to_lower_case(&self, buf: &mut SqlBuffer, string: &FilterValue) -> Result<()> {
        self.capabilities().to_lower_case_function.render(&[string], buf)
    }

    /// Row-locking clause for a SELECT, or `None` when the dialect cannot
    /// lock rows. Planners must check [`Capabilities::locking_conflicts`]
    /// before appending it.
    fn for_update_clause(&self, _isolation: Option<IsolationLevel>) -> Option<&str> {
        let caps = self.capabilities();
        caps.supports_select_for_update
            .then_some(caps.for_update_clause.as_str())
    }

    /// Appends `left <cross join> right`, adding `ON 1 = 1` for dialects
    /// that require a join condition.
    fn cross_join(&self, buf: &mut SqlBuffer, left: &str, right: &str) {
        let caps = self.capabilities();
        buf.append(left)
            .append(" ")
            .append(&caps.cross_join_clause)
            .append(" ")
            .append(right);
        if caps.requires_condition_for_cross_join {
            buf.append(" ON 1 = 1");
        }
    }

    /// Appends the row-range clause for `offset` leading rows skipped and at
    /// most `limit` rows returned.
    ///
    /// Returns how many leading rows the caller still has to skip itself,
    /// which is non-zero only for dialects without start-index support.
    fn select_range(&self, buf: &mut SqlBuffer, offset: u64, limit: Option<u64>) -> u64 {
        append_range(self.capabilities().range_style, buf, offset, limit)
    }

    /// Native column type for a logical type.
    fn type_name(&self, ty: LogicalType) -> &str {
        self.capabilities().type_names.get(ty)
    }

    /// DDL fragment for identity columns, if supported.
    fn auto_assign_clause(&self) -> Option<&str> {
        let caps = self.capabilities();
        caps.supports_auto_assign
            .then_some(caps.auto_assign_clause.as_str())
    }

    /// Query returning the key generated by the last insert into
    /// `table.column`, if supported.
    fn last_generated_key_query(&self, table: &str, column: &str) -> Option<String> {
        let caps = self.capabilities();
        if !caps.supports_auto_assign || caps.last_generated_key_query.as_str().is_empty() {
            return None;
        }
        Some(caps.last_generated_key_query.format_names(&[table, column]))
    }
}

/// Renders a row range in `style`, returning the rows left for the caller
/// to skip.
pub(crate) fn append_range(
    style: RangeStyle,
    buf: &mut SqlBuffer,
    offset: u64,
    limit: Option<u64>,
) -> u64 {
    match style {
        RangeStyle::LimitOffset => {
            let mut parts = Vec::new();
            if let Some(limit) = limit {
                parts.push(format!("LIMIT {limit}"));
            }
            if offset > 0 {
                parts.push(format!("OFFSET {offset}"));
            }
            buf.append(&parts.join(" "));
            0
        }
        RangeStyle::OffsetFetch => {
            let mut parts = Vec::new();
            if offset > 0 {
                parts.push(format!("OFFSET {offset} ROWS"));
            }
            if let Some(limit) = limit {
                parts.push(format!("FETCH NEXT {limit} ROWS ONLY"));
            }
            buf.append(&parts.join(" "));
            0
        }
        RangeStyle::FetchFirst => {
            if let Some(limit) = limit {
                let end = offset.saturating_add(limit);
                buf.append(&format!("FETCH FIRST {end} ROWS ONLY"));
            }
            offset
        }
    }
}
