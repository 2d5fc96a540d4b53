//! SQL fragment accumulation.
//!
//! [`SqlBuffer`] collects SQL text and the parameters bound to its `?`
//! placeholders. Each placeholder is written in the same call that records
//! its parameter, so the Nth `?` emitted through the buffer always pairs
//! with the Nth entry of [`SqlBuffer::params`].

use core::fmt;

use crate::filter::FilterValue;
use crate::value::{SqlValue, ToSqlValue};

/// Append-only SQL text plus ordered bound parameters.
///
/// One buffer belongs to one statement being built; it is never shared
/// between statements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlBuffer {
    sql: String,
    params: Vec<SqlValue>,
    placeholders: usize,
}

impl SqlBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sql: String::new(),
            params: Vec::new(),
            placeholders: 0,
        }
    }

    /// Appends raw SQL text.
    ///
    /// **Warning**: Only use this for SQL produced by the dialect itself,
    /// never for user input.
    pub fn append(&mut self, text: &str) -> &mut Self {
        self.sql.push_str(text);
        self
    }

    /// Appends the rendering of an operand.
    pub fn append_value(&mut self, value: &FilterValue) -> &mut Self {
        value.append_to(self);
        self
    }

    /// Appends a `?` placeholder bound to `value`.
    pub fn append_param<T: ToSqlValue>(&mut self, value: T) -> &mut Self {
        self.sql.push_str(SqlValue::placeholder());
        self.params.push(value.to_sql_value());
        self.placeholders += 1;
        self
    }

    /// Appends a nested fragment, carrying over its parameters in order.
    pub fn append_buffer(&mut self, other: &Self) -> &mut Self {
        self.sql.push_str(&other.sql);
        self.params.extend(other.params.iter().cloned());
        self.placeholders += other.placeholders;
        self
    }

    /// Returns the SQL text.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Returns the bound parameters.
    #[must_use]
    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }

    /// Number of placeholders written through [`Self::append_param`].
    #[must_use]
    pub const fn placeholder_count(&self) -> usize {
        self.placeholders
    }

    /// Returns true if nothing has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty() && self.params.is_empty()
    }

    /// Consumes the buffer and returns the SQL and parameters.
    #[must_use]
    pub fn build(self) -> (String, Vec<SqlValue>) {
        (self.sql, self.params)
    }
}

impl fmt::Display for SqlBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fluent_append() {
        let mut buf = SqlBuffer::new();
        buf.append("SELECT ").append("1");
        assert_eq!(buf.sql(), "SELECT 1");
        assert!(buf.params().is_empty());
    }

    #[test]
    fn test_param_keeps_position() {
        let mut buf = SqlBuffer::new();
        buf.append("a = ")
            .append_param("x")
            .append(" AND b = ")
            .append_param(2_i32);
        assert_eq!(buf.sql(), "a = ? AND b = ?");
        assert_eq!(
            buf.params(),
            &[SqlValue::Text(String::from("x")), SqlValue::Int(2)]
        );
        assert_eq!(buf.placeholder_count(), 2);
    }

    #[test]
    fn test_nested_buffer() {
        let mut inner = SqlBuffer::new();
        inner.append("UPPER(").append_param("n").append(")");

        let mut outer = SqlBuffer::new();
        outer.append_param(1_i32).append(" + ").append_buffer(&inner);
        assert_eq!(outer.sql(), "? + UPPER(?)");
        assert_eq!(
            outer.params(),
            &[SqlValue::Int(1), SqlValue::Text(String::from("n"))]
        );
        assert_eq!(outer.placeholder_count(), 2);
    }

    #[test]
    fn test_build_and_display() {
        let mut buf = SqlBuffer::new();
        assert!(buf.is_empty());
        buf.append("x = ").append_param(true);
        assert_eq!(buf.to_string(), "x = ?");
        let (sql, params) = buf.build();
        assert_eq!(sql, "x = ?");
        assert_eq!(params, vec![SqlValue::Bool(true)]);
    }
}
