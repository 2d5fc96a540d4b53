//! SQLite dialect.

use tracing::debug;

use super::{Dialect, append_range};
use crate::buffer::SqlBuffer;
use crate::capabilities::{Capabilities, RangeStyle};
use crate::config::DialectConfig;
use crate::error::Result;
use crate::filter::FilterValue;
use crate::template::SqlTemplate;
use crate::types::{LogicalType, TypeNames};

/// SQLite dialect.
///
/// SQLite stores values by type affinity, so the native type map collapses
/// to `INTEGER`, `REAL`, `TEXT` and `BLOB`. It has no row locking.
#[derive(Debug, Clone, PartialEq)]
pub struct SqliteDialect {
    capabilities: Capabilities,
}

impl SqliteDialect {
    /// Creates a new SQLite dialect.
    #[must_use]
    pub fn new() -> Self {
        Self {
            capabilities: Self::defaults(),
        }
    }

    /// Creates a SQLite dialect with configuration overrides applied.
    ///
    /// # Errors
    ///
    /// Fails if the overrides produce an invalid capability set.
    pub fn with_config(config: &DialectConfig) -> Result<Self> {
        let capabilities = config.apply(Self::defaults())?;
        debug!(dialect = "sqlite", "constructed dialect");
        Ok(Self { capabilities })
    }

    fn defaults() -> Capabilities {
        let ansi = Capabilities::ansi();
        let type_names = LogicalType::ALL
            .iter()
            .fold(TypeNames::ansi(), |names, ty| names.with(*ty, affinity(*ty)));
        Capabilities {
            type_names,
            string_length_function: SqlTemplate::new("LENGTH({0})"),
            trim_leading_function: SqlTemplate::new("LTRIM({0}, {1})"),
            trim_trailing_function: SqlTemplate::new("RTRIM({0}, {1})"),
            trim_both_function: SqlTemplate::new("TRIM({0}, {1})"),
            auto_assign_clause: String::from("AUTOINCREMENT"),
            last_generated_key_query: SqlTemplate::new("SELECT last_insert_rowid()"),
            range_style: RangeStyle::LimitOffset,
            supports_select_for_update: false,
            supports_locking_with_distinct_clause: false,
            supports_locking_with_multiple_tables: false,
            supports_locking_with_order_clause: false,
            supports_locking_with_outer_join: false,
            supports_locking_with_inner_join: false,
            supports_locking_with_select_range: false,
            supports_auto_assign: true,
            ..ansi
        }
    }
}

impl Default for SqliteDialect {
    fn default() -> Self {
        Self::new()
    }
}

const fn affinity(ty: LogicalType) -> &'static str {
    match ty {
        LogicalType::Bit
        | LogicalType::TinyInt
        | LogicalType::SmallInt
        | LogicalType::Integer
        | LogicalType::BigInt
        | LogicalType::Boolean => "INTEGER",
        LogicalType::Real | LogicalType::Double | LogicalType::Numeric | LogicalType::Decimal => {
            "REAL"
        }
        LogicalType::Char
        | LogicalType::Varchar
        | LogicalType::LongVarchar
        | LogicalType::Clob
        | LogicalType::Date
        | LogicalType::Time
        | LogicalType::Timestamp => "TEXT",
        LogicalType::Binary
        | LogicalType::Varbinary
        | LogicalType::LongVarbinary
        | LogicalType::Blob => "BLOB",
    }
}

fn instr(buf: &mut SqlBuffer, string: &FilterValue, find: &FilterValue, start: Option<&FilterValue>) {
    buf.append("INSTR(");
    if let Some(start) = start {
        buf.append("SUBSTR(")
            .append_value(string)
            .append(", ")
            .append_value(start)
            .append(")");
    } else {
        buf.append_value(string);
    }
    buf.append(", ").append_value(find).append(")");
}

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    fn substring(
        &self,
        buf: &mut SqlBuffer,
        string: &FilterValue,
        start: &FilterValue,
        length: Option<&FilterValue>,
    ) -> Result<()> {
        buf.append("SUBSTR(")
            .append_value(string)
            .append(", ")
            .append_value(start);
        if let Some(length) = length {
            buf.append(", ").append_value(length);
        }
        buf.append(")");
        Ok(())
    }

    fn index_of(
        &self,
        buf: &mut SqlBuffer,
        string: &FilterValue,
        find: &FilterValue,
        start: Option<&FilterValue>,
    ) -> Result<()> {
        let Some(start) = start else {
            instr(buf, string, find, None);
            return Ok(());
        };
        // INSTR reports 0 when absent; only shift real matches.
        buf.append("(CASE WHEN ");
        instr(buf, string, find, Some(start));
        buf.append(" > 0 THEN ");
        instr(buf, string, find, Some(start));
        buf.append(" - 1 + ").append_value(start).append(" ELSE 0 END)");
        Ok(())
    }

    fn select_range(&self, buf: &mut SqlBuffer, offset: u64, limit: Option<u64>) -> u64 {
        let style = self.capabilities().range_style;
        // A bare OFFSET is a syntax error; LIMIT -1 means unbounded.
        if style == RangeStyle::LimitOffset && limit.is_none() && offset > 0 {
            buf.append(&format!("LIMIT -1 OFFSET {offset}"));
            return 0;
        }
        append_range(style, buf, offset, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::LockRequest;
    use crate::dialect::{IsolationLevel, Operation, TrimSpec};

    fn render(op: Operation, operands: &[FilterValue]) -> SqlBuffer {
        let mut buf = SqlBuffer::new();
        SqliteDialect::new().generate(op, operands, &mut buf).unwrap();
        buf
    }

    #[test]
    fn test_sqlite_dialect() {
        let dialect = SqliteDialect::new();
        assert_eq!(dialect.name(), "sqlite");
        dialect.capabilities().validate().unwrap();
        assert!(dialect.for_update_clause(Some(IsolationLevel::Serializable)).is_none());
        assert_eq!(dialect.auto_assign_clause(), Some("AUTOINCREMENT"));
        assert_eq!(
            dialect.last_generated_key_query("t", "id").as_deref(),
            Some("SELECT last_insert_rowid()")
        );
    }

    #[test]
    fn test_type_affinity() {
        let dialect = SqliteDialect::new();
        assert_eq!(dialect.type_name(LogicalType::BigInt), "INTEGER");
        assert_eq!(dialect.type_name(LogicalType::Boolean), "INTEGER");
        assert_eq!(dialect.type_name(LogicalType::Decimal), "REAL");
        assert_eq!(dialect.type_name(LogicalType::Timestamp), "TEXT");
        assert_eq!(dialect.type_name(LogicalType::Varbinary), "BLOB");
    }

    #[test]
    fn test_substring_and_index_of() {
        assert_eq!(
            render(
                Operation::Substring,
                &[FilterValue::column("s"), FilterValue::param(2)]
            )
            .sql(),
            "SUBSTR(s, ?)"
        );
        assert_eq!(
            render(
                Operation::IndexOf,
                &[FilterValue::column("s"), FilterValue::literal("x")]
            )
            .sql(),
            "INSTR(s, 'x')"
        );
        let buf = render(
            Operation::IndexOf,
            &[
                FilterValue::column("s"),
                FilterValue::literal("x"),
                FilterValue::literal(3),
            ],
        );
        assert_eq!(
            buf.sql(),
            "(CASE WHEN INSTR(SUBSTR(s, 3), 'x') > 0 \
             THEN INSTR(SUBSTR(s, 3), 'x') - 1 + 3 ELSE 0 END)"
        );
    }

    #[test]
    fn test_trim_uses_char() {
        assert_eq!(
            render(
                Operation::Trim(TrimSpec::Leading),
                &[FilterValue::column("a"), FilterValue::literal("0")]
            )
            .sql(),
            "LTRIM(a, '0')"
        );
        assert_eq!(
            render(Operation::Trim(TrimSpec::Both), &[FilterValue::column("a")]).sql(),
            "TRIM(a, ' ')"
        );
    }

    #[test]
    fn test_select_range() {
        let dialect = SqliteDialect::new();
        let mut buf = SqlBuffer::new();
        assert_eq!(dialect.select_range(&mut buf, 5, Some(10)), 0);
        assert_eq!(buf.sql(), "LIMIT 10 OFFSET 5");

        let mut buf = SqlBuffer::new();
        dialect.select_range(&mut buf, 5, None);
        assert_eq!(buf.sql(), "LIMIT -1 OFFSET 5");

        let mut buf = SqlBuffer::new();
        dialect.select_range(&mut buf, 0, None);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_no_lock_support() {
        let caps = SqliteDialect::new().capabilities().clone();
        assert!(!caps.locking_conflicts(&LockRequest::default()).is_empty());
    }
}
