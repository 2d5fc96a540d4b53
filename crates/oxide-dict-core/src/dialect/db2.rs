//! IBM DB2 family dialects (DB2 and Apache Derby).
//!
//! # How the DB2 family differs from ANSI
//!
//! - **Uncast parameters**: string functions reject `?` (and many
//!   expressions) in argument positions unless they are cast to a concrete
//!   type. `LOCATE`, `SUBSTR` and concatenation therefore cast every string
//!   operand to `VARCHAR(n)`, where `n` is
//!   [`Capabilities::varchar_cast_length`] (1000 by default). Longer values
//!   are truncated silently; raise the bound through [`DialectConfig`].
//! - **Row locking**: `FOR UPDATE` is ignored below repeatable-read
//!   isolation, so the lock clause always carries `WITH RR`, whatever
//!   isolation the caller asked for.
//! - **Locking combinations**: locking is refused together with `DISTINCT`,
//!   multiple tables, `ORDER BY`, and inner or outer joins.
//! - **Cross joins**: `X CROSS JOIN Y` is not understood; the equivalent
//!   `X JOIN Y ON 1 = 1` is emitted instead.
//! - **Identity columns**: `GENERATED BY DEFAULT AS IDENTITY`, read back
//!   with `VALUES(IDENTITY_VAL_LOCAL())`.

use tracing::debug;

use super::Dialect;
use crate::buffer::SqlBuffer;
use crate::capabilities::{Capabilities, RangeStyle};
use crate::config::DialectConfig;
use crate::error::Result;
use crate::filter::FilterValue;
use crate::template::SqlTemplate;
use crate::types::LogicalType;

/// Default bound for `CAST(... AS VARCHAR(n))`.
pub const DEFAULT_VARCHAR_CAST_LENGTH: u32 = 1000;

/// Capability defaults shared by every DB2-family database.
#[must_use]
pub fn db2_family(varchar_cast_length: u32) -> Capabilities {
    let ansi = Capabilities::ansi();
    let type_names = ansi
        .type_names
        .clone()
        .with(LogicalType::Numeric, "DOUBLE")
        .with(LogicalType::Bit, "SMALLINT")
        .with(LogicalType::SmallInt, "SMALLINT")
        .with(LogicalType::TinyInt, "SMALLINT")
        .with(LogicalType::LongVarbinary, "BLOB")
        .with(LogicalType::Varbinary, "BLOB");

    Capabilities {
        type_names,
        string_length_function: SqlTemplate::new("LENGTH({0})"),
        concatenate_function: SqlTemplate::new(&format!(
            "(CAST({{0}} AS VARCHAR({varchar_cast_length})) || \
             CAST({{1}} AS VARCHAR({varchar_cast_length})))"
        )),
        trim_leading_function: SqlTemplate::new("LTRIM({0})"),
        trim_trailing_function: SqlTemplate::new("RTRIM({0})"),
        trim_both_function: SqlTemplate::new("LTRIM(RTRIM({0}))"),
        for_update_clause: String::from("FOR UPDATE WITH RR"),
        cross_join_clause: String::from("JOIN"),
        auto_assign_clause: String::from("GENERATED BY DEFAULT AS IDENTITY"),
        last_generated_key_query: SqlTemplate::new("VALUES(IDENTITY_VAL_LOCAL())"),
        varchar_cast_length,
        supports_locking_with_distinct_clause: false,
        supports_locking_with_multiple_tables: false,
        supports_locking_with_order_clause: false,
        supports_locking_with_outer_join: false,
        supports_locking_with_inner_join: false,
        supports_locking_with_select_range: true,
        supports_case_conversion_for_lob: true,
        requires_auto_commit_for_meta_data: true,
        requires_alias_for_subselect: true,
        supports_auto_assign: true,
        requires_condition_for_cross_join: true,
        ..ansi
    }
}

fn append_varchar_cast(buf: &mut SqlBuffer, value: &FilterValue, length: u32) {
    buf.append("CAST((")
        .append_value(value)
        .append(") AS VARCHAR(")
        .append(&length.to_string())
        .append("))");
}

fn append_integer_cast(buf: &mut SqlBuffer, value: &FilterValue) {
    buf.append("CAST((").append_value(value).append(") AS INTEGER)");
}

/// Numeric literals are inlined; anything else is cast to INTEGER.
fn append_integer_arg(buf: &mut SqlBuffer, value: &FilterValue, literal: Option<i64>) {
    match literal {
        Some(n) => {
            buf.append(&n.to_string());
        }
        None => append_integer_cast(buf, value),
    }
}

fn locate(
    caps: &Capabilities,
    buf: &mut SqlBuffer,
    string: &FilterValue,
    find: &FilterValue,
    start: Option<&FilterValue>,
) {
    let length = caps.varchar_cast_length;
    buf.append("LOCATE(");
    append_varchar_cast(buf, find, length);
    buf.append(", ");
    append_varchar_cast(buf, string, length);
    if let Some(start) = start {
        buf.append(", ");
        append_integer_cast(buf, start);
    }
    buf.append(")");
}

fn substr(
    caps: &Capabilities,
    buf: &mut SqlBuffer,
    string: &FilterValue,
    start: &FilterValue,
    length: Option<&FilterValue>,
) -> Result<()> {
    // Coerce before writing so a failed call leaves the buffer untouched.
    let start_literal = literal_long(start)?;
    let length_literal = length.map(literal_long).transpose()?.flatten();

    buf.append("SUBSTR(");
    append_varchar_cast(buf, string, caps.varchar_cast_length);
    buf.append(", ");
    append_integer_arg(buf, start, start_literal);
    if let Some(length) = length {
        buf.append(", ");
        append_integer_arg(buf, length, length_literal);
    }
    buf.append(")");
    Ok(())
}

fn literal_long(value: &FilterValue) -> Result<Option<i64>> {
    if value.is_numeric_literal() {
        value.to_long().map(Some)
    } else {
        Ok(None)
    }
}

macro_rules! db2_family_dialect {
    ($ty:ident, $name:literal) => {
        impl Dialect for $ty {
            fn name(&self) -> &'static str {
                $name
            }

            fn capabilities(&self) -> &Capabilities {
                &self.capabilities
            }

            fn index_of(
                &self,
                buf: &mut SqlBuffer,
                string: &FilterValue,
                find: &FilterValue,
                start: Option<&FilterValue>,
            ) -> Result<()> {
                locate(&self.capabilities, buf, string, find, start);
                Ok(())
            }

            fn substring(
                &self,
                buf: &mut SqlBuffer,
                string: &FilterValue,
                start: &FilterValue,
                length: Option<&FilterValue>,
            ) -> Result<()> {
                substr(&self.capabilities, buf, string, start, length)
            }
        }
    };
}

/// IBM DB2 (LUW, z/OS, iSeries).
///
/// DB2 can cap a result with `FETCH FIRST n ROWS ONLY` but cannot skip
/// leading rows, so [`Dialect::select_range`] fetches `offset + limit` rows
/// and reports `offset` rows for the caller to discard.
#[derive(Debug, Clone, PartialEq)]
pub struct Db2Dialect {
    capabilities: Capabilities,
}

impl Db2Dialect {
    /// Creates a DB2 dialect with family defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            capabilities: Self::defaults(DEFAULT_VARCHAR_CAST_LENGTH),
        }
    }

    /// Creates a DB2 dialect with configuration overrides applied.
    ///
    /// # Errors
    ///
    /// Fails if the overrides produce an invalid capability set.
    pub fn with_config(config: &DialectConfig) -> Result<Self> {
        let length = config.cast_length_or(DEFAULT_VARCHAR_CAST_LENGTH);
        let capabilities = config.apply(Self::defaults(length))?;
        debug!(
            dialect = "db2",
            varchar_cast_length = capabilities.varchar_cast_length,
            "constructed dialect"
        );
        Ok(Self { capabilities })
    }

    fn defaults(varchar_cast_length: u32) -> Capabilities {
        let family = db2_family(varchar_cast_length);
        Capabilities {
            type_names: family
                .type_names
                .clone()
                .with(LogicalType::LongVarchar, "LONG VARCHAR")
                .with(LogicalType::Boolean, "SMALLINT"),
            range_style: RangeStyle::FetchFirst,
            supports_select_start_index: false,
            ..family
        }
    }
}

impl Default for Db2Dialect {
    fn default() -> Self {
        Self::new()
    }
}

db2_family_dialect!(Db2Dialect, "db2");

/// Apache Derby, which follows DB2 syntax and adds
/// `OFFSET m ROWS FETCH NEXT n ROWS ONLY`.
#[derive(Debug, Clone, PartialEq)]
pub struct DerbyDialect {
    capabilities: Capabilities,
}

impl DerbyDialect {
    /// Creates a Derby dialect with family defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            capabilities: Self::defaults(DEFAULT_VARCHAR_CAST_LENGTH),
        }
    }

    /// Creates a Derby dialect with configuration overrides applied.
    ///
    /// # Errors
    ///
    /// Fails if the overrides produce an invalid capability set.
    pub fn with_config(config: &DialectConfig) -> Result<Self> {
        let length = config.cast_length_or(DEFAULT_VARCHAR_CAST_LENGTH);
        let capabilities = config.apply(Self::defaults(length))?;
        debug!(
            dialect = "derby",
            varchar_cast_length = capabilities.varchar_cast_length,
            "constructed dialect"
        );
        Ok(Self { capabilities })
    }

    fn defaults(varchar_cast_length: u32) -> Capabilities {
        let family = db2_family(varchar_cast_length);
        Capabilities {
            type_names: family
                .type_names
                .clone()
                .with(LogicalType::LongVarchar, "LONG VARCHAR"),
            range_style: RangeStyle::OffsetFetch,
            ..family
        }
    }
}

impl Default for DerbyDialect {
    fn default() -> Self {
        Self::new()
    }
}

db2_family_dialect!(DerbyDialect, "derby");
