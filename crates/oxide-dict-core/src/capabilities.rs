//! Dialect capability sets.
//!
//! A [`Capabilities`] value describes what a database family supports:
//! native type names, SQL function templates, locking and join clauses,
//! generated-key support and cast limits. It is built once, when the
//! dialect is constructed, and only ever handed out by shared reference
//! afterwards, so concurrent readers need no synchronization. To "change"
//! a capability, build a new dialect from a new configuration.
//!
//! Query planners consult these values by name (see [`CapabilityLookup`])
//! before combining constructs such as row locking and outer joins. This
//! layer reports what is legal; it never rejects a combination itself.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::dialect::TrimSpec;
use crate::error::{DialectError, Result};
use crate::template::SqlTemplate;
use crate::types::TypeNames;

/// A capability value, borrowed from the capability set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityValue<'a> {
    /// Boolean support/requirement flag.
    Flag(bool),
    /// SQL clause or function template.
    Text(&'a str),
    /// Numeric limit.
    Number(u64),
}

impl CapabilityValue<'_> {
    /// Short name of the value kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Flag(_) => "flag",
            Self::Text(_) => "text",
            Self::Number(_) => "number",
        }
    }
}

impl fmt::Display for CapabilityValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(b) => write!(f, "{b}"),
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl<'a> From<&'a bool> for CapabilityValue<'a> {
    fn from(value: &'a bool) -> Self {
        Self::Flag(*value)
    }
}

impl<'a> From<&'a String> for CapabilityValue<'a> {
    fn from(value: &'a String) -> Self {
        Self::Text(value)
    }
}

impl<'a> From<&'a SqlTemplate> for CapabilityValue<'a> {
    fn from(value: &'a SqlTemplate) -> Self {
        Self::Text(value.as_str())
    }
}

impl<'a> From<&'a u32> for CapabilityValue<'a> {
    fn from(value: &'a u32) -> Self {
        Self::Number(u64::from(*value))
    }
}

impl<'a> From<&'a RangeStyle> for CapabilityValue<'a> {
    fn from(value: &'a RangeStyle) -> Self {
        Self::Text(value.as_str())
    }
}

/// Name-based capability queries.
///
/// Implemented by `#[derive(Capabilities)]`, which accepts both the
/// snake_case field name and its camelCase spelling
/// (`supports_locking_with_outer_join` / `supportsLockingWithOuterJoin`).
pub trait CapabilityLookup {
    /// Looks a capability up by name.
    fn capability(&self, name: &str) -> Option<CapabilityValue<'_>>;

    /// All capability names (snake_case), in declaration order.
    fn capability_names() -> &'static [&'static str]
    where
        Self: Sized;

    /// Looks up a boolean flag.
    ///
    /// # Errors
    ///
    /// Fails if the name is unknown or does not hold a flag.
    fn flag(&self, name: &str) -> Result<bool> {
        match self.capability(name) {
            Some(CapabilityValue::Flag(b)) => Ok(b),
            Some(other) => Err(mismatch(name, "flag", other)),
            None => Err(DialectError::UnknownCapability(String::from(name))),
        }
    }

    /// Looks up a clause or template.
    ///
    /// # Errors
    ///
    /// Fails if the name is unknown or does not hold text.
    fn text(&self, name: &str) -> Result<&str> {
        match self.capability(name) {
            Some(CapabilityValue::Text(s)) => Ok(s),
            Some(other) => Err(mismatch(name, "text", other)),
            None => Err(DialectError::UnknownCapability(String::from(name))),
        }
    }

    /// Looks up a numeric limit.
    ///
    /// # Errors
    ///
    /// Fails if the name is unknown or does not hold a number.
    fn number(&self, name: &str) -> Result<u64> {
        match self.capability(name) {
            Some(CapabilityValue::Number(n)) => Ok(n),
            Some(other) => Err(mismatch(name, "number", other)),
            None => Err(DialectError::UnknownCapability(String::from(name))),
        }
    }
}

fn mismatch(name: &str, requested: &'static str, actual: CapabilityValue<'_>) -> DialectError {
    DialectError::CapabilityType {
        name: String::from(name),
        requested,
        actual: actual.kind(),
    }
}

/// How a dialect expresses a row range (pagination).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeStyle {
    /// `LIMIT n OFFSET m`.
    LimitOffset,
    /// `OFFSET m ROWS FETCH NEXT n ROWS ONLY`.
    OffsetFetch,
    /// `FETCH FIRST n ROWS ONLY`; leading rows are skipped by the caller.
    FetchFirst,
}

impl RangeStyle {
    /// Configuration spelling of the style.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LimitOffset => "limit_offset",
            Self::OffsetFetch => "offset_fetch",
            Self::FetchFirst => "fetch_first",
        }
    }
}

/// The shape of a query that wants to lock the rows it selects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct LockRequest {
    /// `SELECT DISTINCT`.
    pub distinct: bool,
    /// More than one table in the FROM clause.
    pub multiple_tables: bool,
    /// ORDER BY present.
    pub order_by: bool,
    /// Outer join present.
    pub outer_join: bool,
    /// Inner join present.
    pub inner_join: bool,
    /// Row range (pagination) present.
    pub select_range: bool,
}

/// A query-shape feature that cannot be combined with row locking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockConflict {
    /// The dialect has no `FOR UPDATE` at all.
    SelectForUpdate,
    /// `DISTINCT` plus locking.
    Distinct,
    /// Multiple tables plus locking.
    MultipleTables,
    /// `ORDER BY` plus locking.
    OrderBy,
    /// Outer join plus locking.
    OuterJoin,
    /// Inner join plus locking.
    InnerJoin,
    /// Row range plus locking.
    SelectRange,
}

/// Capability set of one dialect.
///
/// Fields are public so family defaults can be written as plain struct
/// updates; once a dialect owns the value it is only reachable through
/// `&Capabilities`.
#[derive(Debug, Clone, PartialEq, oxide_dict_derive::Capabilities)]
#[allow(clippy::struct_excessive_bools)]
pub struct Capabilities {
    /// Native column type names.
    #[capability(skip)]
    pub type_names: TypeNames,

    /// `LENGTH({0})`-style template.
    pub string_length_function: SqlTemplate,
    /// Two-operand concatenation template.
    pub concatenate_function: SqlTemplate,
    /// Leading trim; `{1}` is the trim character when the dialect supports one.
    pub trim_leading_function: SqlTemplate,
    /// Trailing trim.
    pub trim_trailing_function: SqlTemplate,
    /// Two-sided trim.
    pub trim_both_function: SqlTemplate,
    /// Upper-case conversion.
    pub to_upper_case_function: SqlTemplate,
    /// Lower-case conversion.
    pub to_lower_case_function: SqlTemplate,

    /// Row-locking clause appended to a SELECT.
    pub for_update_clause: String,
    /// Keyword joining two tables in a cross join.
    pub cross_join_clause: String,
    /// DDL fragment making a column an identity column.
    pub auto_assign_clause: String,
    /// Query returning the last generated key; `{0}` table, `{1}` column.
    pub last_generated_key_query: SqlTemplate,
    /// Pagination syntax.
    pub range_style: RangeStyle,

    /// Length used when casting operands to a bounded character type.
    pub varchar_cast_length: u32,

    /// Whether `FOR UPDATE` exists at all.
    pub supports_select_for_update: bool,
    /// Locking composes with `DISTINCT`.
    pub supports_locking_with_distinct_clause: bool,
    /// Locking composes with multi-table selects.
    pub supports_locking_with_multiple_tables: bool,
    /// Locking composes with `ORDER BY`.
    pub supports_locking_with_order_clause: bool,
    /// Locking composes with outer joins.
    pub supports_locking_with_outer_join: bool,
    /// Locking composes with inner joins.
    pub supports_locking_with_inner_join: bool,
    /// Locking composes with row-range selection.
    pub supports_locking_with_select_range: bool,
    /// `UPPER`/`LOWER` accept LOB columns.
    pub supports_case_conversion_for_lob: bool,
    /// Metadata calls need an auto-commit connection.
    pub requires_auto_commit_for_meta_data: bool,
    /// Subselects in FROM need an alias.
    pub requires_alias_for_subselect: bool,
    /// Identity columns are supported.
    pub supports_auto_assign: bool,
    /// Cross joins need an always-true `ON` condition.
    pub requires_condition_for_cross_join: bool,
    /// Range selection can skip leading rows.
    pub supports_select_start_index: bool,
    /// Range selection can cap the row count.
    pub supports_select_end_index: bool,
}

impl Capabilities {
    /// ANSI defaults shared by every family.
    #[must_use]
    pub fn ansi() -> Self {
        Self {
            type_names: TypeNames::ansi(),
            string_length_function: SqlTemplate::new("CHAR_LENGTH({0})"),
            concatenate_function: SqlTemplate::new("({0}||{1})"),
            trim_leading_function: SqlTemplate::new(TrimSpec::Leading.ansi_template()),
            trim_trailing_function: SqlTemplate::new(TrimSpec::Trailing.ansi_template()),
            trim_both_function: SqlTemplate::new(TrimSpec::Both.ansi_template()),
            to_upper_case_function: SqlTemplate::new("UPPER({0})"),
            to_lower_case_function: SqlTemplate::new("LOWER({0})"),
            for_update_clause: String::from("FOR UPDATE"),
            cross_join_clause: String::from("CROSS JOIN"),
            auto_assign_clause: String::new(),
            last_generated_key_query: SqlTemplate::new(""),
            range_style: RangeStyle::OffsetFetch,
            varchar_cast_length: 1000,
            supports_select_for_update: true,
            supports_locking_with_distinct_clause: true,
            supports_locking_with_multiple_tables: true,
            supports_locking_with_order_clause: true,
            supports_locking_with_outer_join: true,
            supports_locking_with_inner_join: true,
            supports_locking_with_select_range: true,
            supports_case_conversion_for_lob: false,
            requires_auto_commit_for_meta_data: false,
            requires_alias_for_subselect: false,
            supports_auto_assign: false,
            requires_condition_for_cross_join: false,
            supports_select_start_index: true,
            supports_select_end_index: true,
        }
    }

    /// Lists every feature of `request` that cannot be combined with row
    /// locking. An empty list means the lock clause may be appended.
    #[must_use]
    pub fn locking_conflicts(&self, request: &LockRequest) -> Vec<LockConflict> {
        if !self.supports_select_for_update {
            return vec![LockConflict::SelectForUpdate];
        }
        [
            (
                request.distinct && !self.supports_locking_with_distinct_clause,
                LockConflict::Distinct,
            ),
            (
                request.multiple_tables && !self.supports_locking_with_multiple_tables,
                LockConflict::MultipleTables,
            ),
            (
                request.order_by && !self.supports_locking_with_order_clause,
                LockConflict::OrderBy,
            ),
            (
                request.outer_join && !self.supports_locking_with_outer_join,
                LockConflict::OuterJoin,
            ),
            (
                request.inner_join && !self.supports_locking_with_inner_join,
                LockConflict::InnerJoin,
            ),
            (
                request.select_range && !self.supports_locking_with_select_range,
                LockConflict::SelectRange,
            ),
        ]
        .into_iter()
        .filter_map(|(conflict, kind)| conflict.then_some(kind))
        .collect()
    }

    /// Checks that templates only reference operands their operation
    /// supplies and that limits are usable.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::InvalidConfig`] naming the first bad entry.
    pub fn validate(&self) -> Result<()> {
        let templates = [
            ("string_length_function", &self.string_length_function, 1),
            ("concatenate_function", &self.concatenate_function, 2),
            ("trim_leading_function", &self.trim_leading_function, 2),
            ("trim_trailing_function", &self.trim_trailing_function, 2),
            ("trim_both_function", &self.trim_both_function, 2),
            ("to_upper_case_function", &self.to_upper_case_function, 1),
            ("to_lower_case_function", &self.to_lower_case_function, 1),
            ("last_generated_key_query", &self.last_generated_key_query, 2),
        ];
        for (name, template, max) in templates {
            if template.arity() > max {
                return Err(DialectError::InvalidConfig(format!(
                    "{name} references operand {{{}}} but at most {max} are supplied",
                    template.arity() - 1
                )));
            }
        }
        if self.varchar_cast_length == 0 {
            return Err(DialectError::InvalidConfig(String::from(
                "varchar_cast_length must be greater than zero",
            )));
        }
        if self.supports_auto_assign && self.auto_assign_clause.is_empty() {
            return Err(DialectError::InvalidConfig(String::from(
                "supports_auto_assign requires an auto_assign_clause",
            )));
        }
        Ok(())
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::ansi()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ansi_is_valid() {
        Capabilities::ansi().validate().unwrap();
    }

    #[test]
    fn test_lookup_by_snake_and_camel_case() {
        let caps = Capabilities::ansi();
        assert_eq!(
            caps.capability("supports_locking_with_outer_join"),
            Some(CapabilityValue::Flag(true))
        );
        assert_eq!(
            caps.capability("supportsLockingWithOuterJoin"),
            Some(CapabilityValue::Flag(true))
        );
        assert_eq!(caps.text("forUpdateClause").unwrap(), "FOR UPDATE");
        assert_eq!(caps.number("varcharCastLength").unwrap(), 1000);
        assert_eq!(caps.text("range_style").unwrap(), "offset_fetch");
    }

    #[test]
    fn test_lookup_errors() {
        let caps = Capabilities::ansi();
        assert!(matches!(
            caps.flag("supportsTimeTravel"),
            Err(DialectError::UnknownCapability(_))
        ));
        assert!(matches!(
            caps.flag("for_update_clause"),
            Err(DialectError::CapabilityType {
                requested: "flag",
                actual: "text",
                ..
            })
        ));
        // Type names are not exposed through the name lookup.
        assert!(caps.capability("type_names").is_none());
    }

    #[test]
    fn test_capability_names() {
        let names = Capabilities::capability_names();
        assert_eq!(names[0], "string_length_function");
        assert!(names.contains(&"requires_condition_for_cross_join"));
        assert!(!names.contains(&"type_names"));
        let caps = Capabilities::ansi();
        assert!(names.iter().all(|n| caps.capability(n).is_some()));
    }

    #[test]
    fn test_locking_conflicts() {
        let caps = Capabilities {
            supports_locking_with_outer_join: false,
            supports_locking_with_order_clause: false,
            ..Capabilities::ansi()
        };
        let request = LockRequest {
            outer_join: true,
            order_by: true,
            inner_join: true,
            ..LockRequest::default()
        };
        assert_eq!(
            caps.locking_conflicts(&request),
            vec![LockConflict::OrderBy, LockConflict::OuterJoin]
        );
        assert!(caps.locking_conflicts(&LockRequest::default()).is_empty());
    }

    #[test]
    fn test_no_select_for_update() {
        let caps = Capabilities {
            supports_select_for_update: false,
            ..Capabilities::ansi()
        };
        assert_eq!(
            caps.locking_conflicts(&LockRequest::default()),
            vec![LockConflict::SelectForUpdate]
        );
    }

    #[test]
    fn test_validate_rejects_bad_template() {
        let caps = Capabilities {
            string_length_function: SqlTemplate::new("LENGTH({0}, {1})"),
            ..Capabilities::ansi()
        };
        assert!(matches!(caps.validate(), Err(DialectError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_zero_cast_length() {
        let caps = Capabilities {
            varchar_cast_length: 0,
            ..Capabilities::ansi()
        };
        assert!(caps.validate().is_err());
    }
}
