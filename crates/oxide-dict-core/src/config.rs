//! Construction-time dialect configuration.
//!
//! A [`DialectConfig`] lists overrides for a family's default capability
//! set. It is applied exactly once, while a dialect is built, and yields a
//! new [`Capabilities`] value; existing dialects are never modified.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::capabilities::{Capabilities, RangeStyle};
use crate::error::Result;
use crate::template::SqlTemplate;
use crate::types::LogicalType;

/// Optional overrides for a dialect's capability set.
///
/// Every field left as `None` keeps the family default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DialectConfig {
    /// Bound used when casting operands to a character type. Family
    /// templates that embed the bound (such as DB2 concatenation) are
    /// rebuilt from it.
    pub varchar_cast_length: Option<u32>,
    /// Native type name overrides.
    pub type_names: BTreeMap<LogicalType, String>,

    /// String length template over `{0}`.
    pub string_length_function: Option<String>,
    /// Concatenation template over `{0}` and `{1}`.
    pub concatenate_function: Option<String>,
    /// Leading trim template over `{0}`, with an optional trim character `{1}`.
    pub trim_leading_function: Option<String>,
    /// Trailing trim template.
    pub trim_trailing_function: Option<String>,
    /// Two-sided trim template.
    pub trim_both_function: Option<String>,
    /// Upper-case template.
    pub to_upper_case_function: Option<String>,
    /// Lower-case template.
    pub to_lower_case_function: Option<String>,
    /// Row locking clause appended to `SELECT`.
    pub for_update_clause: Option<String>,
    /// Keyword joining two tables without a condition.
    pub cross_join_clause: Option<String>,
    /// Column clause for database-assigned keys.
    pub auto_assign_clause: Option<String>,
    /// Query for the last generated key; `{0}` is the table, `{1}` the column.
    pub last_generated_key_query: Option<String>,
    /// How row ranges are rendered.
    pub range_style: Option<RangeStyle>,

    /// Whether `SELECT ... FOR UPDATE` is available.
    pub supports_select_for_update: Option<bool>,
    /// Whether locking is allowed with `DISTINCT`.
    pub supports_locking_with_distinct_clause: Option<bool>,
    /// Whether locking is allowed over several tables.
    pub supports_locking_with_multiple_tables: Option<bool>,
    /// Whether locking is allowed with `ORDER BY`.
    pub supports_locking_with_order_clause: Option<bool>,
    /// Whether locking is allowed with outer joins.
    pub supports_locking_with_outer_join: Option<bool>,
    /// Whether locking is allowed with inner joins.
    pub supports_locking_with_inner_join: Option<bool>,
    /// Whether locking is allowed with a row range.
    pub supports_locking_with_select_range: Option<bool>,
    /// Whether case conversion applies to LOB columns.
    pub supports_case_conversion_for_lob: Option<bool>,
    /// Whether metadata reads need auto-commit.
    pub requires_auto_commit_for_meta_data: Option<bool>,
    /// Whether subselects in `FROM` need an alias.
    pub requires_alias_for_subselect: Option<bool>,
    /// Whether database-assigned keys are supported.
    pub supports_auto_assign: Option<bool>,
    /// Whether a cross join needs a dummy `ON` condition.
    pub requires_condition_for_cross_join: Option<bool>,
    /// Whether a range may skip leading rows.
    pub supports_select_start_index: Option<bool>,
    /// Whether a range may cap the row count.
    pub supports_select_end_index: Option<bool>,
}

macro_rules! apply_overrides {
    ($caps:ident, $config:ident; templates: $($tpl:ident),*; values: $($val:ident),*) => {
        $(
            if let Some(source) = &$config.$tpl {
                $caps.$tpl = SqlTemplate::new(source);
            }
        )*
        $(
            if let Some(value) = &$config.$val {
                $caps.$val = value.clone();
            }
        )*
    };
}

impl DialectConfig {
    /// Parses a JSON configuration.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON or unknown keys.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            crate::error::DialectError::InvalidConfig(format!("{}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    /// Returns a copy with the cast bound set.
    #[must_use]
    pub fn with_varchar_cast_length(mut self, length: u32) -> Self {
        self.varchar_cast_length = Some(length);
        self
    }

    /// The cast bound to build family defaults with.
    #[must_use]
    pub fn cast_length_or(&self, default: u32) -> u32 {
        self.varchar_cast_length.unwrap_or(default)
    }

    /// Returns true if no override is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Applies the overrides to `defaults` and validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DialectError::InvalidConfig`] if the resulting
    /// capability set is unusable.
    pub fn apply(&self, defaults: Capabilities) -> Result<Capabilities> {
        let mut caps = defaults;
        if let Some(length) = self.varchar_cast_length {
            caps.varchar_cast_length = length;
        }
        for (ty, name) in &self.type_names {
            caps.type_names = caps.type_names.with(*ty, name);
        }
        let config = self;
        apply_overrides!(caps, config;
            templates:
                string_length_function,
                concatenate_function,
                trim_leading_function,
                trim_trailing_function,
                trim_both_function,
                to_upper_case_function,
                to_lower_case_function,
                last_generated_key_query;
            values:
                for_update_clause,
                cross_join_clause,
                auto_assign_clause,
                range_style,
                supports_select_for_update,
                supports_locking_with_distinct_clause,
                supports_locking_with_multiple_tables,
                supports_locking_with_order_clause,
                supports_locking_with_outer_join,
                supports_locking_with_inner_join,
                supports_locking_with_select_range,
                supports_case_conversion_for_lob,
                requires_auto_commit_for_meta_data,
                requires_alias_for_subselect,
                supports_auto_assign,
                requires_condition_for_cross_join,
                supports_select_start_index,
                supports_select_end_index
        );
        if !self.is_empty() {
            debug!(overrides = ?self, "applied dialect configuration overrides");
        }
        caps.validate()?;
        Ok(caps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::CapabilityLookup;
    use crate::error::DialectError;

    #[test]
    fn test_empty_config_keeps_defaults() {
        let config = DialectConfig::default();
        assert!(config.is_empty());
        assert_eq!(config.apply(Capabilities::ansi()).unwrap(), Capabilities::ansi());
    }

    #[test]
    fn test_from_json() {
        let config = DialectConfig::from_json(
            r#"{
                "varchar_cast_length": 255,
                "for_update_clause": "FOR UPDATE NOWAIT",
                "supports_locking_with_outer_join": false,
                "range_style": "limit_offset",
                "type_names": { "BOOLEAN": "SMALLINT" }
            }"#,
        )
        .unwrap();
        let caps = config.apply(Capabilities::ansi()).unwrap();
        assert_eq!(caps.varchar_cast_length, 255);
        assert_eq!(caps.for_update_clause, "FOR UPDATE NOWAIT");
        assert!(!caps.flag("supportsLockingWithOuterJoin").unwrap());
        assert_eq!(caps.range_style, RangeStyle::LimitOffset);
        assert_eq!(caps.type_names.get(LogicalType::Boolean), "SMALLINT");
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db2.json");
        std::fs::write(&path, r#"{ "requires_alias_for_subselect": false }"#).unwrap();
        let config = DialectConfig::from_file(&path).unwrap();
        assert_eq!(config.requires_alias_for_subselect, Some(false));

        let missing = dir.path().join("missing.json");
        assert!(matches!(
            DialectConfig::from_file(&missing),
            Err(DialectError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = DialectConfig::from_json(r#"{ "varchar_cast_len": 10 }"#).unwrap_err();
        assert!(matches!(err, DialectError::Config(_)));
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let config = DialectConfig {
            string_length_function: Some(String::from("LENGTH({0}, {2})")),
            ..DialectConfig::default()
        };
        assert!(matches!(
            config.apply(Capabilities::ansi()),
            Err(DialectError::InvalidConfig(_))
        ));
    }
}
