//! Generic SQL dialect.

use tracing::debug;

use super::Dialect;
use crate::capabilities::Capabilities;
use crate::config::DialectConfig;
use crate::error::Result;

/// A generic SQL dialect using ANSI SQL standards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenericDialect {
    capabilities: Capabilities,
}

impl GenericDialect {
    /// Creates a new generic dialect with ANSI defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            capabilities: Capabilities::ansi(),
        }
    }

    /// Creates a generic dialect with configuration overrides applied.
    ///
    /// # Errors
    ///
    /// Fails if the overrides produce an invalid capability set.
    pub fn with_config(config: &DialectConfig) -> Result<Self> {
        let capabilities = config.apply(Capabilities::ansi())?;
        debug!(dialect = "generic", "constructed dialect");
        Ok(Self { capabilities })
    }
}

impl Dialect for GenericDialect {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::SqlBuffer;
    use crate::dialect::{IsolationLevel, Operation, TrimSpec};
    use crate::filter::FilterValue;
    use crate::types::LogicalType;

    fn render(op: Operation, operands: &[FilterValue]) -> SqlBuffer {
        let mut buf = SqlBuffer::new();
        GenericDialect::new()
            .generate(op, operands, &mut buf)
            .unwrap();
        buf
    }

    #[test]
    fn test_generic_dialect() {
        let dialect = GenericDialect::new();
        assert_eq!(dialect.name(), "generic");
        assert_eq!(
            dialect.for_update_clause(Some(IsolationLevel::ReadCommitted)),
            Some("FOR UPDATE")
        );
        assert_eq!(dialect.type_name(LogicalType::Numeric), "NUMERIC");
        assert!(dialect.auto_assign_clause().is_none());
        assert!(dialect.last_generated_key_query("t", "id").is_none());
    }

    #[test]
    fn test_substring() {
        let buf = render(
            Operation::Substring,
            &[
                FilterValue::column("name"),
                FilterValue::literal(2),
                FilterValue::param(3),
            ],
        );
        assert_eq!(buf.sql(), "SUBSTRING(name FROM 2 FOR ?)");
        assert_eq!(buf.params().len(), 1);
    }

    #[test]
    fn test_index_of_with_start() {
        let buf = render(
            Operation::IndexOf,
            &[
                FilterValue::column("s"),
                FilterValue::param("x"),
                FilterValue::param(4),
            ],
        );
        assert_eq!(
            buf.sql(),
            "(POSITION((?) IN (SUBSTRING(s FROM ?))) - 1 + ?)"
        );
        assert_eq!(buf.params().len(), 3);
    }

    #[test]
    fn test_concat_length_case() {
        assert_eq!(
            render(
                Operation::Concat,
                &[FilterValue::column("a"), FilterValue::literal("b")]
            )
            .sql(),
            "(a||'b')"
        );
        assert_eq!(
            render(Operation::StringLength, &[FilterValue::column("a")]).sql(),
            "CHAR_LENGTH(a)"
        );
        assert_eq!(
            render(Operation::ToUpperCase, &[FilterValue::column("a")]).sql(),
            "UPPER(a)"
        );
    }

    #[test]
    fn test_trim_default_char() {
        let buf = render(Operation::Trim(TrimSpec::Both), &[FilterValue::column("a")]);
        assert_eq!(buf.sql(), "TRIM(BOTH ' ' FROM a)");
        let buf = render(
            Operation::Trim(TrimSpec::Leading),
            &[FilterValue::column("a"), FilterValue::param("0")],
        );
        assert_eq!(buf.sql(), "TRIM(LEADING ? FROM a)");
    }

    #[test]
    fn test_cross_join_and_range() {
        let dialect = GenericDialect::new();
        let mut buf = SqlBuffer::new();
        dialect.cross_join(&mut buf, "a t0", "b t1");
        assert_eq!(buf.sql(), "a t0 CROSS JOIN b t1");

        let mut buf = SqlBuffer::new();
        assert_eq!(dialect.select_range(&mut buf, 20, Some(10)), 0);
        assert_eq!(buf.sql(), "OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY");
    }

    #[test]
    fn test_with_config() {
        let config = DialectConfig {
            for_update_clause: Some(String::from("FOR UPDATE SKIP LOCKED")),
            ..DialectConfig::default()
        };
        let dialect = GenericDialect::with_config(&config).unwrap();
        assert_eq!(dialect.for_update_clause(None), Some("FOR UPDATE SKIP LOCKED"));
    }

    #[test]
    fn test_quote_identifier() {
        let dialect = GenericDialect::new();
        assert_eq!(dialect.quote_identifier("order"), "\"order\"");
        assert_eq!(dialect.quote_identifier("a\"b"), "\"a\"\"b\"");
        let buf = render(
            Operation::StringLength,
            &[FilterValue::column(&dialect.quote_identifier("x\"); DROP"))],
        );
        assert_eq!(buf.sql(), "CHAR_LENGTH(\"x\"\"); DROP\")");
    }
}
