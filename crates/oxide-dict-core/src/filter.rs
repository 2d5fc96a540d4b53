//! Operands of SQL functions.
//!
//! A [`FilterValue`] is either a literal whose value is known while the SQL
//! is being generated, or an expression that has to be rendered in place.
//! Dialects branch on the variant to decide whether a literal can be inlined
//! (for example a numeric `SUBSTR` start position) or must be wrapped in a
//! cast.

use crate::buffer::SqlBuffer;
use crate::error::{DialectError, Result};
use crate::value::{SqlValue, ToSqlValue};

/// One operand of a SQL function call.
///
/// Built once per expression node for one statement and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// A scalar known at generation time; rendered inline.
    Literal(SqlValue),
    /// A sub-expression rendered as SQL.
    Expression(Expr),
}

/// A sub-expression that is not known until execution.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column reference, optionally table-qualified.
    Column {
        /// Optional table qualifier or alias.
        table: Option<String>,
        /// Column name.
        name: String,
    },
    /// A bound parameter.
    Param(SqlValue),
    /// An already-rendered nested fragment with its own parameters.
    Fragment(SqlBuffer),
}

impl FilterValue {
    /// Creates a literal operand.
    #[must_use]
    pub fn literal<T: ToSqlValue>(value: T) -> Self {
        Self::Literal(value.to_sql_value())
    }

    /// Creates an unqualified column operand.
    ///
    /// The name is rendered as given. Use [`Dialect::quote_identifier`] for
    /// names that are reserved words or not from trusted metadata.
    ///
    /// [`Dialect::quote_identifier`]: crate::dialect::Dialect::quote_identifier
    #[must_use]
    pub fn column(name: &str) -> Self {
        Self::Expression(Expr::Column {
            table: None,
            name: String::from(name),
        })
    }

    /// Creates a table-qualified column operand. Both parts are rendered
    /// as given.
    #[must_use]
    pub fn qualified(table: &str, name: &str) -> Self {
        Self::Expression(Expr::Column {
            table: Some(String::from(table)),
            name: String::from(name),
        })
    }

    /// Creates a bound-parameter operand.
    #[must_use]
    pub fn param<T: ToSqlValue>(value: T) -> Self {
        Self::Expression(Expr::Param(value.to_sql_value()))
    }

    /// Wraps a rendered fragment (for example the output of another dialect
    /// call) so it can be fed to an enclosing function.
    #[must_use]
    pub const fn fragment(buf: SqlBuffer) -> Self {
        Self::Expression(Expr::Fragment(buf))
    }

    /// Renders exactly one complete SQL expression into `buf`.
    ///
    /// Literals with no SQL spelling (NaN, infinities) are bound as
    /// parameters instead of inlined.
    pub fn append_to(&self, buf: &mut SqlBuffer) {
        match self {
            Self::Literal(value) if value.is_inlinable() => {
                buf.append(&value.to_sql_inline());
            }
            Self::Literal(value) => {
                buf.append_param(value.clone());
            }
            Self::Expression(Expr::Column { table, name }) => {
                if let Some(table) = table {
                    buf.append(table).append(".");
                }
                buf.append(name);
            }
            Self::Expression(Expr::Param(value)) => {
                buf.append_param(value.clone());
            }
            Self::Expression(Expr::Fragment(inner)) => {
                buf.append_buffer(inner);
            }
        }
    }

    /// Returns the statically known value, or `None` when the operand must
    /// be rendered as an expression.
    #[must_use]
    pub const fn value(&self) -> Option<&SqlValue> {
        match self {
            Self::Literal(value) => Some(value),
            Self::Expression(_) => None,
        }
    }

    /// Returns true for the literal variant.
    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }

    /// Returns true for a literal holding a number.
    #[must_use]
    pub const fn is_numeric_literal(&self) -> bool {
        matches!(self, Self::Literal(v) if v.is_number())
    }

    /// Coerces a literal to an integer for grammar positions that need a
    /// literal rather than a parameter.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::NotLiteral`] for expressions and
    /// [`DialectError::TypeMismatch`] for literals that are not integral.
    #[allow(
        clippy::float_cmp,
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss
    )]
    pub fn to_long(&self) -> Result<i64> {
        match self {
            Self::Literal(SqlValue::Int(n)) => Ok(*n),
            Self::Literal(SqlValue::Float(f))
                if f.is_finite()
                    && f.trunc() == *f
                    && *f >= i64::MIN as f64
                    && *f < i64::MAX as f64 =>
            {
                Ok(*f as i64)
            }
            Self::Literal(SqlValue::Float(f)) => Err(DialectError::TypeMismatch {
                expected: "integer",
                found: format!("float {f}"),
            }),
            Self::Literal(other) => Err(DialectError::TypeMismatch {
                expected: "integer",
                found: String::from(other.kind()),
            }),
            Self::Expression(_) => Err(DialectError::NotLiteral),
        }
    }
}

impl From<SqlValue> for FilterValue {
    fn from(value: SqlValue) -> Self {
        Self::Literal(value)
    }
}

impl From<SqlBuffer> for FilterValue {
    fn from(buf: SqlBuffer) -> Self {
        Self::fragment(buf)
    }
}
