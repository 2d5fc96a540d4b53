//! Portable column types and their per-dialect native names.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DialectError;

/// Database-agnostic column types, named after their JDBC counterparts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogicalType {
    /// Single bit.
    Bit,
    /// 1-byte integer.
    TinyInt,
    /// 2-byte integer.
    SmallInt,
    /// 4-byte integer.
    Integer,
    /// 8-byte integer.
    BigInt,
    /// Single-precision float.
    Real,
    /// Double-precision float.
    Double,
    /// Arbitrary-precision number.
    Numeric,
    /// Fixed-point decimal.
    Decimal,
    /// Fixed-length character string.
    Char,
    /// Variable-length character string.
    Varchar,
    /// Long character string.
    LongVarchar,
    /// Character large object.
    Clob,
    /// Fixed-length binary.
    Binary,
    /// Variable-length binary.
    Varbinary,
    /// Long binary.
    LongVarbinary,
    /// Binary large object.
    Blob,
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Date and time.
    Timestamp,
    /// Boolean.
    Boolean,
}

impl LogicalType {
    /// Number of logical types.
    pub const COUNT: usize = 21;

    /// All logical types, in declaration order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Bit,
        Self::TinyInt,
        Self::SmallInt,
        Self::Integer,
        Self::BigInt,
        Self::Real,
        Self::Double,
        Self::Numeric,
        Self::Decimal,
        Self::Char,
        Self::Varchar,
        Self::LongVarchar,
        Self::Clob,
        Self::Binary,
        Self::Varbinary,
        Self::LongVarbinary,
        Self::Blob,
        Self::Date,
        Self::Time,
        Self::Timestamp,
        Self::Boolean,
    ];

    /// The JDBC-style upper-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bit => "BIT",
            Self::TinyInt => "TINYINT",
            Self::SmallInt => "SMALLINT",
            Self::Integer => "INTEGER",
            Self::BigInt => "BIGINT",
            Self::Real => "REAL",
            Self::Double => "DOUBLE",
            Self::Numeric => "NUMERIC",
            Self::Decimal => "DECIMAL",
            Self::Char => "CHAR",
            Self::Varchar => "VARCHAR",
            Self::LongVarchar => "LONGVARCHAR",
            Self::Clob => "CLOB",
            Self::Binary => "BINARY",
            Self::Varbinary => "VARBINARY",
            Self::LongVarbinary => "LONGVARBINARY",
            Self::Blob => "BLOB",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Timestamp => "TIMESTAMP",
            Self::Boolean => "BOOLEAN",
        }
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogicalType {
    type Err = DialectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == upper)
            .ok_or_else(|| DialectError::TypeMismatch {
                expected: "logical type name",
                found: String::from(s),
            })
    }
}

/// Native type name for every [`LogicalType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeNames {
    names: [String; LogicalType::COUNT],
}

impl TypeNames {
    /// ANSI names: each logical type maps to its own name, except
    /// `LONGVARCHAR`/`LONGVARBINARY`, which have no standard spelling.
    #[must_use]
    pub fn ansi() -> Self {
        let names = LogicalType::ALL.map(|t| match t {
            LogicalType::LongVarchar => String::from("VARCHAR"),
            LogicalType::LongVarbinary => String::from("VARBINARY"),
            other => String::from(other.as_str()),
        });
        Self { names }
    }

    /// Returns the native name of `ty`.
    #[must_use]
    pub fn get(&self, ty: LogicalType) -> &str {
        &self.names[ty as usize]
    }

    /// Returns a copy with `ty` mapped to `name`.
    #[must_use]
    pub fn with(mut self, ty: LogicalType, name: &str) -> Self {
        self.names[ty as usize] = String::from(name);
        self
    }

    /// Iterates `(logical, native)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (LogicalType, &str)> {
        LogicalType::ALL
            .into_iter()
            .zip(self.names.iter().map(String::as_str))
    }
}

impl Default for TypeNames {
    fn default() -> Self {
        Self::ansi()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_logical_type() {
        assert_eq!("numeric".parse::<LogicalType>().unwrap(), LogicalType::Numeric);
        assert_eq!(
            "LONGVARBINARY".parse::<LogicalType>().unwrap(),
            LogicalType::LongVarbinary
        );
        assert!("GEOMETRY".parse::<LogicalType>().is_err());
    }

    #[test]
    fn test_ansi_names() {
        let names = TypeNames::ansi();
        assert_eq!(names.get(LogicalType::Integer), "INTEGER");
        assert_eq!(names.get(LogicalType::LongVarchar), "VARCHAR");
    }

    #[test]
    fn test_with_override() {
        let names = TypeNames::ansi().with(LogicalType::Bit, "SMALLINT");
        assert_eq!(names.get(LogicalType::Bit), "SMALLINT");
        assert_eq!(names.iter().count(), LogicalType::COUNT);
    }
}
