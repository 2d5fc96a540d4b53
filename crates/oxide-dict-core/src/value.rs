//! Scalar SQL values.
//!
//! A [`SqlValue`] is either bound as a statement parameter or, when the
//! dialect decides a literal is safe to inline, rendered through
//! [`SqlValue::to_sql_inline`].

use core::fmt;

/// A scalar value that can be bound as a parameter or inlined as a literal.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Binary blob value.
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Returns the SQL representation for inline use (escaped).
    ///
    /// Text is quoted with single quotes doubled, so user input can never
    /// terminate the literal early.
    #[must_use]
    pub fn to_sql_inline(&self) -> String {
        match self {
            Self::Null => String::from("NULL"),
            Self::Bool(true) => String::from("TRUE"),
            Self::Bool(false) => String::from("FALSE"),
            Self::Int(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => {
                let escaped = s.replace('\'', "''");
                format!("'{escaped}'")
            }
            Self::Blob(b) => {
                let hex: String = b.iter().map(|byte| format!("{byte:02X}")).collect();
                format!("X'{hex}'")
            }
        }
    }

    /// Returns false for values with no SQL literal form (NaN and the
    /// infinities); those have to be bound as parameters.
    #[must_use]
    pub const fn is_inlinable(&self) -> bool {
        !matches!(self, Self::Float(f) if !f.is_finite())
    }

    /// Returns true for `Int` and `Float`.
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_))
    }

    /// Short name of the variant, used in coercion errors.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Blob(_) => "blob",
        }
    }

    /// Returns the parameter placeholder.
    #[must_use]
    pub const fn placeholder() -> &'static str {
        "?"
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql_inline())
    }
}

/// Trait for types that can be converted to SQL values.
pub trait ToSqlValue {
    /// Converts the value to a `SqlValue`.
    fn to_sql_value(self) -> SqlValue;
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(self) -> SqlValue {
        self
    }
}

impl ToSqlValue for bool {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Bool(self)
    }
}

macro_rules! int_to_sql_value {
    ($($ty:ty),*) => {
        $(
            impl ToSqlValue for $ty {
                fn to_sql_value(self) -> SqlValue {
                    SqlValue::Int(i64::from(self))
                }
            }
        )*
    };
}

int_to_sql_value!(i8, i16, i32, i64, u8, u16, u32);

impl ToSqlValue for f64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(self)
    }
}

impl ToSqlValue for f32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(f64::from(self))
    }
}

impl ToSqlValue for String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self)
    }
}

impl ToSqlValue for &str {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(String::from(self))
    }
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(self) -> SqlValue {
        self.map_or(SqlValue::Null, ToSqlValue::to_sql_value)
    }
}

impl ToSqlValue for Vec<u8> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self)
    }
}

impl ToSqlValue for &[u8] {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_scalars() {
        assert_eq!(SqlValue::Null.to_sql_inline(), "NULL");
        assert_eq!(SqlValue::Bool(true).to_sql_inline(), "TRUE");
        assert_eq!(SqlValue::Int(-100).to_sql_inline(), "-100");
        assert_eq!(SqlValue::Float(2.5).to_sql_inline(), "2.5");
    }

    #[test]
    fn test_inline_text_escaping() {
        assert_eq!(
            SqlValue::Text(String::from("O'Brien")).to_sql_inline(),
            "'O''Brien'"
        );
        let malicious = SqlValue::Text(String::from("'; DROP TABLE users; --"));
        assert_eq!(malicious.to_sql_inline(), "'''; DROP TABLE users; --'");
    }

    #[test]
    fn test_inline_blob() {
        assert_eq!(
            SqlValue::Blob(vec![0x48, 0x49]).to_sql_inline(),
            "X'4849'"
        );
    }

    #[test]
    fn test_is_number() {
        assert!(SqlValue::Int(3).is_number());
        assert!(SqlValue::Float(3.0).is_number());
        assert!(!SqlValue::Text(String::from("3")).is_number());
        assert!(!SqlValue::Null.is_number());
    }

    #[test]
    fn test_to_sql_value_conversions() {
        assert_eq!(42_u8.to_sql_value(), SqlValue::Int(42));
        assert_eq!(42_i32.to_sql_value(), SqlValue::Int(42));
        assert_eq!("hi".to_sql_value(), SqlValue::Text(String::from("hi")));
        assert_eq!(None::<i32>.to_sql_value(), SqlValue::Null);
        assert_eq!(Some(1.5_f64).to_sql_value(), SqlValue::Float(1.5));
    }
}
