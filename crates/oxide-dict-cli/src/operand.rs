//! Command-line operand syntax.
//!
//! Each operand is `<kind>:<value>`:
//!
//! | Kind | Meaning |
//! |------|---------|
//! | `col` | column, `table.column` qualifies it |
//! | `int`, `float`, `str` | literal |
//! | `?int`, `?float`, `?str` | bound parameter |
//! | `null` | NULL literal (no value) |

use core::str::FromStr;

use anyhow::{Context, bail};
use oxide_dict_core::{FilterValue, SqlValue};

/// A parsed command-line operand.
#[derive(Debug, Clone, PartialEq)]
pub struct Operand(pub FilterValue);

impl FromStr for Operand {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        if s.eq_ignore_ascii_case("null") {
            return Ok(Self(FilterValue::Literal(SqlValue::Null)));
        }
        let Some((kind, raw)) = s.split_once(':') else {
            bail!("operand '{s}' must look like <kind>:<value>");
        };
        let (param, kind) = kind
            .strip_prefix('?')
            .map_or((false, kind), |rest| (true, rest));
        let value = match kind {
            "col" if !param => {
                return Ok(Self(match raw.split_once('.') {
                    Some((table, name)) => FilterValue::qualified(table, name),
                    None => FilterValue::column(raw),
                }));
            }
            "int" => SqlValue::Int(
                raw.parse()
                    .with_context(|| format!("'{raw}' is not an integer"))?,
            ),
            "float" => SqlValue::Float(
                raw.parse()
                    .with_context(|| format!("'{raw}' is not a number"))?,
            ),
            "str" => SqlValue::Text(String::from(raw)),
            _ => bail!("unknown operand kind '{kind}' in '{s}'"),
        };
        Ok(Self(if param {
            FilterValue::param(value)
        } else {
            FilterValue::Literal(value)
        }))
    }
}
