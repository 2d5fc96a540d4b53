//! Dialect selection.
//!
//! The registry maps a database product name (as reported by the driver's
//! metadata) or a connection URL to a [`DialectKind`], and builds shared
//! dialect instances for a kind.

use core::fmt;
use core::str::FromStr;
use std::sync::Arc;

use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::config::DialectConfig;
use crate::dialect::{Db2Dialect, DerbyDialect, Dialect, GenericDialect, SqliteDialect};
use crate::error::{DialectError, Result};

/// The dialect families this crate ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialectKind {
    /// ANSI SQL.
    Generic,
    /// IBM DB2.
    Db2,
    /// Apache Derby.
    Derby,
    /// SQLite.
    Sqlite,
}

impl DialectKind {
    /// Every kind, in registry order.
    pub const ALL: [Self; 4] = [Self::Generic, Self::Db2, Self::Derby, Self::Sqlite];

    /// Canonical lower-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Db2 => "db2",
            Self::Derby => "derby",
            Self::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DialectKind {
    type Err = DialectError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "generic" | "ansi" => Ok(Self::Generic),
            "db2" => Ok(Self::Db2),
            "derby" => Ok(Self::Derby),
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            _ => Err(DialectError::UnknownDialect(String::from(s))),
        }
    }
}

#[derive(Debug, Clone)]
struct Rule {
    pattern: Regex,
    kind: DialectKind,
}

/// Detects dialect kinds from product names or URLs, and builds dialects.
///
/// Rules are tried in registration order; the first match wins.
#[derive(Debug, Clone, Default)]
pub struct DialectRegistry {
    rules: Vec<Rule>,
}

impl DialectRegistry {
    /// Creates a registry with no detection rules.
    #[must_use]
    pub const fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Creates a registry recognising the built-in families.
    ///
    /// # Errors
    ///
    /// Fails only if a built-in pattern does not compile.
    pub fn new() -> Result<Self> {
        let mut registry = Self::empty();
        // URL schemes first, then the product names drivers report; host
        // and database names must never decide the family.
        registry
            .register(r"^jdbc:(db2|as400):", DialectKind::Db2)?
            .register(r"^jdbc:derby:", DialectKind::Derby)?
            .register(r"^(jdbc:)?sqlite3?:", DialectKind::Sqlite)?
            .register(r"^(apache )?derby\b", DialectKind::Derby)?
            .register(r"^sqlite", DialectKind::Sqlite)?
            .register(r"^db2", DialectKind::Db2)?;
        Ok(registry)
    }

    /// Adds a case-insensitive detection rule, tried after existing ones.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::Pattern`] if `pattern` is not a valid regex.
    pub fn register(&mut self, pattern: &str, kind: DialectKind) -> Result<&mut Self> {
        let pattern = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        self.rules.push(Rule { pattern, kind });
        Ok(self)
    }

    /// Finds the dialect kind for a product name or connection URL.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::UnknownDialect`] if no rule matches.
    pub fn detect(&self, product_or_url: &str) -> Result<DialectKind> {
        let needle = product_or_url.trim();
        let kind = self
            .rules
            .iter()
            .find(|rule| rule.pattern.is_match(needle))
            .map(|rule| rule.kind)
            .ok_or_else(|| DialectError::UnknownDialect(String::from(needle)))?;
        debug!(product = needle, %kind, "detected dialect");
        Ok(kind)
    }

    /// Builds a shareable dialect of `kind` with `config` applied.
    ///
    /// # Errors
    ///
    /// Fails if the configuration produces an invalid capability set.
    pub fn build(kind: DialectKind, config: &DialectConfig) -> Result<Arc<dyn Dialect>> {
        let dialect: Arc<dyn Dialect> = match kind {
            DialectKind::Generic => Arc::new(GenericDialect::with_config(config)?),
            DialectKind::Db2 => Arc::new(Db2Dialect::with_config(config)?),
            DialectKind::Derby => Arc::new(DerbyDialect::with_config(config)?),
            DialectKind::Sqlite => Arc::new(SqliteDialect::with_config(config)?),
        };
        Ok(dialect)
    }

    /// Detects the kind for `product_or_url`, then builds it.
    ///
    /// # Errors
    ///
    /// Fails if detection or construction fails.
    pub fn resolve(&self, product_or_url: &str, config: &DialectConfig) -> Result<Arc<dyn Dialect>> {
        Self::build(self.detect(product_or_url)?, config)
    }
}
