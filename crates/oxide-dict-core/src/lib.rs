//! # oxide-dict-core
//!
//! Database dictionaries: per-database SQL fragment generation for the
//! parts of SQL that portable query builders cannot express uniformly.
//!
//! This crate provides:
//! - A [`SqlBuffer`] that keeps SQL text and positional parameters in step
//! - [`FilterValue`] operands that are either inlinable literals or expressions
//! - A [`Capabilities`] set per dialect, queryable by name
//! - A [`Dialect`] trait with ANSI defaults and DB2, Derby and SQLite families
//! - A [`DialectRegistry`] that picks a dialect from a product name or URL
//!
//! ## Generating a fragment
//!
//! DB2 cannot type an untyped parameter inside string functions, so string
//! operands are cast while numeric literals are inlined:
//!
//! ```rust
//! use oxide_dict_core::{Db2Dialect, Dialect, FilterValue, Operation, SqlBuffer};
//!
//! let dialect = Db2Dialect::new();
//! let mut buf = SqlBuffer::new();
//! dialect
//!     .generate(
//!         Operation::Substring,
//!         &[
//!             FilterValue::qualified("t0", "name"),
//!             FilterValue::literal(3),
//!             FilterValue::param(5),
//!         ],
//!         &mut buf,
//!     )
//!     .unwrap();
//!
//! assert_eq!(
//!     buf.sql(),
//!     "SUBSTR(CAST((t0.name) AS VARCHAR(1000)), 3, CAST((?) AS INTEGER))"
//! );
//! assert_eq!(buf.params().len(), 1);
//! ```
//!
//! ## Picking a dialect
//!
//! ```rust
//! use oxide_dict_core::{DialectConfig, DialectKind, DialectRegistry};
//!
//! let registry = DialectRegistry::new().unwrap();
//! let kind = registry.detect("DB2/LINUXX8664").unwrap();
//! assert_eq!(kind, DialectKind::Db2);
//!
//! let config = DialectConfig::default().with_varchar_cast_length(4000);
//! let dialect = DialectRegistry::build(kind, &config).unwrap();
//! assert_eq!(dialect.capabilities().varchar_cast_length, 4000);
//! ```

// Lets `#[derive(Capabilities)]` expand to absolute paths inside this crate.
extern crate self as oxide_dict_core;

pub mod buffer;
pub mod capabilities;
pub mod config;
pub mod dialect;
pub mod error;
pub mod filter;
pub mod registry;
pub mod template;
pub mod types;
pub mod value;

pub use buffer::SqlBuffer;
pub use capabilities::{
    Capabilities, CapabilityLookup, CapabilityValue, LockConflict, LockRequest, RangeStyle,
};
pub use config::DialectConfig;
pub use dialect::{
    Db2Dialect, DerbyDialect, Dialect, GenericDialect, IsolationLevel, Operation, SqliteDialect,
    TrimSpec,
};
pub use error::{DialectError, Result};
pub use filter::{Expr, FilterValue};
pub use oxide_dict_derive::Capabilities;
pub use registry::{DialectKind, DialectRegistry};
pub use template::SqlTemplate;
pub use types::{LogicalType, TypeNames};
pub use value::{SqlValue, ToSqlValue};
