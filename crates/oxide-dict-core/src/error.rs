//! Error types for SQL fragment generation and dialect construction.

/// Errors raised while building dialects or generating SQL fragments.
///
/// None of these are transient: generation is deterministic, so callers
/// propagate them rather than retry.
#[derive(Debug, thiserror::Error)]
pub enum DialectError {
    /// An operation was called without an operand it requires.
    #[error("{operation}: missing operand #{position}")]
    MissingOperand {
        /// Operation or template being rendered.
        operation: String,
        /// Zero-based operand position.
        position: usize,
    },

    /// An operation received the wrong number of operands.
    #[error("{operation} takes {min}..={max} operands, got {found}")]
    Arity {
        /// Operation name.
        operation: &'static str,
        /// Minimum operand count.
        min: usize,
        /// Maximum operand count.
        max: usize,
        /// Operand count supplied.
        found: usize,
    },

    /// An operation name that no dialect knows.
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// A literal could not be coerced to the type the grammar needs.
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Type the context requires.
        expected: &'static str,
        /// What was supplied.
        found: String,
    },

    /// A coercion was attempted on an operand with no statically known value.
    #[error("Operand has no literal value to coerce")]
    NotLiteral,

    /// Capability lookup by an unknown name.
    #[error("Unknown capability: {0}")]
    UnknownCapability(String),

    /// Capability exists but holds a different kind of value.
    #[error("Capability '{name}' is a {actual}, not a {requested}")]
    CapabilityType {
        /// Capability name.
        name: String,
        /// Kind requested by the caller.
        requested: &'static str,
        /// Kind actually stored.
        actual: &'static str,
    },

    /// No dialect matches the given product name, URL or kind.
    #[error("Unknown dialect: {0}")]
    UnknownDialect(String),

    /// A configuration override produced an unusable capability set.
    #[error("Invalid dialect configuration: {0}")]
    InvalidConfig(String),

    /// A detection pattern failed to compile.
    #[error("Invalid detection pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Configuration could not be deserialized.
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for dialect operations.
pub type Result<T> = std::result::Result<T, DialectError>;
