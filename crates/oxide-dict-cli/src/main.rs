//! oxide-dict CLI
//!
//! Command-line tool for inspecting database dictionaries and rendering
//! dialect-specific SQL fragments.

mod operand;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{Level, debug, info};
use tracing_subscriber::FmtSubscriber;

use oxide_dict_core::{
    Capabilities, CapabilityLookup, Dialect, DialectConfig, DialectKind, DialectRegistry,
    IsolationLevel, LogicalType, Operation, SqlBuffer,
};

use crate::operand::Operand;

/// Per-database SQL dictionaries.
#[derive(Parser)]
#[command(name = "oxide-dict")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Dialect kind (generic, db2, derby, sqlite), product name or URL.
    #[arg(short, long, env = "OXIDE_DICT_DIALECT", default_value = "generic")]
    dialect: String,

    /// JSON file with capability overrides.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bound for CAST(... AS VARCHAR(n)); overrides the config file.
    #[arg(long, env = "OXIDE_DICT_VARCHAR_CAST_LENGTH")]
    varchar_cast_length: Option<u32>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the dialect's capabilities.
    Capabilities {
        /// Show a single capability (snake_case or camelCase).
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Print the dialect kind for a product name or connection URL.
    Detect {
        /// Product name or URL, e.g. "DB2/LINUXX8664" or "jdbc:derby:db".
        product: String,
    },

    /// Render one operation.
    Render {
        /// Operation: substring, indexOf, concat, length, trim, ltrim,
        /// rtrim, upper, lower.
        operation: Operation,

        /// Operands as <kind>:<value> (col, int, float, str, ?int, ?float,
        /// ?str) or null.
        #[arg(allow_hyphen_values = true)]
        operands: Vec<Operand>,
    },

    /// Print the row-locking clause.
    LockClause,

    /// Print the cross join between two table references.
    CrossJoin {
        /// Left table reference.
        left: String,
        /// Right table reference.
        right: String,
    },

    /// Print the row-range clause.
    Range {
        /// Leading rows to skip.
        #[arg(long, default_value_t = 0)]
        offset: u64,

        /// Maximum rows to return.
        #[arg(long)]
        limit: Option<u64>,
    },

    /// Print the native column type for a logical type.
    TypeName {
        /// Logical type, e.g. VARCHAR or LONGVARBINARY.
        logical_type: LogicalType,
    },
}

fn load_config(cli: &Cli) -> anyhow::Result<DialectConfig> {
    let mut config = match &cli.config {
        Some(path) => DialectConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => DialectConfig::default(),
    };
    if let Some(length) = cli.varchar_cast_length {
        config = config.with_varchar_cast_length(length);
    }
    Ok(config)
}

fn resolve_kind(registry: &DialectRegistry, dialect: &str) -> anyhow::Result<DialectKind> {
    match dialect.parse::<DialectKind>() {
        Ok(kind) => Ok(kind),
        Err(_) => Ok(registry.detect(dialect)?),
    }
}

fn print_capabilities(caps: &Capabilities, name: Option<&str>) -> anyhow::Result<()> {
    if let Some(name) = name {
        let value = caps
            .capability(name)
            .with_context(|| format!("unknown capability '{name}'"))?;
        println!("{value}");
        return Ok(());
    }
    for name in Capabilities::capability_names() {
        if let Some(value) = caps.capability(name) {
            println!("{name} = {value}");
        }
    }
    for (ty, native) in caps.type_names.iter() {
        println!("type_names.{ty} = {native}");
    }
    Ok(())
}

fn print_buffer(buf: &SqlBuffer) {
    println!("{buf}");
    for (i, param) in buf.params().iter().enumerate() {
        println!("  ?{} = {param}", i + 1);
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let registry = DialectRegistry::new()?;

    if let Commands::Detect { product } = &cli.command {
        let kind = registry.detect(product)?;
        println!("{kind}");
        return Ok(());
    }

    let config = load_config(&cli)?;
    let kind = resolve_kind(&registry, &cli.dialect)?;
    let dialect: Arc<dyn Dialect> = DialectRegistry::build(kind, &config)?;
    debug!(dialect = dialect.name(), "using dialect");

    match cli.command {
        Commands::Detect { .. } => {}

        Commands::Capabilities { name } => {
            print_capabilities(dialect.capabilities(), name.as_deref())?;
        }

        Commands::Render {
            operation,
            operands,
        } => {
            let operands: Vec<_> = operands.into_iter().map(|o| o.0).collect();
            let mut buf = SqlBuffer::new();
            dialect.generate(operation, &operands, &mut buf)?;
            print_buffer(&buf);
        }

        Commands::LockClause => match dialect.for_update_clause(Some(IsolationLevel::ReadCommitted)) {
            Some(clause) => println!("{clause}"),
            None => info!("{} does not support row locking", dialect.name()),
        },

        Commands::CrossJoin { left, right } => {
            let mut buf = SqlBuffer::new();
            dialect.cross_join(&mut buf, &left, &right);
            print_buffer(&buf);
        }

        Commands::Range { offset, limit } => {
            let mut buf = SqlBuffer::new();
            let skip = dialect.select_range(&mut buf, offset, limit);
            print_buffer(&buf);
            if skip > 0 {
                info!("{} cannot skip rows; discard the first {skip} rows", dialect.name());
            }
        }

        Commands::TypeName { logical_type } => {
            println!("{}", dialect.type_name(logical_type));
        }
    }

    Ok(())
}
