mod commands;
mod input;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use commands::{cmd_check, cmd_decompose, cmd_infer};

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "NEARMISS_LOG";

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
    Xml,
}

/// Near-miss inference for OR-of-AND rules.
#[derive(Parser)]
#[command(
    name = "nearmiss",
    version,
    about = "Near-miss inference for OR-of-AND rules"
)]
struct Cli {
    /// Output format (text, json or xml)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the OR-delimited branches of a predicate
    Decompose {
        /// Predicate text, e.g. "x => x.Age >= 18 && x.Income > 1000 || x.HasGuarantor == true"
        predicate: String,
    },

    /// Report, per failing record, the closest branch and what must change
    Infer {
        /// Predicate text
        predicate: String,
        /// Path to a JSON array of record objects
        #[arg(long)]
        records: PathBuf,
        /// Path to a JSON schema file ([{"name", "type"}]); inferred from the records if omitted
        #[arg(long)]
        schema: Option<PathBuf>,
        /// Score the first record whether or not it satisfies the predicate
        #[arg(long)]
        single: bool,
    },

    /// Partition records into those that satisfy the predicate and those that do not
    Check {
        /// Predicate text
        predicate: String,
        /// Path to a JSON array of record objects
        #[arg(long)]
        records: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Commands::Decompose { predicate } => {
            cmd_decompose(&predicate, cli.output, cli.quiet);
        }
        Commands::Infer {
            predicate,
            records,
            schema,
            single,
        } => {
            cmd_infer(
                &predicate,
                &records,
                schema.as_deref(),
                single,
                cli.output,
                cli.quiet,
            );
        }
        Commands::Check { predicate, records } => {
            cmd_check(&predicate, &records, cli.output, cli.quiet);
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
        OutputFormat::Xml => eprintln!("{}", output::xml_error(msg)),
    }
}
