//! Image Library CLI - schema export
//!
//! With no arguments, prints the manifest JSON Schema to stdout.
//! Logs go to stderr so stdout stays a clean JSON document.

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use library_core::{emit_schema, SCHEMA_ID};

#[derive(Parser)]
#[command(name = "library-cli", version)]
#[command(about = "Image Library CLI - manifest schema export")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Print on a single line
    #[arg(long, global = true)]
    compact: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the manifest JSON Schema (default)
    Schema,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let compact = cli.compact;
    let schema = match cli.command {
        Some(Commands::Schema) | None => emit_schema(),
    };
    let rendered = if compact {
        serde_json::to_string(&schema)
    } else {
        serde_json::to_string_pretty(&schema)
    };

    match rendered {
        Ok(text) => {
            tracing::debug!(id = SCHEMA_ID, compact, "emitting manifest schema");
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!(r#"{{"error": "Failed to render schema: {}"}}"#, e);
            ExitCode::FAILURE
        }
    }
}
