//! Command-line interface for scanpack.
//!
//! Parses arguments, resolves configuration (CLI > file > defaults), runs
//! the payload build, and reports the result as a human summary or JSON.
//! Errors are mapped to the documented exit-code table; the library itself
//! never terminates the process.

use anyhow::Result;
use camino::Utf8PathBuf;
use clap::Parser;

use scanpack_config::{Config, Overrides};
use scanpack_lang::Language;
use scanpack_payload::PayloadBuilder;
use scanpack_utils::atomic_write::write_bytes_atomic;
use scanpack_utils::error::ScanPackError;
use scanpack_utils::exit_codes::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "scanpack",
    version,
    about = "Assemble a size-bounded zip payload of an entry file and its local imports"
)]
pub struct Cli {
    /// Project root directory
    pub root: Utf8PathBuf,

    /// Entry file that triggered the scan (absolute, or relative to ROOT)
    pub entry: Utf8PathBuf,

    /// Target language (default: detected from the entry file's extension)
    #[arg(long)]
    pub language: Option<Language>,

    /// Payload byte budget (default: 1 MiB)
    #[arg(long)]
    pub max_bytes: Option<u64>,

    /// Maximum number of included files
    #[arg(long)]
    pub max_files: Option<usize>,

    /// Write the archive to this path (atomic rename)
    #[arg(short, long)]
    pub output: Option<Utf8PathBuf>,

    /// Config file (default: <ROOT>/scanpack.toml when present)
    #[arg(long)]
    pub config: Option<Utf8PathBuf>,

    /// Print metadata as JSON instead of a human summary
    #[arg(long)]
    pub json: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// CLI entry point: parse, execute, report, map errors to exit codes.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();

    // A host embedding the library may already have a subscriber; a second
    // init is not an error worth failing the scan over.
    let _ = scanpack_utils::logging::init_tracing(cli.verbose);

    match execute(&cli) {
        Ok(()) => Ok(()),
        Err(err) => {
            eprintln!("error: {err:#}");
            Err(exit_code_for(&err))
        }
    }
}

fn execute(cli: &Cli) -> Result<()> {
    let overrides = Overrides {
        max_bytes: cli.max_bytes,
        max_files: cli.max_files,
        language: cli.language,
    };
    let config = Config::discover(&cli.root, cli.config.as_deref(), &overrides)?;

    let builder = PayloadBuilder::with_config(&cli.root, &cli.entry, &config)?;
    let payload = builder.create_payload()?;

    if let Some(output) = &cli.output {
        write_bytes_atomic(output, &payload.archive)?;
        tracing::info!("Wrote archive to {output}");
    }

    if cli.json {
        let mut value = serde_json::to_value(&payload.metadata)?;
        value["archive_bytes"] = payload.archive.len().into();
        value["duration_ms"] = u64::try_from(payload.duration.as_millis())
            .unwrap_or(u64::MAX)
            .into();
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        let metadata = &payload.metadata;
        println!("language:   {}", metadata.language);
        println!("files:      {}", metadata.total_files());
        println!("bytes:      {}", metadata.payload_bytes);
        println!("lines:      {}", metadata.total_lines);
        println!("truncated:  {}", metadata.truncated);
        for file in &metadata.files {
            println!("  {file}");
        }
    }

    Ok(())
}

fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    err.downcast_ref::<ScanPackError>()
        .map_or(ExitCode::INTERNAL, ScanPackError::to_exit_code)
}
