use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

/// Terragen terrain file CLI tool
#[derive(Parser)]
#[command(name = "ter")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log decoding details to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for conversions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Terragen .ter
    Ter,
    /// Raw 16-bit heightmap
    Raw,
}

impl Format {
    pub fn extension(self) -> &'static str {
        match self {
            Format::Ter => "ter",
            Format::Raw => "raw",
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Display information about a terrain file
    Info {
        /// Path to .ter file
        file: PathBuf,

        /// Decode all samples to report the true altitude range
        #[arg(short, long)]
        exact: bool,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Re-encode a terrain file as .ter or raw
    Convert {
        /// Input .ter file
        input: PathBuf,

        /// Output file
        output: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "ter")]
        format: Format,

        /// Write raw samples most significant byte first
        #[arg(long)]
        big_endian: bool,

        /// Convert through metres using the file's Z spacing
        #[arg(long)]
        metres: bool,
    },

    /// Export elevations as CSV (x, y, altitude in metres)
    Export {
        /// Input .ter file
        input: PathBuf,

        /// Output CSV file
        output: PathBuf,
    },

    /// Convert multiple terrain files
    Batch {
        /// Input .ter files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, env = "TER_OUTPUT_DIR")]
        out_dir: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "raw")]
        format: Format,

        /// Write raw samples most significant byte first
        #[arg(long)]
        big_endian: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "ter=debug" } else { "ter=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Info { file, exact, json } => commands::info::run(file, exact, json),
        Commands::Convert {
            input,
            output,
            format,
            big_endian,
            metres,
        } => commands::convert::run(input, output, format, big_endian, metres),
        Commands::Export { input, output } => commands::export::run(input, output),
        Commands::Batch {
            inputs,
            out_dir,
            format,
            big_endian,
        } => commands::batch::run(inputs, out_dir, format, big_endian),
    }
}
