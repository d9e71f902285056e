//! typegrade CLI: grade typed transcriptions against reference transcripts.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(
    name = "typegrade",
    version,
    about = "Typing transcription evaluator: word alignment, WER, precision and score"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a single typed transcription
    Evaluate {
        /// Reference transcript file
        #[arg(long, conflicts_with = "reference_text", required_unless_present = "reference_text")]
        reference: Option<PathBuf>,

        /// Reference transcript given inline
        #[arg(long)]
        reference_text: Option<String>,

        /// Typed text file
        #[arg(long, conflicts_with = "typed_text", required_unless_present = "typed_text")]
        typed: Option<PathBuf>,

        /// Typed text given inline
        #[arg(long)]
        typed_text: Option<String>,

        /// Measured typing speed in words per minute
        #[arg(long, conflicts_with = "elapsed_secs", required_unless_present = "elapsed_secs")]
        wpm: Option<f64>,

        /// Elapsed typing time in seconds (wpm is derived from the typed text)
        #[arg(long)]
        elapsed_secs: Option<f64>,

        /// Output format: text, json, html
        #[arg(long, default_value = "text")]
        format: String,

        /// Write output to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Evaluate attempt set files
    Run {
        /// Path to .toml attempt set or directory
        #[arg(long)]
        attempts: PathBuf,

        /// Output directory
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output formats: json, html, md, all (comma-separated)
        #[arg(long)]
        format: Option<String>,

        /// Only evaluate attempts with one of these tags (comma-separated)
        #[arg(long)]
        filter: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate attempt set TOML files
    Validate {
        /// Path to attempt set file or directory
        #[arg(long)]
        attempts: PathBuf,
    },

    /// Compute the composite score from precision and speed
    Score {
        /// Precision percentage (0-100)
        #[arg(long)]
        precision: f64,

        /// Words per minute
        #[arg(long)]
        wpm: f64,
    },

    /// Create starter config and example attempt set
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("typegrade=info".parse().expect("valid directive")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Evaluate {
            reference,
            reference_text,
            typed,
            typed_text,
            wpm,
            elapsed_secs,
            format,
            output,
            config,
        } => commands::evaluate::execute(commands::evaluate::EvaluateArgs {
            reference: commands::TextSource::new(reference, reference_text),
            typed: commands::TextSource::new(typed, typed_text),
            wpm,
            elapsed_secs,
            format,
            output,
            config,
        }),
        Commands::Run {
            attempts,
            output,
            format,
            filter,
            config,
        } => commands::run::execute(attempts, output, format, filter, config),
        Commands::Validate { attempts } => commands::validate::execute(attempts),
        Commands::Score { precision, wpm } => commands::score::execute(precision, wpm),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
