//! @ai:module:intent CLI entry point for stripping annotations from Go source trees
//! @ai:module:layer presentation
//! @ai:module:public_api main
//! @ai:module:depends_on pipeline, output, config

use annostrip::{output, pipeline, FormatterKind, OutputFormat, StripConfig};
use annostrip::config::{DEFAULT_EXCLUDED_KEY, DEFAULT_MARKER};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "annostrip")]
#[command(
    author,
    version,
    about = "Remove marker comments and excluded struct tag keys from Go source files"
)]
struct Cli {
    /// Go file or directory to rewrite in place
    path: PathBuf,

    /// Comments containing this text are removed
    #[arg(long, default_value = DEFAULT_MARKER)]
    marker: String,

    /// Struct tag key whose fragments are removed
    #[arg(long, default_value = DEFAULT_EXCLUDED_KEY)]
    exclude_key: String,

    /// Formatting backend applied to rewritten files
    #[arg(long, value_enum, default_value = "auto")]
    formatter: Backend,

    /// Summary output format
    #[arg(long, short, value_enum, default_value = "text")]
    format: Format,
}

#[derive(Clone, Copy, ValueEnum)]
enum Backend {
    Auto,
    Builtin,
    Gofmt,
}

impl From<Backend> for FormatterKind {
    fn from(b: Backend) -> Self {
        match b {
            Backend::Auto => FormatterKind::Auto,
            Backend::Builtin => FormatterKind::Builtin,
            Backend::Gofmt => FormatterKind::Gofmt,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    JsonPretty,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
            Format::JsonPretty => OutputFormat::JsonPretty,
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(
            "annostrip=info"
                .parse()
                .unwrap_or_else(|_| LevelFilter::INFO.into()),
        )
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let config = StripConfig {
        marker: cli.marker,
        excluded_key: cli.exclude_key,
        formatter: cli.formatter.into(),
    };

    match pipeline::run(&cli.path, &config) {
        Ok(summary) => {
            println!("{}", output::format_run_summary(&summary, cli.format.into()));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}
