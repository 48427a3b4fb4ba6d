use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use txconf::{Config, OperationList, Version};

#[derive(Debug, Parser)]
#[command(
    name = "txconf",
    version,
    about = "Parse transactions subsystem configuration into management operations"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); overrides RUST_LOG
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Parse a subsystem document and print its operations
    Parse {
        /// Input file (defaults to stdin)
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Output file (defaults to stdout)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
        /// Maximum element nesting depth (0 means unlimited)
        #[arg(long)]
        max_depth: Option<u16>,
        /// Maximum input size in bytes (0 means unlimited)
        #[arg(long)]
        max_size: Option<usize>,
    },
    /// List the supported schema namespaces, oldest first
    Versions,
    /// Rewrite a document in the current schema version
    Upgrade {
        /// Input file (defaults to stdin)
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,
        /// Output file (defaults to stdout)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Commands::Parse {
            input,
            format,
            output,
            max_depth,
            max_size,
        } => {
            let defaults = Config::default();
            let config = Config::new(
                max_depth.unwrap_or(defaults.max_depth),
                max_size.unwrap_or(defaults.max_size),
            );
            let data = read_input(&input)?;
            let ops = parse(&data, config, &input)?;
            let rendered = match format {
                OutputFormat::Json => {
                    let mut json = serde_json::to_string_pretty(&ops)
                        .context("failed to serialize operations")?;
                    json.push('\n');
                    json
                }
                OutputFormat::Text => render_text(&ops),
            };
            write_output(&output, rendered.as_bytes())?;
        }
        Commands::Versions => {
            let listing: String = Version::ALL
                .iter()
                .map(|v| {
                    let marker = if *v == Version::CURRENT { " (current)" } else { "" };
                    format!("{}\t{}{marker}\n", v.label(), v.namespace())
                })
                .collect();
            write_output(&None, listing.as_bytes())?;
        }
        Commands::Upgrade { input, output } => {
            let data = read_input(&input)?;
            let ops = parse(&data, Config::default(), &input)?;
            let document = txconf::write_current(&ops).context("failed to write document")?;
            info!(version = %Version::CURRENT, "upgraded document");
            write_output(&output, document.as_bytes())?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .init();
}

fn parse(data: &str, config: Config, source: &Option<PathBuf>) -> Result<OperationList> {
    let name = source
        .as_ref()
        .map_or_else(|| "<stdin>".to_string(), |p| p.display().to_string());
    debug!(input = %name, bytes = data.len(), "parsing");
    txconf::parse_str_with_config(data, config).with_context(|| format!("failed to parse {name}"))
}

fn render_text(ops: &OperationList) -> String {
    ops.iter().map(|op| format!("{op}\n")).collect()
}

fn read_input(path: &Option<PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input file {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            if buffer.trim().is_empty() {
                bail!("no input provided on stdin");
            }
            Ok(buffer)
        }
    }
}

fn write_output(path: &Option<PathBuf>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, data)
            .with_context(|| format!("failed to write output file {}", path.display())),
        None => {
            let mut stdout = io::stdout();
            stdout.write_all(data).context("failed to write stdout")?;
            Ok(())
        }
    }
}
