/*!
CBOR Tools - A CLI for examining CBOR data

# Commands

- `inspect`: Render every item of a CBOR sequence as diagnostic text, or as hex
- `check`: Walk every item and report its offset, length and major type

# Examples

```bash
# Render a CBOR file
cbor inspect data.cbor

# Render CBOR given as hex on stdin
echo '9f 01 82 02 03 ff' | cbor inspect --input-format hex -

# Show the raw encoding of each item
cbor inspect --format hex data.cbor

# Verify item boundaries, with debug logging
cbor -vv check data.cbor
```

Settings are read from `cbor-tools.toml` (or `--config`), and may be
overridden with `CBOR_TOOLS_*` environment variables.
*/

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

mod check;
mod config;
mod inspect;
mod io;

/// A CLI tool for examining CBOR data
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "A CLI tool for inspecting and validating CBOR data",
    long_about = "CBOR Tools renders CBOR (Concise Binary Object Representation) data as text \
                  and checks that every item in a buffer is well-formed."
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Render CBOR data as text
    Inspect(inspect::Command),

    /// Check that CBOR data is well-formed
    Check(check::Command),
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // stdout carries the rendered output
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = config::load(cli.config)?;
    debug!("Using {config:?}");

    match cli.command {
        Commands::Inspect(args) => args.exec(&config),
        Commands::Check(args) => args.exec(&config),
    }
}
