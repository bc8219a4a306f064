/*!
Inspect command - display CBOR data as text
*/

use super::config::Config;
use super::io::{Input, InputFormat, Output};
use anyhow::Context;
use cdns_cbor::decode::{self, Cursor};
use cdns_cbor::render;
use clap::Parser;
use tracing::{debug, info, warn};

/// Inspect and display CBOR data
#[derive(Parser, Debug)]
#[command(about = "Render CBOR data as text", long_about = None)]
pub struct Command {
    /// Output format
    #[arg(
        long,
        default_value = "diag",
        value_name = "FORMAT",
        help = "Output format: diag/diagnostic (human-readable), hex (raw encoding per item)"
    )]
    format: OutputFormat,

    /// Encoding of the input
    #[arg(short = 'i', long, default_value = "binary", value_name = "ENCODING")]
    input_format: InputFormat,

    /// Output file (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<Output>,

    /// Input CBOR file (use '-' for stdin)
    input: Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    /// Diagnostic-style text
    #[value(alias = "diagnostic")]
    Diag,
    /// Hexadecimal dump of each item
    Hex,
}

impl Command {
    pub fn exec(self, config: &Config) -> anyhow::Result<()> {
        let cbor_bytes = self.input.read_cbor(self.input_format)?;
        info!("Read {} bytes from {}", cbor_bytes.len(), self.input);

        let lines = format_items(&cbor_bytes, self.format, config)?;

        let output = self.output.unwrap_or(Output::Stdout);
        output.write_str(&lines.join("\n"))?;

        // Add newline for better terminal output
        if matches!(output, Output::Stdout) {
            println!();
        }

        Ok(())
    }
}

/// Format every item of a CBOR sequence, one line per item
fn format_items(data: &[u8], format: OutputFormat, config: &Config) -> anyhow::Result<Vec<String>> {
    let mut buffer = vec![0u8; config.output_limit];
    let mut cursor = Cursor::new(data);
    let mut lines = Vec::new();

    while !cursor.is_empty() {
        let start = cursor.offset();
        let line = match format {
            OutputFormat::Diag => {
                let len = render::render(&mut cursor, &mut buffer, config.max_depth)
                    .inspect_err(|e| {
                        if *e == decode::Error::Memory {
                            warn!("Rendered text exceeds output_limit ({} bytes)", config.output_limit);
                        }
                    })
                    .with_context(|| format!("Failed to render item at offset {start}"))?;
                std::str::from_utf8(&buffer[..len])?.to_string()
            }
            OutputFormat::Hex => {
                decode::skip(&mut cursor, config.max_depth)
                    .with_context(|| format!("Malformed item at offset {start}"))?;
                hex::encode(&data[start..cursor.offset()])
            }
        };
        debug!("Item at offset {start}: {} bytes", cursor.offset() - start);
        lines.push(line);
    }
    Ok(lines)
}
