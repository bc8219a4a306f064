/*!
Check command - walk the items of a CBOR sequence
*/

use super::config::Config;
use super::io::{Input, InputFormat};
use cdns_cbor::decode::{self, Cursor, Major};
use clap::Parser;
use tracing::{debug, info};

/// Check that CBOR data is well-formed
#[derive(Parser, Debug)]
#[command(about = "Check every item of a CBOR sequence is well-formed", long_about = None)]
pub struct Command {
    /// Encoding of the input
    #[arg(short = 'i', long, default_value = "binary", value_name = "ENCODING")]
    input_format: InputFormat,

    /// Only report failures
    #[arg(short, long)]
    quiet: bool,

    /// Input CBOR file (use '-' for stdin)
    input: Input,
}

/// One top-level item
#[derive(Debug, PartialEq, Eq)]
struct Item {
    offset: usize,
    len: usize,
    major: Major,
}

impl Command {
    pub fn exec(self, config: &Config) -> anyhow::Result<()> {
        let cbor_bytes = self.input.read_cbor(self.input_format)?;
        let items = walk(&cbor_bytes, config.max_depth)?;

        if !self.quiet {
            for item in &items {
                println!("{}\t{}\t{}", item.offset, item.len, item.major);
            }
        }
        info!(
            "{}: {} well-formed items in {} bytes",
            self.input,
            items.len(),
            cbor_bytes.len()
        );
        Ok(())
    }
}

fn walk(data: &[u8], max_depth: usize) -> anyhow::Result<Vec<Item>> {
    let mut cursor = Cursor::new(data);
    let mut items = Vec::new();

    while !cursor.is_empty() {
        let offset = cursor.offset();
        let major = cursor
            .clone()
            .read_header()
            .and_then(|header| {
                decode::skip(&mut cursor, max_depth)?;
                Ok(header.major)
            })
            .map_err(|e| {
                anyhow::anyhow!("Malformed item at offset {offset}: {e} (code {})", e.code())
            })?;

        let len = cursor.offset() - offset;
        debug!("{major} at offset {offset}, {len} bytes");
        items.push(Item { offset, len, major });
    }
    Ok(items)
}
