use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Arrays, maps and tags nested deeper than this are elided when
    /// rendering and rejected when checking
    pub max_depth: usize,

    /// Capacity in bytes of the buffer each item is rendered into
    pub output_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: cdns_cbor::decode::DEFAULT_MAX_DEPTH,
            output_limit: 64 * 1024,
        }
    }
}

pub fn load(path: Option<PathBuf>) -> anyhow::Result<Config> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    } else {
        // Optional default config file in current directory
        builder = builder.add_source(
            config::File::from(std::path::Path::new("cbor-tools.toml")).required(false),
        );
    }

    // Allow environment variables to override
    builder = builder.add_source(config::Environment::with_prefix("CBOR_TOOLS").try_parsing(true));

    builder.build()?.try_deserialize().map_err(Into::into)
}
