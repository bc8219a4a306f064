/*!
I/O utilities for reading and writing files or stdin/stdout
*/

use anyhow::Context;
use base64::prelude::*;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::str::FromStr;

/// Input source - either stdin or a file
#[derive(Debug, Clone)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

/// How the CBOR bytes are presented in the input
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum InputFormat {
    /// Raw CBOR bytes
    Binary,
    /// Hexadecimal text, whitespace ignored
    Hex,
    /// Base64 text (standard or URL-safe alphabet)
    Base64,
}

impl Input {
    /// Read all bytes from the input source
    pub fn read_all(&self) -> io::Result<Vec<u8>> {
        match self {
            Input::Stdin => {
                let mut buffer = Vec::new();
                io::stdin().read_to_end(&mut buffer)?;
                Ok(buffer)
            }
            Input::File(path) => fs::read(path),
        }
    }

    /// Read the input and decode it to CBOR bytes
    pub fn read_cbor(&self, format: InputFormat) -> anyhow::Result<Vec<u8>> {
        let data = self
            .read_all()
            .with_context(|| format!("Failed to read {self}"))?;
        decode_input(data, format)
    }
}

fn decode_input(data: Vec<u8>, format: InputFormat) -> anyhow::Result<Vec<u8>> {
    match format {
        InputFormat::Binary => Ok(data),
        InputFormat::Hex => {
            let text: Vec<u8> = data
                .into_iter()
                .filter(|b| !b.is_ascii_whitespace())
                .collect();
            hex::decode(text).context("Input is not valid hex")
        }
        InputFormat::Base64 => {
            let text = data.trim_ascii();
            BASE64_STANDARD
                .decode(text)
                .or_else(|_| BASE64_URL_SAFE_NO_PAD.decode(text))
                .context("Input is not valid base64")
        }
    }
}

impl std::fmt::Display for Input {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Input::Stdin => f.write_str("stdin"),
            Input::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl FromStr for Input {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            Ok(Input::Stdin)
        } else {
            Ok(Input::File(PathBuf::from(s)))
        }
    }
}

/// Output destination - either stdout or a file
#[derive(Debug, Clone)]
pub enum Output {
    Stdout,
    File(PathBuf),
}

impl Output {
    /// Write all bytes to the output destination
    pub fn write_all(&self, data: &[u8]) -> io::Result<()> {
        match self {
            Output::Stdout => io::stdout().write_all(data),
            Output::File(path) => fs::write(path, data),
        }
    }

    /// Write a string to the output destination
    pub fn write_str(&self, data: &str) -> io::Result<()> {
        self.write_all(data.as_bytes())
    }
}

impl FromStr for Output {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s == "-" {
            Ok(Output::Stdout)
        } else {
            Ok(Output::File(PathBuf::from(s)))
        }
    }
}
