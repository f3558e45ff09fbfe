//! Command-line argument definitions for the Flowsketch CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`].

use std::path::Path;

use clap::{Parser, ValueEnum};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Static SVG preview
    Svg,
    /// Layout as JSON for interactive render surfaces
    Json,
}

/// Command-line arguments for the Flowsketch tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input file, or `-` for stdin
    #[arg(help = "Path to the input file, or - for stdin")]
    pub input: String,

    /// Path to the output file; stdout when omitted
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format; defaults to the output file extension
    #[arg(short, long, value_enum)]
    pub format: Option<Format>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Args {
    /// Resolves the output format.
    ///
    /// An explicit `--format` wins. Otherwise an output path ending in
    /// `.json` selects JSON and anything else SVG.
    pub fn output_format(&self) -> Format {
        if let Some(format) = self.format {
            return format;
        }
        let is_json = self
            .output
            .as_deref()
            .and_then(|path| Path::new(path).extension())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json { Format::Json } else { Format::Svg }
    }
}
