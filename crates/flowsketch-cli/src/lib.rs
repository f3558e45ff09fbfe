//! CLI logic for the Flowsketch tool.
//!
//! Reads flowchart JSON from a file or stdin, runs it through
//! [`FlowchartBuilder`] and writes SVG or layout JSON to a file or stdout.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Format};

use std::{
    fs,
    io::{self, Read, Write},
};

use log::{debug, info};

use flowsketch::{FlowchartBuilder, FlowsketchError};

/// Run the Flowsketch CLI application
///
/// # Errors
///
/// Returns `FlowsketchError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing and validation errors
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), FlowsketchError> {
    let format = args.output_format();
    info!(
        input_path = args.input,
        output_path:? = args.output,
        format:? = format;
        "Processing flowchart"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = read_input(&args.input)?;
    debug!(bytes = source.len(); "Input read");

    let builder = FlowchartBuilder::new(app_config);
    let graph = builder.parse(&source)?;
    let rendered = match format {
        Format::Svg => builder.render_svg(&graph)?,
        Format::Json => builder.render_json(&graph)?,
    };

    match &args.output {
        Some(path) => {
            fs::write(path, rendered)?;
            info!(output_file = path; "Output written");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}

fn read_input(input: &str) -> Result<String, FlowsketchError> {
    if input == "-" {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source)?;
        return Ok(source);
    }
    Ok(fs::read_to_string(input)?)
}
