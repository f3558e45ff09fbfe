//! # Flowsketch Parser
//!
//! Builds a validated [`Graph`] from the text a language model produced for
//! a flowchart.
//!
//! ## Usage
//!
//! ```
//! # use flowsketch_parser::{parse, BuildConfig, ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = r#"
//!         ```json
//!         {
//!           "nodes": [
//!             {"id": "1", "type": "start", "label": "Begin"},
//!             {"id": "2", "type": "end", "label": "Done"}
//!           ],
//!           "edges": [{"id": "e1", "source": "1", "target": "2"}]
//!         }
//!         ```
//!     "#;
//!
//!     let graph = parse(source, BuildConfig::default())?;
//!     assert_eq!(graph.nodes_count(), 2);
//!     Ok(())
//! }
//! ```

mod build;
pub mod error;
mod fence;
mod locate;
mod raw;
mod span;

pub use build::BuildConfig;
pub use error::ParseError;
pub use span::Span;

use log::{debug, info, warn};

use flowsketch_core::semantic::Graph;

use build::Builder;
use error::Diagnostic;
use locate::ElementSpans;

/// Parse model output into a flowchart graph.
///
/// The pipeline runs these steps, stopping at the first one that fails:
///
/// 1. **Extract** - Locate the JSON among code fence markers and prose
/// 2. **Decode** - Parse the payload as JSON ([`ErrorCode::E001`])
/// 3. **Schema** - Check the `nodes` / `edges` shape ([`ErrorCode::E100`]-[`ErrorCode::E102`])
/// 4. **Validate** - Check ids and references ([`ErrorCode::E200`]-[`ErrorCode::E202`])
///
/// Warnings are logged and otherwise dropped; use [`parse_with_warnings`]
/// to receive them.
///
/// [`ErrorCode::E001`]: error::ErrorCode::E001
/// [`ErrorCode::E100`]: error::ErrorCode::E100
/// [`ErrorCode::E102`]: error::ErrorCode::E102
/// [`ErrorCode::E200`]: error::ErrorCode::E200
/// [`ErrorCode::E202`]: error::ErrorCode::E202
///
/// # Errors
///
/// Returns a [`ParseError`] holding every diagnostic of the failing step.
pub fn parse(source: &str, config: BuildConfig) -> Result<Graph, ParseError> {
    let (graph, warnings) = parse_with_warnings(source, config)?;
    for warning in &warnings {
        warn!(code:? = warning.code(); "{}", warning.message());
    }
    Ok(graph)
}

/// Like [`parse`], but returns the warnings alongside the graph.
pub fn parse_with_warnings(
    source: &str,
    config: BuildConfig,
) -> Result<(Graph, Vec<Diagnostic>), ParseError> {
    // Step 1: Extract
    let payload = fence::payload_span(source);
    debug!(start = payload.start(), len = payload.len(); "Located payload");

    // Step 2: Decode
    let value = raw::decode(source, payload)?;

    // Step 3: Schema
    let spans = ElementSpans::scan(source, payload);
    let document = raw::check_schema(&value, &spans)?;

    // Step 4: Validate
    let (graph, warnings) = Builder::new(config, &spans).build(document)?;
    info!(
        nodes = graph.nodes_count(),
        edges = graph.edges_count(),
        warnings = warnings.len();
        "Flowchart graph built"
    );

    Ok((graph, warnings))
}
