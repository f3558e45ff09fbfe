//! Flowsketch - layout and rendering for AI-generated flowcharts.
//!
//! Turns the JSON a language model produced for a flowchart into a
//! validated graph, lays it out in ranks, and renders the result as JSON for
//! interactive render surfaces or as a static SVG preview.

pub mod config;
pub mod export;
pub mod layout;

mod error;
mod structure;

pub use flowsketch_core::{color, draw, geometry, identifier, semantic};
pub use flowsketch_parser::{ParseError, error::Diagnostic};

pub use error::FlowsketchError;

use log::{debug, info, trace};

use config::AppConfig;
use export::{Exporter, json::JsonExporter, svg::SvgExporter};
use layout::Layout;

/// Builder for parsing, laying out and rendering flowcharts.
///
/// # Examples
///
/// ```rust
/// use flowsketch::{FlowchartBuilder, config::AppConfig};
///
/// let source = r#"{
///     "nodes": [
///         {"id": "1", "type": "start", "label": "Begin"},
///         {"id": "2", "type": "end", "label": "Done"}
///     ],
///     "edges": [{"id": "e1", "source": "1", "target": "2"}]
/// }"#;
///
/// let builder = FlowchartBuilder::new(AppConfig::default());
///
/// // Parse source to the graph model
/// let graph = builder.parse(source).expect("Failed to parse");
///
/// // Lay it out
/// let layout = builder.layout(&graph);
/// assert_eq!(layout.nodes().len(), 2);
///
/// // Or go straight to SVG
/// let svg = builder.render_svg(&graph).expect("Failed to render");
/// assert!(svg.contains("Begin"));
/// ```
#[derive(Debug, Default)]
pub struct FlowchartBuilder {
    config: AppConfig,
}

impl FlowchartBuilder {
    /// Create a new flowchart builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration including validation, layout and style settings
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse model output into a validated graph.
    ///
    /// # Arguments
    ///
    /// * `source` - JSON text, optionally wrapped in a Markdown code fence
    ///
    /// # Errors
    ///
    /// Returns `FlowsketchError::Parse` carrying every diagnostic when the
    /// text is not valid JSON, does not have the flowchart shape, or fails
    /// validation.
    pub fn parse(&self, source: &str) -> Result<semantic::Graph, FlowsketchError> {
        info!("Parsing flowchart");

        let build_config = self.config.validation().to_build_config();
        let graph = flowsketch_parser::parse(source, build_config)
            .map_err(|err| FlowsketchError::new_parse_error(err, source))?;

        debug!(
            nodes = graph.nodes_count(),
            edges = graph.edges_count();
            "Flowchart parsed successfully"
        );
        trace!(graph:?; "Parsed graph");

        Ok(graph)
    }

    /// Lay out a graph with the configured engine settings.
    pub fn layout(&self, graph: &semantic::Graph) -> Layout {
        info!("Calculating layout");
        self.config.layout().engine_builder().build().calculate(graph)
    }

    /// Render a graph's layout as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns `FlowsketchError::Config` for invalid layout settings and
    /// `FlowsketchError::Export` if serialization fails.
    pub fn render_json(&self, graph: &semantic::Graph) -> Result<String, FlowsketchError> {
        let layout = self.checked_layout(graph)?;

        let mut exporter = JsonExporter::new(Vec::new());
        exporter.export_layout(&layout)?;

        into_string(exporter.into_inner())
    }

    /// Render a graph as an SVG document.
    ///
    /// # Errors
    ///
    /// Returns `FlowsketchError::Config` for invalid layout settings or an
    /// invalid background color, and `FlowsketchError::Export` for rendering
    /// errors.
    pub fn render_svg(&self, graph: &semantic::Graph) -> Result<String, FlowsketchError> {
        let background = self
            .config
            .style()
            .background_color()
            .map_err(FlowsketchError::Config)?;
        let layout = self.checked_layout(graph)?;

        let mut exporter = SvgExporter::new(Vec::new()).with_background(background);
        exporter.export_layout(&layout)?;

        info!("SVG rendered successfully");
        into_string(exporter.into_inner())
    }

    fn checked_layout(&self, graph: &semantic::Graph) -> Result<Layout, FlowsketchError> {
        self.config
            .layout()
            .validate()
            .map_err(FlowsketchError::Config)?;
        Ok(self.layout(graph))
    }
}

fn into_string(bytes: Vec<u8>) -> Result<String, FlowsketchError> {
    String::from_utf8(bytes).map_err(|err| FlowsketchError::Export(Box::new(err)))
}
