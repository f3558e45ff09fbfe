//! SVG export.
//!
//! Renders a static preview of a [`Layout`]: node shapes per kind,
//! smooth-step edges with arrowheads and edge labels, stacked by
//! [`RenderLayer`] so edges always sit under nodes.

use std::io::Write;

use log::{debug, error, info};
use svg::{Document, node::element as svg_element};

use flowsketch_core::{
    color::Color,
    draw::{
        Connector, ConnectorStyle, Drawable, LayeredOutput, NodeBox, RenderLayer, StepAxis,
        marker_definitions,
    },
    geometry::Size,
};

use crate::{
    export::{self, Exporter},
    layout::{Direction, EdgeKind, Layout},
};

/// Blank space around the drawing.
const MARGIN: f32 = 40.0;

/// Writes a [`Layout`] as an SVG document.
pub struct SvgExporter<W: Write> {
    writer: W,
    background: Option<Color>,
}

impl<W: Write> SvgExporter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            background: None,
        }
    }

    /// Fills the whole document with `color`, or leaves it transparent.
    pub fn with_background(mut self, color: Option<Color>) -> Self {
        self.background = color;
        self
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Builds the SVG document for `layout`.
    pub fn render_layout(&self, layout: &Layout) -> Document {
        let content = layout.size();
        let size = Size::new(
            content.width() + MARGIN * 2.0,
            content.height() + MARGIN * 2.0,
        );
        debug!(width = size.width(), height = size.height(); "Final SVG dimensions");

        let (axis, cross_axis) = match layout.direction() {
            Direction::TopToBottom => (StepAxis::Vertical, StepAxis::Horizontal),
            Direction::LeftToRight => (StepAxis::Horizontal, StepAxis::Vertical),
        };
        let style = ConnectorStyle::new(axis);

        let mut output = LayeredOutput::new();
        if let Some(color) = self.background {
            let background = svg_element::Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", size.width())
                .set("height", size.height())
                .set("fill", &color);
            output.add_to_layer(RenderLayer::Background, Box::new(background));
        }

        let mut content_output = LayeredOutput::new();
        for edge in layout.edges() {
            let mut connector = Connector::new(edge.points())
                .with_label(edge.label(), edge.label_position());
            if edge.kind() != EdgeKind::Forward {
                connector = connector
                    .with_dashed(edge.kind() == EdgeKind::Back)
                    .with_axis(cross_axis);
            }
            content_output.merge(connector.render_to_layers(&style));
        }
        for node in layout.nodes() {
            let node_box = NodeBox::new(node.kind(), node.label(), node.size());
            content_output.merge(node_box.render_to_layers(node.center()));
        }

        let mut main_group = svg_element::Group::new()
            .set("transform", format!("translate({MARGIN}, {MARGIN})"));
        for group in content_output.render() {
            main_group = main_group.add(group);
        }

        let mut doc = Document::new()
            .set("viewBox", format!("0 0 {} {}", size.width(), size.height()))
            .set("width", size.width())
            .set("height", size.height())
            .add(marker_definitions(&style));
        for group in output.render() {
            doc = doc.add(group);
        }
        doc.add(main_group)
    }
}

impl<W: Write> Exporter for SvgExporter<W> {
    fn export_layout(&mut self, layout: &Layout) -> Result<(), export::Error> {
        let doc = self.render_layout(layout);
        debug!("SVG document rendered");

        if let Err(err) = write!(self.writer, "{doc}").and_then(|()| self.writer.flush()) {
            error!(err:err; "Failed to write SVG content");
            return Err(export::Error::Io(err));
        }

        info!(nodes = layout.nodes().len(), edges = layout.edges().len(); "SVG written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use flowsketch_core::{
        identifier::Id,
        semantic::{Edge, Graph, Node, NodeKind},
    };

    use super::*;
    use crate::layout::Engine;

    fn render(graph: &Graph, background: Option<Color>) -> String {
        let layout = Engine::new().calculate(graph);
        let mut exporter = SvgExporter::new(Vec::new()).with_background(background);
        exporter.export_layout(&layout).unwrap();
        String::from_utf8(exporter.into_inner()).unwrap()
    }

    #[test]
    fn test_renders_nodes_edges_and_labels() {
        let graph = Graph::new(
            vec![
                Node::new(Id::new("a"), NodeKind::Start, "Begin"),
                Node::new(Id::new("b"), NodeKind::Decision, "Ready?"),
            ],
            vec![Edge::new(Id::new("e"), Id::new("a"), Id::new("b")).with_label("go")],
        )
        .unwrap();
        let svg = render(&graph, None);

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("<marker"));
        assert!(svg.contains("<polygon"));
        assert!(svg.contains("Begin"));
        assert!(svg.contains("go"));
        assert!(!svg.contains(r#"data-layer="background""#));

        let edge_layer = svg.find(r#"data-layer="edge""#).unwrap();
        let node_layer = svg.find(r#"data-layer="node""#).unwrap();
        assert!(edge_layer < node_layer);
    }

    #[test]
    fn test_back_edge_is_dashed() {
        let graph = Graph::new(
            vec![
                Node::new(Id::new("a"), NodeKind::Process, "A"),
                Node::new(Id::new("b"), NodeKind::Process, "B"),
            ],
            vec![
                Edge::new(Id::new("e1"), Id::new("a"), Id::new("b")),
                Edge::new(Id::new("e2"), Id::new("b"), Id::new("a")),
            ],
        )
        .unwrap();
        let svg = render(&graph, None);

        assert!(svg.contains("stroke-dasharray"));
    }

    #[test]
    fn test_background_and_empty_layout() {
        let svg = render(&Graph::default(), Color::new("white").ok());

        assert!(svg.contains(r#"data-layer="background""#));
        assert!(svg.contains(r#"viewBox="0 0 80 80""#));
    }
}
