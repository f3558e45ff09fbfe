//! Node shapes.

use svg::node::element as svg_element;

use crate::{
    color::Color,
    draw::{CHAR_WIDTH, Drawable, LayeredOutput, RenderLayer},
    geometry::{Point, Size},
    semantic::NodeKind,
};

/// Colors and stroke used to paint one node kind.
#[derive(Debug, Clone)]
pub struct NodeStyle {
    fill: Color,
    stroke: Color,
    text: Color,
    stroke_width: f32,
    font_size: f32,
}

impl NodeStyle {
    /// Returns the built-in style for `kind`.
    ///
    /// Start and end nodes use emerald and rose accents, process steps blue,
    /// and decisions an amber diamond.
    pub fn for_kind(kind: NodeKind) -> Self {
        let (fill, stroke, text) = match kind {
            NodeKind::Start => ("#ecfdf5", "#10b981", "#1f2937"),
            NodeKind::End => ("#fff1f2", "#f43f5e", "#1f2937"),
            NodeKind::Process => ("#eff6ff", "#3b82f6", "#1f2937"),
            NodeKind::Decision => ("#fffbeb", "#f59e0b", "#92400e"),
        };
        Self {
            fill: Color::new(fill).expect("built-in fill color is valid"),
            stroke: Color::new(stroke).expect("built-in stroke color is valid"),
            text: Color::new(text).expect("built-in text color is valid"),
            stroke_width: 1.5,
            font_size: 12.0,
        }
    }

    pub fn stroke(&self) -> Color {
        self.stroke
    }
}

/// A node shape of fixed size with a single-line, centred label.
#[derive(Debug, Clone)]
pub struct NodeBox {
    kind: NodeKind,
    label: String,
    size: Size,
    style: NodeStyle,
}

impl NodeBox {
    pub fn new(kind: NodeKind, label: impl Into<String>, size: Size) -> Self {
        Self {
            kind,
            label: label.into(),
            size,
            style: NodeStyle::for_kind(kind),
        }
    }

    /// Returns the label, shortened with an ellipsis when it cannot fit the shape.
    pub fn display_label(&self) -> String {
        // Diamonds only have about half their width available at the centre line.
        let usable = match self.kind {
            NodeKind::Decision => self.size.width() * 0.6,
            _ => self.size.width() - 16.0,
        };
        let max_chars = (usable / CHAR_WIDTH).floor().max(1.0) as usize;
        let count = self.label.chars().count();
        if count <= max_chars {
            return self.label.clone();
        }
        let kept: String = self.label.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", kept.trim_end())
    }

    fn shape(&self, center: Point) -> Box<dyn svg::Node> {
        let width = self.size.width();
        let height = self.size.height();
        let min_x = center.x() - width / 2.0;
        let min_y = center.y() - height / 2.0;

        match self.kind {
            NodeKind::Decision => {
                let points = format!(
                    "{},{} {},{} {},{} {},{}",
                    center.x(),
                    min_y,
                    min_x + width,
                    center.y(),
                    center.x(),
                    min_y + height,
                    min_x,
                    center.y(),
                );
                Box::new(
                    svg_element::Polygon::new()
                        .set("points", points)
                        .set("fill", &self.style.fill)
                        .set("stroke", &self.style.stroke)
                        .set("stroke-width", self.style.stroke_width),
                )
            }
            NodeKind::Start | NodeKind::End | NodeKind::Process => {
                let radius = match self.kind {
                    NodeKind::Process => 12.0_f32.min(height / 2.0),
                    _ => height / 2.0,
                };
                Box::new(
                    svg_element::Rectangle::new()
                        .set("x", min_x)
                        .set("y", min_y)
                        .set("width", width)
                        .set("height", height)
                        .set("rx", radius)
                        .set("ry", radius)
                        .set("fill", &self.style.fill)
                        .set("stroke", &self.style.stroke)
                        .set("stroke-width", self.style.stroke_width),
                )
            }
        }
    }
}

impl Drawable for NodeBox {
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        output.add_to_layer(RenderLayer::Node, self.shape(position));

        let text = svg_element::Text::new(self.display_label())
            .set("x", position.x())
            .set("y", position.y())
            .set("text-anchor", "middle")
            .set("dominant-baseline", "central")
            .set("font-family", "sans-serif")
            .set("font-size", self.style.font_size)
            .set("fill", &self.style.text);
        output.add_to_layer(RenderLayer::Text, Box::new(text));

        output
    }

    fn size(&self) -> Size {
        self.size
    }
}
