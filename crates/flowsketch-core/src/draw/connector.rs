//! Edge paths.
//!
//! A [`Connector`] is drawn through its routed points. Consecutive points
//! that are not axis-aligned are joined by a step (out along the main axis,
//! across, and in again) and every corner is rounded, which gives the
//! "smooth step" look of interactive flowchart editors.

use std::fmt::Write as _;

use svg::node::element as svg_element;

use crate::{
    color::Color,
    draw::{CHAR_WIDTH, LayeredOutput, RenderLayer},
    geometry::Point,
};

/// The axis along which a step leaves its start point.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StepAxis {
    /// Leave vertically, used for top-to-bottom flowcharts
    #[default]
    Vertical,
    /// Leave horizontally, used for left-to-right flowcharts
    Horizontal,
}

/// Stroke settings shared by all connectors of a diagram.
#[derive(Debug, Clone)]
pub struct ConnectorStyle {
    color: Color,
    width: f32,
    corner_radius: f32,
    axis: StepAxis,
}

impl ConnectorStyle {
    pub fn new(axis: StepAxis) -> Self {
        Self {
            color: Color::new("#9ca3af").expect("built-in edge color is valid"),
            width: 1.5,
            corner_radius: 8.0,
            axis,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    fn marker_id(&self) -> String {
        format!("arrow-{}", self.color.to_id_safe_string())
    }
}

/// Builds the `<defs>` holding the arrowhead marker for `style`.
pub fn marker_definitions(style: &ConnectorStyle) -> svg_element::Definitions {
    let marker = svg_element::Marker::new()
        .set("id", style.marker_id())
        .set("viewBox", "0 0 10 10")
        .set("refX", 9)
        .set("refY", 5)
        .set("markerWidth", 7)
        .set("markerHeight", 7)
        .set("orient", "auto-start-reverse")
        .add(
            svg_element::Path::new()
                .set("d", "M 0 0 L 10 5 L 0 10 z")
                .set("fill", &style.color),
        );
    svg_element::Definitions::new().add(marker)
}

/// A routed edge ready to be drawn.
#[derive(Debug, Clone)]
pub struct Connector<'a> {
    points: &'a [Point],
    label: Option<&'a str>,
    label_position: Option<Point>,
    dashed: bool,
    axis: Option<StepAxis>,
}

impl<'a> Connector<'a> {
    pub fn new(points: &'a [Point]) -> Self {
        Self {
            points,
            label: None,
            label_position: None,
            dashed: false,
            axis: None,
        }
    }

    pub fn with_label(mut self, label: Option<&'a str>, position: Option<Point>) -> Self {
        self.label = label;
        self.label_position = position;
        self
    }

    /// Draws the path dashed, used to set back-edges apart from the main flow.
    pub fn with_dashed(mut self, dashed: bool) -> Self {
        self.dashed = dashed;
        self
    }

    /// Overrides the step axis of the style for this connector only.
    pub fn with_axis(mut self, axis: StepAxis) -> Self {
        self.axis = Some(axis);
        self
    }

    /// Renders the path into the edge layer and its label into the text layer.
    pub fn render_to_layers(&self, style: &ConnectorStyle) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        if self.points.len() < 2 {
            return output;
        }

        let mut path = svg_element::Path::new()
            .set(
                "d",
                path_data(
                    self.points,
                    self.axis.unwrap_or(style.axis),
                    style.corner_radius,
                ),
            )
            .set("fill", "none")
            .set("stroke", &style.color)
            .set("stroke-width", style.width)
            .set("marker-end", format!("url(#{})", style.marker_id()));
        if self.dashed {
            path = path.set("stroke-dasharray", "5,5");
        }
        output.add_to_layer(RenderLayer::Edge, Box::new(path));

        if let (Some(label), Some(position)) = (self.label, self.label_position) {
            let width = label.chars().count() as f32 * CHAR_WIDTH + 8.0;
            let background = svg_element::Rectangle::new()
                .set("x", position.x() - width / 2.0)
                .set("y", position.y() - 8.0)
                .set("width", width)
                .set("height", 16.0)
                .set("rx", 4.0)
                .set("fill", "white");
            let text = svg_element::Text::new(label)
                .set("x", position.x())
                .set("y", position.y())
                .set("text-anchor", "middle")
                .set("dominant-baseline", "central")
                .set("font-family", "sans-serif")
                .set("font-size", 11.0)
                .set("fill", "#4b5563");
            output.add_to_layer(RenderLayer::Text, Box::new(background));
            output.add_to_layer(RenderLayer::Text, Box::new(text));
        }

        output
    }
}

/// Expands routed points into an axis-aligned polyline.
///
/// A bend is inserted half way between two points that differ on both axes.
fn orthogonalize(points: &[Point], axis: StepAxis) -> Vec<Point> {
    let mut result: Vec<Point> = Vec::with_capacity(points.len() * 3);
    for window in points.windows(2) {
        let (from, to) = (window[0], window[1]);
        if result.is_empty() {
            result.push(from);
        }
        let aligned = from.x() == to.x() || from.y() == to.y();
        if !aligned {
            let mid = from.midpoint(to);
            match axis {
                StepAxis::Vertical => {
                    result.push(Point::new(from.x(), mid.y()));
                    result.push(Point::new(to.x(), mid.y()));
                }
                StepAxis::Horizontal => {
                    result.push(Point::new(mid.x(), from.y()));
                    result.push(Point::new(mid.x(), to.y()));
                }
            }
        }
        result.push(to);
    }
    result.dedup();
    result
}

/// Builds SVG path data for `points` with corners rounded by `radius`.
fn path_data(points: &[Point], axis: StepAxis, radius: f32) -> String {
    let polyline = orthogonalize(points, axis);
    let mut data = String::new();
    let Some(first) = polyline.first() else {
        return data;
    };
    let _ = write!(data, "M {} {}", first.x(), first.y());

    for i in 1..polyline.len() {
        let corner = polyline[i];
        let Some(&next) = polyline.get(i + 1) else {
            let _ = write!(data, " L {} {}", corner.x(), corner.y());
            break;
        };
        let prev = polyline[i - 1];
        let incoming = distance(prev, corner);
        let outgoing = distance(corner, next);
        let r = radius.min(incoming / 2.0).min(outgoing / 2.0);
        if r <= 0.0 {
            let _ = write!(data, " L {} {}", corner.x(), corner.y());
            continue;
        }
        let entry = toward(corner, prev, r);
        let exit = toward(corner, next, r);
        let _ = write!(
            data,
            " L {} {} Q {} {} {} {}",
            entry.x(),
            entry.y(),
            corner.x(),
            corner.y(),
            exit.x(),
            exit.y()
        );
    }

    data
}

fn distance(a: Point, b: Point) -> f32 {
    (b.x() - a.x()).hypot(b.y() - a.y())
}

/// Returns the point `length` away from `from` in the direction of `to`.
fn toward(from: Point, to: Point, length: f32) -> Point {
    let total = distance(from, to);
    if total == 0.0 {
        return from;
    }
    let t = length / total;
    Point::new(
        from.x() + (to.x() - from.x()) * t,
        from.y() + (to.y() - from.y()) * t,
    )
}
