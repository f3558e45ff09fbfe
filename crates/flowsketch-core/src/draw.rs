//! SVG drawing primitives for flowchart elements.
//!
//! Drawables produce [`LayeredOutput`] so that the exporter can stack edges
//! under nodes and text above both, regardless of the order in which
//! elements are visited.
//!
//! - [`NodeBox`] - A node shape with its centred label, styled per [`NodeKind`]
//! - [`Connector`] - A routed edge drawn as a smooth-step path with an arrowhead
//!
//! [`NodeKind`]: crate::semantic::NodeKind

mod connector;
mod layer;
mod node_box;

pub use connector::{Connector, ConnectorStyle, StepAxis, marker_definitions};
pub use layer::{LayeredOutput, RenderLayer, SvgNode};
pub use node_box::{NodeBox, NodeStyle};

use crate::geometry::{Point, Size};

/// Something that can render itself at a position.
pub trait Drawable {
    /// Renders the drawable centred on `position`.
    fn render_to_layers(&self, position: Point) -> LayeredOutput;

    /// Returns the size of the drawable.
    fn size(&self) -> Size;
}

/// Approximate advance width of one label character at the default font size.
pub(crate) const CHAR_WIDTH: f32 = 6.5;
