//! Configuration types for Flowsketch.
//!
//! These structures control how strictly input is validated, how flowcharts
//! are laid out and how they are styled. All types implement
//! [`serde::Deserialize`] so they can be loaded from external sources, and
//! every field has a default.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`ValidationConfig`] - Policies for unknown node kinds and missing labels.
//! - [`LayoutConfig`] - Direction, spacing and node sizes of the layered layout.
//! - [`StyleConfig`] - Visual options such as background color.
//!
//! # Example
//!
//! ```
//! # use flowsketch::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.layout().validate().is_ok());
//! assert!(config.style().background_color().is_ok());
//! ```

use serde::Deserialize;

use flowsketch_core::{
    color::Color,
    geometry::Size,
    semantic::{MissingLabelPolicy, NodeKind, UnknownKindPolicy},
};
use flowsketch_parser::BuildConfig;

use crate::layout::{Direction, EngineBuilder, NodeSizes};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Validation section.
    #[serde(default)]
    validation: ValidationConfig,

    /// Layout section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Style section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(validation: ValidationConfig, layout: LayoutConfig, style: StyleConfig) -> Self {
        Self {
            validation,
            layout,
            style,
        }
    }

    pub fn validation(&self) -> &ValidationConfig {
        &self.validation
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// How lenient the graph model builder is.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationConfig {
    /// What happens to a node kind outside the known set.
    #[serde(default)]
    unknown_kind: UnknownKindPolicy,

    /// What happens to a node without a label.
    #[serde(default)]
    missing_label: MissingLabelPolicy,
}

impl ValidationConfig {
    pub fn new(unknown_kind: UnknownKindPolicy, missing_label: MissingLabelPolicy) -> Self {
        Self {
            unknown_kind,
            missing_label,
        }
    }

    pub fn unknown_kind(&self) -> UnknownKindPolicy {
        self.unknown_kind
    }

    pub fn missing_label(&self) -> MissingLabelPolicy {
        self.missing_label
    }

    /// Returns the parser configuration for these policies.
    pub fn to_build_config(&self) -> BuildConfig {
        BuildConfig::new(self.unknown_kind, self.missing_label)
    }
}

/// Optional width and height override for one node kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SizeConfig {
    #[serde(default)]
    width: Option<f32>,
    #[serde(default)]
    height: Option<f32>,
}

impl SizeConfig {
    pub fn new(width: Option<f32>, height: Option<f32>) -> Self {
        Self { width, height }
    }

    fn apply(&self, base: Size) -> Size {
        Size::new(
            self.width.unwrap_or(base.width()),
            self.height.unwrap_or(base.height()),
        )
    }

    fn validate(&self, kind: NodeKind) -> Result<(), String> {
        for (name, value) in [("width", self.width), ("height", self.height)] {
            match value {
                Some(value) if !(value.is_finite() && value > 0.0) => {
                    return Err(format!(
                        "node_size.{kind}.{name} must be a positive number, got {value}"
                    ));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Per-kind node size overrides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeSizeConfig {
    #[serde(default)]
    start: SizeConfig,
    #[serde(default)]
    end: SizeConfig,
    #[serde(default)]
    process: SizeConfig,
    #[serde(default)]
    decision: SizeConfig,
}

impl NodeSizeConfig {
    fn get(&self, kind: NodeKind) -> &SizeConfig {
        match kind {
            NodeKind::Start => &self.start,
            NodeKind::End => &self.end,
            NodeKind::Process => &self.process,
            NodeKind::Decision => &self.decision,
        }
    }

    /// Applies the overrides on top of the default sizes.
    pub fn to_node_sizes(&self) -> NodeSizes {
        NodeKind::ALL
            .into_iter()
            .fold(NodeSizes::default(), |sizes, kind| {
                let size = self.get(kind).apply(sizes.get(kind));
                sizes.with_size(kind, size)
            })
    }
}

/// Settings of the layered layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutConfig {
    /// `TB` or `LR`.
    #[serde(default)]
    direction: Direction,

    #[serde(default = "default_node_spacing")]
    node_spacing: f32,

    #[serde(default = "default_rank_spacing")]
    rank_spacing: f32,

    #[serde(default = "default_component_spacing")]
    component_spacing: f32,

    /// Upper bound on crossing-reduction sweeps.
    #[serde(default = "default_crossing_passes")]
    crossing_passes: usize,

    #[serde(default)]
    node_size: NodeSizeConfig,
}

fn default_node_spacing() -> f32 {
    50.0
}

fn default_rank_spacing() -> f32 {
    60.0
}

fn default_component_spacing() -> f32 {
    50.0
}

fn default_crossing_passes() -> usize {
    24
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            direction: Direction::default(),
            node_spacing: default_node_spacing(),
            rank_spacing: default_rank_spacing(),
            component_spacing: default_component_spacing(),
            crossing_passes: default_crossing_passes(),
            node_size: NodeSizeConfig::default(),
        }
    }
}

impl LayoutConfig {
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn node_spacing(&self) -> f32 {
        self.node_spacing
    }

    pub fn rank_spacing(&self) -> f32 {
        self.rank_spacing
    }

    pub fn component_spacing(&self) -> f32 {
        self.component_spacing
    }

    pub fn crossing_passes(&self) -> usize {
        self.crossing_passes
    }

    pub fn node_size(&self) -> &NodeSizeConfig {
        &self.node_size
    }

    /// Checks that every spacing is a finite, non-negative number and every
    /// size override is positive.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first offending setting.
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("node_spacing", self.node_spacing),
            ("rank_spacing", self.rank_spacing),
            ("component_spacing", self.component_spacing),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(format!(
                    "{name} must be a non-negative number, got {value}"
                ));
            }
        }
        for kind in NodeKind::ALL {
            self.node_size.get(kind).validate(kind)?;
        }
        Ok(())
    }

    /// Returns an engine builder carrying these settings.
    pub fn engine_builder(&self) -> EngineBuilder {
        EngineBuilder::new()
            .with_direction(self.direction)
            .with_node_spacing(self.node_spacing)
            .with_rank_spacing(self.rank_spacing)
            .with_component_spacing(self.component_spacing)
            .with_crossing_passes(self.crossing_passes)
            .with_node_sizes(self.node_size.to_node_sizes())
    }
}

/// Background of SVG output when none is configured.
pub const DEFAULT_BACKGROUND_COLOR: &str = "#f8fafc";

/// Visual styling of rendered output.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleConfig {
    /// Background [`Color`] of SVG output, as a color string. `"none"`
    /// leaves the background transparent.
    #[serde(default = "default_background_color")]
    background_color: Option<String>,
}

fn default_background_color() -> Option<String> {
    Some(DEFAULT_BACKGROUND_COLOR.to_string())
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_color: default_background_color(),
        }
    }
}

impl StyleConfig {
    pub fn new(background_color: Option<String>) -> Self {
        Self { background_color }
    }

    /// Returns the parsed background [`Color`], or `None` if the background
    /// is transparent.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed
    /// into a valid [`Color`].
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_deref()
            .filter(|color| !color.trim().eq_ignore_ascii_case("none"))
            .map(Color::new)
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }
}
