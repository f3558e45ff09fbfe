//! Flowsketch Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Flowsketch
//! parser, layout engine and exporters. It includes:
//!
//! - **Identifiers**: String-interned node and edge identifiers ([`identifier::Id`])
//! - **Colors**: CSS color handling ([`color::Color`])
//! - **Geometry**: Points, sizes and bounding boxes ([`geometry`] module)
//! - **Semantic**: The validated flowchart graph model ([`semantic`] module)
//! - **Draw**: SVG primitives for nodes and edges ([`draw`] module)

pub mod color;
pub mod draw;
pub mod geometry;
pub mod identifier;
pub mod semantic;
