//! Interactive Voronoi diagram core.
//!
//! A fixed set of generator points, each with a unique color, partitions a
//! raster surface into regions: every pixel takes the color of its nearest
//! point under the active distance metric. The crate provides the diagram
//! state ([`DiagramModel`]), the full-frame classification and marker
//! renderer ([`Renderer`]), and the pointer-event state machine
//! ([`Interaction`]) that turns raw pointer input into model commands.
//!
//! Windowing and presentation live in the `voronoi-app` binary; nothing in
//! this crate touches a display.

mod interact;
mod metric;
mod model;
mod point;
mod render;

pub use interact::{Interaction, PointerButton, PointerEvent};
pub use metric::DistanceMetric;
pub use model::{Command, DiagramModel};
pub use point::{GeneratorPoint, Position};
pub use render::{nearest_point, RenderConfig, Renderer};
pub use render::{DRAG_RADIUS, DRAW_RADIUS, HOVER_COLOR, MARKER_COLOR};

/// RGB color triple
pub type Rgb = [u8; 3];

/// Error type for diagram operations
#[derive(Debug, thiserror::Error)]
pub enum VoronoiError {
    #[error("no generator points to classify against")]
    NoPoints,
}

pub type Result<T> = std::result::Result<T, VoronoiError>;
