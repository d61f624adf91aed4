//! Full-frame classification and marker rendering.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::metric::DistanceMetric;
use crate::model::DiagramModel;
use crate::point::{GeneratorPoint, Position};
use crate::{Result, Rgb, VoronoiError};

/// Default marker radius in pixels.
pub const DRAW_RADIUS: f64 = 4.0;
/// Default radius for the hovered/dragged marker, also the grab radius.
pub const DRAG_RADIUS: f64 = 6.0;
/// Default marker color.
pub const MARKER_COLOR: Rgb = [0, 0, 0];
/// Default color for the hovered/dragged marker.
pub const HOVER_COLOR: Rgb = [255, 0, 0];

/// Marker tunables for [`Renderer`].
#[derive(Debug, Clone, Copy)]
pub struct RenderConfig {
    pub draw_radius: f64,
    pub drag_radius: f64,
    pub marker_color: Rgb,
    pub hover_color: Rgb,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            draw_radius: DRAW_RADIUS,
            drag_radius: DRAG_RADIUS,
            marker_color: MARKER_COLOR,
            hover_color: HOVER_COLOR,
        }
    }
}

/// Stateless full-frame renderer.
///
/// Every call recomputes the entire surface from the current model: a
/// classification pass colors each pixel by its nearest generator point,
/// then a marker overlay pass draws a filled circle per point. Nothing is
/// cached between calls, so `render` is a pure function of
/// (points, metric, hover, surface dimensions).
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Classify every pixel, then overlay point markers.
    ///
    /// The only failure is an empty point set, which the model invariants
    /// forbid; callers log it and skip the frame rather than aborting.
    pub fn render(&self, model: &DiagramModel, frame: &mut image::RgbImage) -> Result<()> {
        self.classify(model, frame)?;
        self.draw_markers(model, frame);
        Ok(())
    }

    /// Brute-force nearest-point pass, O(width x height x point count).
    ///
    /// With the `parallel` feature the rows are distributed over Rayon
    /// workers; rows are disjoint slices, each pixel is written exactly
    /// once, and the per-pixel tie-break is unaffected by the split, so
    /// both paths produce identical frames.
    fn classify(&self, model: &DiagramModel, frame: &mut image::RgbImage) -> Result<()> {
        if model.points().is_empty() {
            return Err(VoronoiError::NoPoints);
        }

        let points = model.points();
        let metric = model.metric();
        let row_len = frame.width() as usize * 3;
        if row_len == 0 {
            return Ok(());
        }
        let raw: &mut [u8] = frame;

        #[cfg(feature = "parallel")]
        raw.par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| classify_row(points, metric, y, row));

        #[cfg(not(feature = "parallel"))]
        for (y, row) in raw.chunks_mut(row_len).enumerate() {
            classify_row(points, metric, y, row);
        }

        Ok(())
    }

    /// Draw a filled circular marker over each point, the hovered one
    /// distinguished by radius and color. Runs strictly after
    /// classification so markers are never overwritten by region colors.
    fn draw_markers(&self, model: &DiagramModel, frame: &mut image::RgbImage) {
        for (i, point) in model.points().iter().enumerate() {
            let (radius, color) = if model.hover() == Some(i) {
                (self.config.drag_radius, self.config.hover_color)
            } else {
                (self.config.draw_radius, self.config.marker_color)
            };
            fill_circle(frame, point.pos, radius, color);
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

fn classify_row(points: &[GeneratorPoint], metric: DistanceMetric, y: usize, row: &mut [u8]) {
    for (x, pixel) in row.chunks_exact_mut(3).enumerate() {
        match nearest_point(points, metric, x as f64, y as f64) {
            Some(winner) => pixel.copy_from_slice(&points[winner].color),
            // unreachable while the point set is non-empty; the pixel
            // keeps its previous color
            None => tracing::error!(x, y, "no generator point won the pixel"),
        }
    }
}

/// Index of the generator point nearest to `(x, y)` under `metric`.
///
/// Ties break toward the first point seen: a later point at an equal
/// distance never replaces the current winner.
pub fn nearest_point(
    points: &[GeneratorPoint],
    metric: DistanceMetric,
    x: f64,
    y: f64,
) -> Option<usize> {
    let probe = Position::new(x, y);
    let mut best = f64::INFINITY;
    let mut winner = None;

    for (i, point) in points.iter().enumerate() {
        let d = metric.distance(&point.pos, &probe);
        if d < best {
            best = d;
            winner = Some(i);
        }
    }

    winner
}

/// Fill the circle of `radius` around `center`, clipping to the surface.
/// Pixels whose coordinates are within `radius` (inclusive) of the center
/// are painted; a center dragged off-surface simply clips away.
fn fill_circle(frame: &mut image::RgbImage, center: Position, radius: f64, color: Rgb) {
    let w = i64::from(frame.width());
    let h = i64::from(frame.height());
    let x_min = ((center.x - radius).floor() as i64).max(0);
    let x_max = ((center.x + radius).ceil() as i64).min(w - 1);
    let y_min = ((center.y - radius).floor() as i64).max(0);
    let y_max = ((center.y + radius).ceil() as i64).min(h - 1);

    for y in y_min..=y_max {
        for x in x_min..=x_max {
            let dx = x as f64 - center.x;
            let dy = y as f64 - center.y;
            if dx * dx + dy * dy <= radius * radius {
                frame.put_pixel(x as u32, y as u32, image::Rgb(color));
            }
        }
    }
}
