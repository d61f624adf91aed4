//! Diagram state: generator points, active metric, hover reference.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::metric::DistanceMetric;
use crate::point::{GeneratorPoint, Position};
use crate::Rgb;

/// Attempts at a fresh random color before falling back to a linear probe
/// of the packed 24-bit space.
const COLOR_RETRY_LIMIT: usize = 64;

/// A single model mutation.
///
/// Commands are produced by the interaction layer and applied sequentially
/// by whoever owns the model; each applied command warrants exactly one
/// redraw request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    SetHover(Option<usize>),
    MovePoint { index: usize, x: f64, y: f64 },
    ToggleMetric,
}

/// The generator points, their colors, the active distance metric, and the
/// currently hovered or dragged point. Pure data plus mutation operations;
/// rendering lives in [`crate::Renderer`].
///
/// The point set is created once and its cardinality never changes; drags
/// mutate positions in place. `hover`, when set, always indexes into
/// `points`.
#[derive(Debug, Clone)]
pub struct DiagramModel {
    points: Vec<GeneratorPoint>,
    metric: DistanceMetric,
    hover: Option<usize>,
}

impl DiagramModel {
    pub fn new(points: Vec<GeneratorPoint>, metric: DistanceMetric) -> Self {
        Self {
            points,
            metric,
            hover: None,
        }
    }

    /// Create `count` points at seeded random positions with pairwise
    /// distinct colors.
    ///
    /// Positions are drawn uniformly from the centered `spawn_fraction`
    /// rectangle of a `width` x `height` surface (fraction 0.5 gives
    /// `[w/4, 3w/4) x [h/4, 3h/4)`). The same seed reproduces the same
    /// point set exactly.
    pub fn random(count: usize, width: f64, height: f64, spawn_fraction: f64, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let x0 = width * (1.0 - spawn_fraction) / 2.0;
        let y0 = height * (1.0 - spawn_fraction) / 2.0;

        let mut points: Vec<GeneratorPoint> = Vec::with_capacity(count);
        for _ in 0..count {
            let pos = Position::new(
                x0 + rng.gen::<f64>() * width * spawn_fraction,
                y0 + rng.gen::<f64>() * height * spawn_fraction,
            );
            let color = distinct_color(&mut rng, &points);
            points.push(GeneratorPoint::new(pos, color));
        }
        Self::new(points, DistanceMetric::Euclidean)
    }

    pub fn points(&self) -> &[GeneratorPoint] {
        &self.points
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    pub fn hover(&self) -> Option<usize> {
        self.hover
    }

    pub fn set_metric(&mut self, metric: DistanceMetric) {
        self.metric = metric;
    }

    pub fn toggle_metric(&mut self) {
        self.metric = self.metric.toggled();
    }

    /// Overwrite a point's position.
    ///
    /// Positions are not clamped to the surface; a drag may leave a point
    /// outside the visible area.
    pub fn move_point(&mut self, index: usize, x: f64, y: f64) {
        self.points[index].pos = Position::new(x, y);
    }

    /// Update the hover reference. `Some(index)` must name a member of the
    /// point sequence.
    pub fn set_hover(&mut self, hover: Option<usize>) {
        debug_assert!(hover.map_or(true, |i| i < self.points.len()));
        self.hover = hover;
    }

    /// First point in stored order within `radius` (inclusive) of `(x, y)`.
    ///
    /// Proximity is always Euclidean, independent of the active diagram
    /// metric, and the scan stops at the first qualifying point rather
    /// than the closest one.
    pub fn nearest_within(&self, x: f64, y: f64, radius: f64) -> Option<usize> {
        let probe = Position::new(x, y);
        self.points.iter().position(|p| p.pos.dist(&probe) <= radius)
    }

    /// Apply one command.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::SetHover(hover) => self.set_hover(hover),
            Command::MovePoint { index, x, y } => self.move_point(index, x, y),
            Command::ToggleMetric => self.toggle_metric(),
        }
    }
}

/// Draw a color not already used by `points`.
///
/// Random sampling with a bounded retry count; on exhaustion falls back to
/// [`probe_color`], so generation terminates whenever fewer than 2^24
/// colors are taken.
fn distinct_color(rng: &mut ChaCha8Rng, points: &[GeneratorPoint]) -> Rgb {
    for _ in 0..COLOR_RETRY_LIMIT {
        let color: Rgb = rng.gen();
        if !points.iter().any(|p| p.color == color) {
            return color;
        }
    }
    probe_color(rng.gen(), points)
}

/// First free color at or after `start` in packed-RGB order, wrapping at
/// the end of the 24-bit space.
fn probe_color(start: Rgb, points: &[GeneratorPoint]) -> Rgb {
    let mut packed = u32::from(start[0]) << 16 | u32::from(start[1]) << 8 | u32::from(start[2]);
    loop {
        let color = [(packed >> 16) as u8, (packed >> 8) as u8, packed as u8];
        if !points.iter().any(|p| p.color == color) {
            return color;
        }
        packed = (packed + 1) & 0xFF_FFFF;
    }
}
