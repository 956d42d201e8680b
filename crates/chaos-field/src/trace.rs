//! Short-lived connector lines that fade out.

use chaos_core::FieldConfig;

use crate::surface::{Path, Point, Stroke, Surface};

/// Route taken between two endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceShape {
    /// Straight line.
    Direct,
    /// Horizontal first, turning at `(to.x, from.y)`.
    HorizontalVertical,
    /// Vertical first, turning at `(from.x, to.y)`.
    VerticalHorizontal,
}

impl TraceShape {
    /// Path from `from` to `to` along this route.
    pub fn route(self, from: Point, to: Point) -> Path {
        let path = Path::new().move_to(from.x, from.y);
        let path = match self {
            TraceShape::Direct => path,
            TraceShape::HorizontalVertical => path.line_to(to.x, from.y),
            TraceShape::VerticalHorizontal => path.line_to(from.x, to.y),
        };
        path.line_to(to.x, to.y)
    }
}

/// A fading line between two points.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub from: Point,
    pub to: Point,
    pub shape: TraceShape,
    opacity: f64,
    fade: f64,
}

impl Trace {
    /// A fully opaque trace losing `fade` opacity per frame.
    pub fn new(from: Point, to: Point, shape: TraceShape, fade: f64) -> Self {
        Self {
            from,
            to,
            shape,
            opacity: 1.0,
            fade,
        }
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn fade(&self) -> f64 {
        self.fade
    }

    pub fn is_alive(&self) -> bool {
        self.opacity > 0.0
    }

    pub fn update(&mut self) {
        self.opacity -= self.fade;
    }

    pub fn draw(&self, surface: &mut impl Surface, config: &FieldConfig) {
        if !self.is_alive() {
            return;
        }
        let trail = &config.trail;
        surface.stroke(
            &self.shape.route(self.from, self.to),
            &Stroke::solid(trail.color.alpha(self.opacity * trail.opacity), trail.width),
        );
    }
}
