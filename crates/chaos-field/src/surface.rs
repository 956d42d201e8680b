//! The drawing boundary between the field and whatever displays it.

use std::f64::consts::TAU;

use chaos_core::{DashPattern, Rgba};

/// A point in logical (viewport) pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// One path-building command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    MoveTo(Point),
    LineTo(Point),
    /// Clockwise arc from `start` to `end` radians; joined to the current point by a line.
    Arc {
        center: Point,
        radius: f64,
        start: f64,
        end: f64,
    },
}

/// A sequence of path segments, built like a 2D canvas path.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        self.segments.push(Segment::MoveTo(Point::new(x, y)));
        self
    }

    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        self.segments.push(Segment::LineTo(Point::new(x, y)));
        self
    }

    pub fn arc(mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) -> Self {
        self.segments.push(Segment::Arc {
            center: Point::new(x, y),
            radius,
            start,
            end,
        });
        self
    }

    /// A full circle, as used for filled dots.
    pub fn circle(x: f64, y: f64, radius: f64) -> Self {
        Self::new().arc(x, y, radius, 0.0, TAU)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Polyline approximation of each subpath.
    ///
    /// Arcs are split so no chord is longer than `max_chord` logical pixels.
    pub fn flatten(&self, max_chord: f64) -> Vec<Vec<Point>> {
        let mut subpaths: Vec<Vec<Point>> = Vec::new();
        let mut current: Vec<Point> = Vec::new();

        for segment in &self.segments {
            match *segment {
                Segment::MoveTo(p) => {
                    if current.len() > 1 {
                        subpaths.push(std::mem::take(&mut current));
                    }
                    current.clear();
                    current.push(p);
                }
                Segment::LineTo(p) => current.push(p),
                Segment::Arc {
                    center,
                    radius,
                    start,
                    end,
                } => {
                    let sweep = end - start;
                    let length = sweep.abs() * radius;
                    let steps = ((length / max_chord.max(f64::EPSILON)).ceil() as usize).clamp(8, 720);
                    for i in 0..=steps {
                        let angle = start + sweep * i as f64 / steps as f64;
                        current.push(Point::new(
                            center.x + radius * angle.cos(),
                            center.y + radius * angle.sin(),
                        ));
                    }
                }
            }
        }
        if current.len() > 1 {
            subpaths.push(current);
        }
        subpaths
    }
}

/// Stroke style for a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgba,
    /// Line width in logical pixels.
    pub width: f64,
    pub dash: Option<DashPattern>,
}

impl Stroke {
    pub fn solid(color: Rgba, width: f64) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub fn dashed(color: Rgba, width: f64, dash: DashPattern) -> Self {
        Self {
            color,
            width,
            dash: Some(dash),
        }
    }
}

/// Raw RGBA8 pixels in device pixels, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageData {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl ImageData {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height * 4],
        }
    }

    /// RGBA bytes of the pixel at `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = (y * self.width + x) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }
}

/// A 2D drawing surface sized to the viewport.
///
/// Coordinates passed in are logical pixels; implementations scale them by
/// the pixel ratio given to [`Surface::resize`].
pub trait Surface {
    /// Resize the backing store to `width × height` logical pixels at `pixel_ratio`
    /// device pixels each. Contents are discarded.
    fn resize(&mut self, width: f64, height: f64, pixel_ratio: f64);

    /// Fill an axis-aligned rectangle.
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgba);

    /// Stroke the outline of `path`.
    fn stroke(&mut self, path: &Path, stroke: &Stroke);

    /// Fill the interior of `path`.
    fn fill(&mut self, path: &Path, color: Rgba);

    /// Copy of the whole backing store.
    fn image_data(&self) -> ImageData;

    /// Write pixels back, clipped to the backing store.
    fn put_image_data(&mut self, image: &ImageData);
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn resize(&mut self, width: f64, height: f64, pixel_ratio: f64) {
        (**self).resize(width, height, pixel_ratio)
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgba) {
        (**self).fill_rect(x, y, width, height, color)
    }

    fn stroke(&mut self, path: &Path, stroke: &Stroke) {
        (**self).stroke(path, stroke)
    }

    fn fill(&mut self, path: &Path, color: Rgba) {
        (**self).fill(path, color)
    }

    fn image_data(&self) -> ImageData {
        (**self).image_data()
    }

    fn put_image_data(&mut self, image: &ImageData) {
        (**self).put_image_data(image)
    }
}
