//! Software RGBA canvas.

use chaos_core::{DashPattern, Rgb, Rgba};

use crate::surface::{ImageData, Path, Point, Stroke, Surface};

/// Sub-samples per axis when estimating fill coverage.
const FILL_SAMPLES: usize = 4;

/// Longest chord, in device pixels, used when flattening arcs.
const MAX_CHORD: f64 = 0.75;

/// An RGBA8 pixel buffer implementing [`Surface`].
///
/// Drawing uses source-over blending with anti-aliased coverage. Strokes
/// thinner than one device pixel are drawn as one-pixel hairlines so the
/// effect stays visible on coarse displays.
#[derive(Debug, Clone, Default)]
pub struct PixelCanvas {
    width: usize,
    height: usize,
    scale: f64,
    pixels: Vec<u8>,
}

impl PixelCanvas {
    pub fn new() -> Self {
        Self {
            scale: 1.0,
            ..Self::default()
        }
    }

    /// Width of the backing store in device pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the backing store in device pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The raw RGBA buffer.
    pub fn as_rgba(&self) -> &[u8] {
        &self.pixels
    }

    /// Color of a device pixel composited over black, or `None` outside the canvas.
    pub fn rgb_at(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        let alpha = f64::from(self.pixels[i + 3]) / 255.0;
        let channel = |c: u8| (f64::from(c) * alpha).round() as u8;
        Some(Rgb::new(
            channel(self.pixels[i]),
            channel(self.pixels[i + 1]),
            channel(self.pixels[i + 2]),
        ))
    }

    /// Blend `color` into one pixel, `coverage` scaling its alpha.
    fn blend(&mut self, x: usize, y: usize, color: Rgba, coverage: f64) {
        let src_a = color.a * coverage;
        if src_a <= 0.0 {
            return;
        }
        let i = (y * self.width + x) * 4;
        let dst_a = f64::from(self.pixels[i + 3]) / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        if out_a <= 0.0 {
            return;
        }
        let mix = |src: u8, dst: u8| {
            let v = (f64::from(src) * src_a + f64::from(dst) * dst_a * (1.0 - src_a)) / out_a;
            v.round().clamp(0.0, 255.0) as u8
        };
        self.pixels[i] = mix(color.r, self.pixels[i]);
        self.pixels[i + 1] = mix(color.g, self.pixels[i + 1]);
        self.pixels[i + 2] = mix(color.b, self.pixels[i + 2]);
        self.pixels[i + 3] = (out_a * 255.0).round() as u8;
    }

    /// Path subpaths converted to device pixels.
    fn device_subpaths(&self, path: &Path) -> Vec<Vec<Point>> {
        let scale = self.scale;
        path.flatten(MAX_CHORD / scale)
            .into_iter()
            .map(|points| {
                points
                    .into_iter()
                    .map(|p| Point::new(p.x * scale, p.y * scale))
                    .collect()
            })
            .collect()
    }

    /// Clip a device-space box to pixel index ranges.
    fn clip(
        &self,
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
    ) -> Option<(usize, usize, usize, usize)> {
        let x0 = min_x.floor().max(0.0);
        let y0 = min_y.floor().max(0.0);
        let x1 = max_x.ceil().min(self.width as f64);
        let y1 = max_y.ceil().min(self.height as f64);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as usize, y0 as usize, x1 as usize, y1 as usize))
    }
}

impl Surface for PixelCanvas {
    fn resize(&mut self, width: f64, height: f64, pixel_ratio: f64) {
        self.scale = pixel_ratio;
        self.width = (width * pixel_ratio).round().max(0.0) as usize;
        self.height = (height * pixel_ratio).round().max(0.0) as usize;
        self.pixels = vec![0; self.width * self.height * 4];
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgba) {
        let s = self.scale;
        let Some((x0, y0, x1, y1)) = self.clip(x * s, y * s, (x + width) * s, (y + height) * s)
        else {
            return;
        };
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend(px, py, color, 1.0);
            }
        }
    }

    fn stroke(&mut self, path: &Path, stroke: &Stroke) {
        let half = (stroke.width * self.scale).max(1.0) / 2.0;
        let dash = stroke.dash.map(|d| DashPattern {
            on: d.on * self.scale,
            off: d.off * self.scale,
        });

        let mut segments = Vec::new();
        for points in self.device_subpaths(path) {
            match dash {
                Some(dash) if dash.on > 0.0 && dash.on + dash.off > 0.0 => {
                    dashed_segments(&points, dash, &mut segments)
                }
                _ => segments.extend(points.windows(2).map(|w| (w[0], w[1]))),
            }
        }
        if segments.is_empty() {
            return;
        }

        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for (a, b) in &segments {
            min_x = min_x.min(a.x.min(b.x));
            min_y = min_y.min(a.y.min(b.y));
            max_x = max_x.max(a.x.max(b.x));
            max_y = max_y.max(a.y.max(b.y));
        }
        let pad = half + 1.0;
        let Some((x0, y0, x1, y1)) = self.clip(min_x - pad, min_y - pad, max_x + pad, max_y + pad)
        else {
            return;
        };

        // Coverage is accumulated per stroke so overlapping segments blend once.
        let w = x1 - x0;
        let mut coverage = vec![0.0f64; w * (y1 - y0)];
        for (a, b) in &segments {
            let Some((sx0, sy0, sx1, sy1)) = self.clip(
                a.x.min(b.x) - pad,
                a.y.min(b.y) - pad,
                a.x.max(b.x) + pad,
                a.y.max(b.y) + pad,
            ) else {
                continue;
            };
            for py in sy0..sy1 {
                for px in sx0..sx1 {
                    let center = Point::new(px as f64 + 0.5, py as f64 + 0.5);
                    let d = distance_to_segment(center, *a, *b);
                    let c = (half + 0.5 - d).clamp(0.0, 1.0);
                    let slot = &mut coverage[(py - y0) * w + (px - x0)];
                    if c > *slot {
                        *slot = c;
                    }
                }
            }
        }

        for py in y0..y1 {
            for px in x0..x1 {
                let c = coverage[(py - y0) * w + (px - x0)];
                if c > 0.0 {
                    self.blend(px, py, stroke.color, c);
                }
            }
        }
    }

    fn fill(&mut self, path: &Path, color: Rgba) {
        let polygons = self.device_subpaths(path);
        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in polygons.iter().flatten() {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        let Some((x0, y0, x1, y1)) = self.clip(min_x, min_y, max_x, max_y) else {
            return;
        };

        let step = 1.0 / FILL_SAMPLES as f64;
        let total = (FILL_SAMPLES * FILL_SAMPLES) as f64;
        for py in y0..y1 {
            for px in x0..x1 {
                let mut inside = 0usize;
                for sy in 0..FILL_SAMPLES {
                    for sx in 0..FILL_SAMPLES {
                        let sample = Point::new(
                            px as f64 + (sx as f64 + 0.5) * step,
                            py as f64 + (sy as f64 + 0.5) * step,
                        );
                        if contains(&polygons, sample) {
                            inside += 1;
                        }
                    }
                }
                if inside > 0 {
                    self.blend(px, py, color, inside as f64 / total);
                }
            }
        }
    }

    fn image_data(&self) -> ImageData {
        ImageData {
            width: self.width,
            height: self.height,
            data: self.pixels.clone(),
        }
    }

    fn put_image_data(&mut self, image: &ImageData) {
        let w = image.width.min(self.width);
        let h = image.height.min(self.height);
        for y in 0..h {
            // A short buffer ends the copy at its last whole pixel.
            let Some(row) = image.data.get(y * image.width * 4..) else {
                break;
            };
            let len = (w * 4).min(row.len() / 4 * 4);
            if len == 0 {
                break;
            }
            let dst = y * self.width * 4;
            self.pixels[dst..dst + len].copy_from_slice(&row[..len]);
        }
    }
}

/// Split a polyline into the "on" pieces of a dash pattern.
fn dashed_segments(points: &[Point], dash: DashPattern, out: &mut Vec<(Point, Point)>) {
    let period = dash.on + dash.off;
    let mut offset = 0.0;
    for w in points.windows(2) {
        let (a, b) = (w[0], w[1]);
        let length = a.distance(b);
        if length <= 0.0 {
            continue;
        }
        let mut t = 0.0;
        while t < length {
            let phase = offset % period;
            let (drawing, remaining) = if phase < dash.on {
                (true, dash.on - phase)
            } else {
                (false, period - phase)
            };
            let run = remaining.min(length - t);
            if drawing {
                out.push((lerp(a, b, t / length), lerp(a, b, (t + run) / length)));
            }
            t += run;
            offset += run;
        }
    }
}

fn lerp(a: Point, b: Point, t: f64) -> Point {
    Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}

/// Even-odd containment test over every (implicitly closed) polygon.
fn contains(polygons: &[Vec<Point>], p: Point) -> bool {
    let mut inside = false;
    for polygon in polygons {
        let n = polygon.len();
        for i in 0..n {
            let a = polygon[i];
            let b = polygon[(i + 1) % n];
            if (a.y > p.y) != (b.y > p.y) {
                let x = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if p.x < x {
                    inside = !inside;
                }
            }
        }
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas(width: f64, height: f64, ratio: f64) -> PixelCanvas {
        let mut c = PixelCanvas::new();
        c.resize(width, height, ratio);
        c
    }

    #[test]
    fn test_resize_scales_backing_store() {
        let c = canvas(100.0, 50.0, 2.0);
        assert_eq!((c.width(), c.height()), (200, 100));
        assert_eq!(c.as_rgba().len(), 200 * 100 * 4);

        let c = canvas(480.0, 320.0, 0.25);
        assert_eq!((c.width(), c.height()), (120, 80));
    }

    #[test]
    fn test_opaque_fill_rect() {
        let mut c = canvas(10.0, 10.0, 1.0);
        c.fill_rect(0.0, 0.0, 10.0, 10.0, Rgb::new(127, 56, 127).opaque());
        assert_eq!(c.image_data().pixel(3, 7), [127, 56, 127, 255]);
        assert_eq!(c.rgb_at(9, 9), Some(Rgb::new(127, 56, 127)));
        assert_eq!(c.rgb_at(10, 0), None);
    }

    #[test]
    fn test_translucent_fill_converges() {
        let mut c = canvas(4.0, 4.0, 1.0);
        c.fill_rect(0.0, 0.0, 4.0, 4.0, Rgb::BLACK.opaque());
        for _ in 0..200 {
            c.fill_rect(0.0, 0.0, 4.0, 4.0, Rgb::new(200, 100, 50).alpha(0.05));
        }
        // 8-bit rounding stalls a few steps short of the fill color, like a browser canvas.
        let [r, g, b, a] = c.image_data().pixel(0, 0);
        assert_eq!(a, 255);
        assert!((190..=200).contains(&r), "got {r}");
        assert!((90..=100).contains(&g), "got {g}");
        assert!((40..=50).contains(&b), "got {b}");
    }

    #[test]
    fn test_stroke_marks_only_near_pixels() {
        let mut c = canvas(20.0, 20.0, 1.0);
        let path = Path::new().move_to(2.0, 10.5).line_to(18.0, 10.5);
        c.stroke(&path, &Stroke::solid(Rgb::new(255, 0, 0).opaque(), 1.0));

        let image = c.image_data();
        assert_eq!(image.pixel(10, 10), [255, 0, 0, 255]);
        assert_eq!(image.pixel(10, 2)[3], 0);
        assert_eq!(image.pixel(10, 18)[3], 0);
    }

    #[test]
    fn test_dashed_stroke_leaves_gaps() {
        let mut solid = canvas(40.0, 4.0, 1.0);
        let mut dashed = canvas(40.0, 4.0, 1.0);
        let path = Path::new().move_to(0.0, 2.0).line_to(40.0, 2.0);
        let color = Rgb::BLACK.opaque();
        solid.stroke(&path, &Stroke::solid(color, 1.0));
        dashed.stroke(
            &path,
            &Stroke::dashed(color, 1.0, DashPattern { on: 2.0, off: 4.0 }),
        );

        let painted = |c: &PixelCanvas| c.as_rgba().chunks(4).filter(|p| p[3] > 0).count();
        assert!(painted(&dashed) < painted(&solid));
        assert!(painted(&dashed) > 0);
    }

    #[test]
    fn test_fill_circle() {
        let mut c = canvas(20.0, 20.0, 1.0);
        c.fill(&Path::circle(10.0, 10.0, 4.0), Rgb::new(0, 0, 255).opaque());
        assert_eq!(c.image_data().pixel(10, 10), [0, 0, 255, 255]);
        assert_eq!(c.image_data().pixel(1, 1)[3], 0);
    }

    #[test]
    fn test_drawing_outside_is_clipped() {
        let mut c = canvas(10.0, 10.0, 1.0);
        let color = Rgb::BLACK.opaque();
        c.fill_rect(-50.0, -50.0, 20.0, 20.0, color);
        c.stroke(
            &Path::new().move_to(-20.0, -5.0).line_to(-10.0, -5.0),
            &Stroke::solid(color, 2.0),
        );
        c.fill(&Path::circle(100.0, 100.0, 3.0), color);
        assert!(c.as_rgba().iter().all(|b| *b == 0));
    }

    #[test]
    fn test_put_image_data_round_trip() {
        let mut c = canvas(8.0, 8.0, 1.0);
        let mut image = c.image_data();
        image.data[0..4].copy_from_slice(&[9, 8, 7, 255]);
        c.put_image_data(&image);
        assert_eq!(c.image_data(), image);

        // Smaller images are clipped into the top-left corner.
        let mut small = ImageData::new(2, 2);
        small.data.fill(255);
        c.put_image_data(&small);
        assert_eq!(c.image_data().pixel(1, 1), [255, 255, 255, 255]);
        assert_eq!(c.image_data().pixel(2, 2), [0, 0, 0, 0]);
    }

    #[test]
    fn test_put_image_data_with_short_buffer() {
        let mut c = canvas(4.0, 4.0, 1.0);
        let image = ImageData {
            width: 4,
            height: 4,
            data: vec![255; 4 * 4 + 6],
        };
        c.put_image_data(&image);

        // One full row plus one pixel of the second row; the trailing partial pixel is dropped.
        assert_eq!(c.image_data().pixel(3, 0), [255, 255, 255, 255]);
        assert_eq!(c.image_data().pixel(0, 1), [255, 255, 255, 255]);
        assert_eq!(c.image_data().pixel(1, 1), [0, 0, 0, 0]);
        assert_eq!(c.image_data().pixel(0, 2), [0, 0, 0, 0]);
    }
}
