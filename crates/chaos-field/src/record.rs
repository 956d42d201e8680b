//! A surface that records draw calls instead of rasterizing them.

use chaos_core::Rgba;

use crate::surface::{ImageData, Path, Stroke, Surface};

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Resize {
        width: f64,
        height: f64,
        pixel_ratio: f64,
    },
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Rgba,
    },
    Stroke(Path, Stroke),
    Fill(Path, Rgba),
    PutImageData,
}

/// Records every call, for assertions on what a frame drew.
///
/// The pixel buffer is a blank image of the backing store size, so noise
/// passes see well-formed data.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    image: ImageData,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drop recorded commands, typically between frames.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Recorded strokes whose color matches `color`.
    pub fn strokes_with(&self, color: Rgba) -> impl Iterator<Item = &Path> {
        self.commands.iter().filter_map(move |c| match c {
            DrawCommand::Stroke(path, stroke) if stroke.color == color => Some(path),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, width: f64, height: f64, pixel_ratio: f64) {
        self.image = ImageData::new(
            (width * pixel_ratio).round().max(0.0) as usize,
            (height * pixel_ratio).round().max(0.0) as usize,
        );
        self.commands.push(DrawCommand::Resize {
            width,
            height,
            pixel_ratio,
        });
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgba) {
        self.commands.push(DrawCommand::FillRect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn stroke(&mut self, path: &Path, stroke: &Stroke) {
        self.commands.push(DrawCommand::Stroke(path.clone(), *stroke));
    }

    fn fill(&mut self, path: &Path, color: Rgba) {
        self.commands.push(DrawCommand::Fill(path.clone(), color));
    }

    fn image_data(&self) -> ImageData {
        self.image.clone()
    }

    fn put_image_data(&mut self, image: &ImageData) {
        self.image = image.clone();
        self.commands.push(DrawCommand::PutImageData);
    }
}
