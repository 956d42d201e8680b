//! Presents a [`PixelCanvas`] in the terminal.

use chaos_core::Rgb;
use chaos_field::PixelCanvas;
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

/// Upper half block: foreground paints the top pixel, background the bottom one.
const HALF_BLOCK: &str = "▀";

/// Logical viewport size for a terminal area.
///
/// Each cell shows two device pixels stacked vertically, and each device
/// pixel covers `pixel_size` logical pixels.
pub fn viewport(area: Rect, pixel_size: f64) -> (f64, f64) {
    (
        f64::from(area.width) * pixel_size,
        f64::from(area.height) * 2.0 * pixel_size,
    )
}

/// Widget drawing a canvas with one cell per two stacked pixels.
#[derive(Debug, Clone, Copy)]
pub struct CanvasView<'a> {
    canvas: &'a PixelCanvas,
}

impl<'a> CanvasView<'a> {
    pub fn new(canvas: &'a PixelCanvas) -> Self {
        Self { canvas }
    }
}

impl Widget for CanvasView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for row in 0..area.height {
            for col in 0..area.width {
                let x = usize::from(col);
                let y = usize::from(row) * 2;
                let top = self.canvas.rgb_at(x, y).unwrap_or(Rgb::BLACK);
                let bottom = self.canvas.rgb_at(x, y + 1).unwrap_or(Rgb::BLACK);
                buf[(area.x + col, area.y + row)]
                    .set_symbol(HALF_BLOCK)
                    .set_fg(top.into())
                    .set_bg(bottom.into());
            }
        }
    }
}
