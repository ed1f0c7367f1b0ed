use image::RgbImage;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::Widget;

/// Renders a raster with half-block characters, two pixel rows per cell,
/// scaled to fit and centered in the area.
pub struct ThumbnailWidget<'a> {
    image: &'a RgbImage,
}

impl<'a> ThumbnailWidget<'a> {
    pub fn new(image: &'a RgbImage) -> Self {
        Self { image }
    }
    fn color(&self, x: f64, y: f64) -> Color {
        let (w, h) = self.image.dimensions();
        let px = self
            .image
            .get_pixel((x as u32).min(w - 1), (y as u32).min(h - 1));
        Color::Rgb(px[0], px[1], px[2])
    }
}

impl Widget for ThumbnailWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (w, h) = self.image.dimensions();
        if w == 0 || h == 0 || area.is_empty() {
            return;
        }
        let scale = f64::min(
            f64::from(area.width) / f64::from(w),
            f64::from(area.height) * 2.0 / f64::from(h),
        );
        let cols = ((f64::from(w) * scale).round() as u16).clamp(1, area.width);
        let rows = ((f64::from(h) * scale / 2.0).round() as u16).clamp(1, area.height);
        let (x0, y0) = (
            area.x + (area.width - cols) / 2,
            area.y + (area.height - rows) / 2,
        );
        for row in 0..rows {
            for col in 0..cols {
                let x = f64::from(col) / scale;
                let top = self.color(x, f64::from(row * 2) / scale);
                let bottom = self.color(x, f64::from(row * 2 + 1) / scale);
                if let Some(cell) = buf.cell_mut((x0 + col, y0 + row)) {
                    cell.set_char('▀').set_fg(top).set_bg(bottom);
                }
            }
        }
    }
}
