//! RGBA8 raster with alpha-over blending
//!
//! The figure is always opaque: blending composites onto the existing pixel
//! and leaves the alpha channel at 255.

use std::path::Path;

use tracing::debug;

use super::font::{self, CHAR_W};
use crate::error::RenderError;

pub struct Canvas {
    width: u32,
    height: u32,
    buf: Vec<u8>, // RGBA8: width * height * 4
}

impl Canvas {
    /// Opaque canvas filled with `background`
    pub fn new(width: u32, height: u32, background: [u8; 3]) -> Self {
        let mut buf = vec![255u8; (width * height * 4) as usize];
        for chunk in buf.chunks_exact_mut(4) {
            chunk[..3].copy_from_slice(&background);
        }
        Self { width, height, buf }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 rows, top to bottom
    pub fn pixels(&self) -> &[u8] {
        &self.buf
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y * self.width + x) * 4) as usize;
        [self.buf[idx], self.buf[idx + 1], self.buf[idx + 2], self.buf[idx + 3]]
    }

    // --- Primitives ---

    #[inline]
    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(((y as u32 * self.width + x as u32) * 4) as usize)
    }

    #[inline]
    pub fn set_pixel(&mut self, x: i64, y: i64, color: [u8; 3]) {
        if let Some(idx) = self.index(x, y) {
            self.buf[idx..idx + 3].copy_from_slice(&color);
        }
    }

    /// Composite `color` at `alpha` (0..=1) over the pixel
    #[inline]
    pub fn blend_pixel(&mut self, x: i64, y: i64, color: [u8; 3], alpha: f64) {
        if alpha.is_nan() || alpha <= 0.0 {
            return;
        }
        let alpha = alpha.min(1.0);
        if let Some(idx) = self.index(x, y) {
            for c in 0..3 {
                let dst = self.buf[idx + c] as f64;
                let src = color[c] as f64;
                self.buf[idx + c] = (src * alpha + dst * (1.0 - alpha)).round() as u8;
            }
        }
    }

    /// Filled disk centered at (`cx`, `cy`)
    ///
    /// Disks smaller than a pixel cover one pixel with alpha scaled by
    /// their area.
    pub fn fill_disk(&mut self, cx: f64, cy: f64, radius: f64, color: [u8; 3], alpha: f64) {
        if !radius.is_finite() || radius <= 0.0 {
            return;
        }
        if radius < 0.5 {
            let coverage = std::f64::consts::PI * radius * radius;
            self.blend_pixel(cx.floor() as i64, cy.floor() as i64, color, alpha * coverage);
            return;
        }

        let r2 = radius * radius;
        let (x0, x1) = ((cx - radius).floor() as i64, (cx + radius).ceil() as i64);
        let (y0, y1) = ((cy - radius).floor() as i64, (cy + radius).ceil() as i64);
        for py in y0..=y1 {
            for px in x0..=x1 {
                let dx = px as f64 + 0.5 - cx;
                let dy = py as f64 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.blend_pixel(px, py, color, alpha);
                }
            }
        }
    }

    /// One-pixel line between two points (DDA)
    pub fn draw_line(&mut self, from: (f64, f64), to: (f64, f64), color: [u8; 3]) {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as i64;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let x = from.0 + dx * t;
            let y = from.1 + dy * t;
            self.set_pixel(x.floor() as i64, y.floor() as i64, color);
        }
    }

    /// Fill a convex polygon given in either winding order
    pub fn fill_convex(&mut self, corners: &[(f64, f64)], color: [u8; 3]) {
        if corners.len() < 3 {
            return;
        }
        let (mut x0, mut x1, mut y0, mut y1) = (f64::MAX, f64::MIN, f64::MAX, f64::MIN);
        for &(x, y) in corners {
            x0 = x0.min(x);
            x1 = x1.max(x);
            y0 = y0.min(y);
            y1 = y1.max(y);
        }

        for py in y0.floor() as i64..=y1.ceil() as i64 {
            for px in x0.floor() as i64..=x1.ceil() as i64 {
                let p = (px as f64 + 0.5, py as f64 + 0.5);
                if inside_convex(corners, p) {
                    self.set_pixel(px, py, color);
                }
            }
        }
    }

    fn draw_char(&mut self, x: i64, y: i64, ch: char, color: [u8; 3], scale: u32) {
        let Some(glyph) = font::glyph(ch) else {
            return;
        };
        let s = scale as i64;
        for (row, &bits) in glyph.iter().enumerate() {
            for col in 0..5i64 {
                if bits & (0x10 >> col) != 0 {
                    for sy in 0..s {
                        for sx in 0..s {
                            self.set_pixel(x + col * s + sx, y + row as i64 * s + sy, color);
                        }
                    }
                }
            }
        }
    }

    /// Draw `text` with its top-left corner at (`x`, `y`)
    pub fn draw_text(&mut self, x: i64, y: i64, text: &str, color: [u8; 3], scale: u32) {
        let advance = (CHAR_W * scale) as i64;
        for (i, ch) in text.chars().enumerate() {
            self.draw_char(x + i as i64 * advance, y, ch, color, scale);
        }
    }

    /// Draw `text` centered on (`cx`, `cy`)
    pub fn draw_text_centered(&mut self, cx: f64, cy: f64, text: &str, color: [u8; 3], scale: u32) {
        let w = font::text_width(text, scale) as f64;
        let h = font::text_height(scale) as f64;
        self.draw_text((cx - w / 2.0).round() as i64, (cy - h / 2.0).round() as i64, text, color, scale);
    }

    // --- Inspection & output ---

    /// Bounding box `(x0, y0, x1, y1)` (inclusive) of pixels that differ
    /// from `background`, or None for a blank canvas
    pub fn ink_bounds(&self, background: [u8; 3]) -> Option<(u32, u32, u32, u32)> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for (i, chunk) in self.buf.chunks_exact(4).enumerate() {
            if chunk[..3] == background {
                continue;
            }
            let x = i as u32 % self.width;
            let y = i as u32 / self.width;
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
        bounds
    }

    /// Encode as PNG, replacing any existing file at `path`
    pub fn save_png(&self, path: &Path) -> Result<(), RenderError> {
        image::save_buffer(path, &self.buf, self.width, self.height, image::ColorType::Rgba8)
            .map_err(|source| RenderError::Image {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(path = %path.display(), width = self.width, height = self.height, "Saved PNG");
        Ok(())
    }
}

fn inside_convex(corners: &[(f64, f64)], p: (f64, f64)) -> bool {
    let mut sign = 0.0f64;
    for i in 0..corners.len() {
        let a = corners[i];
        let b = corners[(i + 1) % corners.len()];
        let cross = (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0);
        if cross == 0.0 {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [u8; 3] = [255, 255, 255];
    const BLUE: [u8; 3] = [65, 105, 225];

    #[test]
    fn test_new_canvas_is_opaque_background() {
        let canvas = Canvas::new(4, 3, WHITE);
        assert_eq!(canvas.pixels().len(), 4 * 3 * 4);
        assert_eq!(canvas.pixel(3, 2), [255, 255, 255, 255]);
        assert!(canvas.ink_bounds(WHITE).is_none());
    }

    #[test]
    fn test_blend_pixel_alpha_over() {
        let mut canvas = Canvas::new(2, 2, WHITE);
        canvas.blend_pixel(0, 0, [0, 0, 0], 0.3);
        // 255 * 0.7 = 178.5
        assert_eq!(canvas.pixel(0, 0), [179, 179, 179, 255]);

        canvas.blend_pixel(1, 1, BLUE, 1.0);
        assert_eq!(canvas.pixel(1, 1), [65, 105, 225, 255]);
    }

    #[test]
    fn test_blend_ignores_nan_and_out_of_bounds() {
        let mut canvas = Canvas::new(2, 2, WHITE);
        canvas.blend_pixel(0, 0, BLUE, f64::NAN);
        canvas.blend_pixel(-1, 0, BLUE, 1.0);
        canvas.blend_pixel(0, 5, BLUE, 1.0);
        assert!(canvas.ink_bounds(WHITE).is_none());
    }

    #[test]
    fn test_fill_disk_bounds() {
        let mut canvas = Canvas::new(20, 20, WHITE);
        canvas.fill_disk(10.0, 10.0, 3.0, BLUE, 1.0);
        let (x0, y0, x1, y1) = canvas.ink_bounds(WHITE).unwrap();
        assert!(x0 >= 7 && x1 <= 12, "x range {}..{}", x0, x1);
        assert!(y0 >= 7 && y1 <= 12, "y range {}..{}", y0, y1);
        assert_eq!(canvas.pixel(10, 10), [65, 105, 225, 255]);
    }

    #[test]
    fn test_subpixel_disk_touches_one_pixel() {
        let mut canvas = Canvas::new(5, 5, WHITE);
        canvas.fill_disk(2.4, 2.6, 0.2, BLUE, 1.0);
        assert_eq!(canvas.ink_bounds(WHITE), Some((2, 2, 2, 2)));
        // Partial coverage leaves the pixel lighter than the full color
        assert!(canvas.pixel(2, 2)[0] > BLUE[0]);
    }

    #[test]
    fn test_nan_radius_draws_nothing() {
        let mut canvas = Canvas::new(5, 5, WHITE);
        canvas.fill_disk(2.0, 2.0, f64::NAN, BLUE, 1.0);
        assert!(canvas.ink_bounds(WHITE).is_none());
    }

    #[test]
    fn test_line_and_text_ink() {
        let mut canvas = Canvas::new(50, 20, WHITE);
        canvas.draw_line((1.0, 1.0), (40.0, 1.0), [0, 0, 0]);
        assert_eq!(canvas.ink_bounds(WHITE), Some((1, 1, 40, 1)));

        let mut canvas = Canvas::new(50, 20, WHITE);
        canvas.draw_text(2, 3, "N", [0, 0, 0], 2);
        let (x0, y0, x1, y1) = canvas.ink_bounds(WHITE).unwrap();
        assert_eq!((x0, y0), (2, 3));
        assert_eq!((x1, y1), (2 + 10 - 1, 3 + 14 - 1));
    }

    #[test]
    fn test_fill_convex_square() {
        let mut canvas = Canvas::new(10, 10, WHITE);
        canvas.fill_convex(&[(2.0, 2.0), (6.0, 2.0), (6.0, 6.0), (2.0, 6.0)], BLUE);
        assert_eq!(canvas.ink_bounds(WHITE), Some((2, 2, 5, 5)));
    }
}
