use super::color::Color;
use image::RgbaImage;

/// Anything that can be painted on pixel by pixel.
///
/// Implementors only provide the buffer geometry and a single blending
/// write; every primitive the sky and HUD need is derived from it. All
/// primitives clip silently, so callers may pass coordinates that lie
/// partially or entirely outside the surface.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Blends `color` over the pixel at `(x, y)`. `alpha == 255` overwrites.
    fn blend_pixel(&mut self, x: i32, y: i32, color: Color, alpha: u8);

    fn put_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.blend_pixel(x, y, color, 255);
    }

    fn fill(&mut self, color: Color) {
        self.fill_rect(0, 0, self.width() as i32, self.height() as i32, color, 255);
    }

    fn draw_hline(&mut self, x0: i32, x1: i32, y: i32, color: Color, alpha: u8) {
        if y < 0 || y >= self.height() as i32 {
            return;
        }
        let (start, end) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let start = start.max(0);
        let end = end.min(self.width() as i32 - 1);
        for x in start..=end {
            self.blend_pixel(x, y, color, alpha);
        }
    }

    /// Bresenham line between two points, both inclusive.
    fn draw_line(&mut self, from: (i32, i32), to: (i32, i32), color: Color, alpha: u8) {
        let (mut x, mut y) = from;
        let dx = (to.0 - x).abs();
        let dy = -(to.1 - y).abs();
        let sx = if x < to.0 { 1 } else { -1 };
        let sy = if y < to.1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.blend_pixel(x, y, color, alpha);
            if x == to.0 && y == to.1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color, alpha: u8) {
        if w <= 0 || h <= 0 {
            return;
        }
        let y_end = (y + h).min(self.height() as i32);
        for row in y.max(0)..y_end {
            self.draw_hline(x, x + w - 1, row, color, alpha);
        }
    }

    /// Filled disc; a radius of zero paints the center pixel only.
    fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color, alpha: u8) {
        if radius < 0 {
            return;
        }
        let r2 = radius * radius;
        for dy in -radius..=radius {
            let span = ((r2 - dy * dy) as f64).sqrt() as i32;
            self.draw_hline(cx - span, cx + span, cy + dy, color, alpha);
        }
    }

    /// Filled ellipse inscribed in the `w` x `h` rectangle at `(x, y)`.
    fn fill_ellipse(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color, alpha: u8) {
        if w <= 0 || h <= 0 {
            return;
        }
        let rx = w as f64 / 2.0;
        let ry = h as f64 / 2.0;
        let cx = x as f64 + rx;
        for row in 0..h {
            let dy = (row as f64 + 0.5 - ry) / ry;
            let reach = 1.0 - dy * dy;
            if reach < 0.0 {
                continue;
            }
            let half = rx * reach.sqrt();
            let x0 = (cx - half).round() as i32;
            let x1 = (cx + half).round() as i32 - 1;
            if x1 >= x0 {
                self.draw_hline(x0, x1, y + row, color, alpha);
            }
        }
    }

    /// Nearest-neighbour blit of `image` into the `w` x `h` box at `(x, y)`,
    /// honouring the image's own alpha channel.
    fn blit_image(&mut self, image: &RgbaImage, x: i32, y: i32, w: u32, h: u32) {
        if w == 0 || h == 0 || image.width() == 0 || image.height() == 0 {
            return;
        }
        for dy in 0..h {
            let sy = dy * image.height() / h;
            for dx in 0..w {
                let sx = dx * image.width() / w;
                let [r, g, b, a] = image.get_pixel(sx, sy).0;
                if a > 0 {
                    self.blend_pixel(x + dx as i32, y + dy as i32, Color::rgb(r, g, b), a);
                }
            }
        }
    }
}

/// An in-memory RGB frame buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::BLACK; width as usize * height as usize],
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if self.width == width && self.height == height {
            return;
        }
        *self = Self::new(width, height);
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }
}

impl Surface for Canvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn blend_pixel(&mut self, x: i32, y: i32, color: Color, alpha: u8) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 || alpha == 0 {
            return;
        }
        let idx = y as usize * self.width as usize + x as usize;
        let dst = &mut self.pixels[idx];
        if alpha == 255 {
            *dst = color;
            return;
        }
        let a = alpha as u32;
        let mix = |src: u8, dst: u8| ((src as u32 * a + dst as u32 * (255 - a)) / 255) as u8;
        *dst = Color::rgb(mix(color.r, dst.r), mix(color.g, dst.g), mix(color.b, dst.b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::rgb(255, 0, 0);

    fn count(canvas: &Canvas, color: Color) -> usize {
        let mut n = 0;
        for y in 0..canvas.height() {
            for x in 0..canvas.width() {
                if canvas.pixel(x, y) == Some(color) {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn test_new_canvas_is_black() {
        let canvas = Canvas::new(4, 3);
        assert_eq!(count(&canvas, Color::BLACK), 12);
        assert_eq!(canvas.pixel(4, 0), None);
    }

    #[test]
    fn test_blend_pixel_half_alpha() {
        let mut canvas = Canvas::new(1, 1);
        canvas.blend_pixel(0, 0, Color::rgb(200, 100, 0), 128);
        assert_eq!(canvas.pixel(0, 0), Some(Color::rgb(100, 50, 0)));
    }

    #[test]
    fn test_out_of_bounds_writes_are_ignored() {
        let mut canvas = Canvas::new(2, 2);
        canvas.put_pixel(-1, 0, RED);
        canvas.put_pixel(0, 5, RED);
        canvas.fill_rect(-10, -10, 5, 5, RED, 255);
        assert_eq!(count(&canvas, RED), 0);
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut canvas = Canvas::new(4, 4);
        canvas.fill_rect(2, 2, 10, 10, RED, 255);
        assert_eq!(count(&canvas, RED), 4);
    }

    #[test]
    fn test_hline_reversed_endpoints() {
        let mut canvas = Canvas::new(5, 1);
        canvas.draw_hline(3, 1, 0, RED, 255);
        assert_eq!(count(&canvas, RED), 3);
    }

    #[test]
    fn test_draw_line_vertical() {
        let mut canvas = Canvas::new(3, 10);
        canvas.draw_line((1, 2), (1, 6), RED, 255);
        assert_eq!(count(&canvas, RED), 5);
        assert_eq!(canvas.pixel(1, 2), Some(RED));
        assert_eq!(canvas.pixel(1, 6), Some(RED));
    }

    #[test]
    fn test_fill_circle_radius_zero_is_one_pixel() {
        let mut canvas = Canvas::new(3, 3);
        canvas.fill_circle(1, 1, 0, RED, 255);
        assert_eq!(count(&canvas, RED), 1);
    }

    #[test]
    fn test_fill_circle_is_symmetric() {
        let mut canvas = Canvas::new(21, 21);
        canvas.fill_circle(10, 10, 5, RED, 255);
        assert_eq!(canvas.pixel(10, 5), Some(RED));
        assert_eq!(canvas.pixel(10, 15), Some(RED));
        assert_eq!(canvas.pixel(5, 10), Some(RED));
        assert_eq!(canvas.pixel(15, 10), Some(RED));
        assert_eq!(canvas.pixel(4, 10), Some(Color::BLACK));
        assert_eq!(canvas.pixel(14, 14), Some(Color::BLACK));
    }

    #[test]
    fn test_fill_ellipse_stays_in_box() {
        let mut canvas = Canvas::new(30, 20);
        canvas.fill_ellipse(5, 5, 20, 10, RED, 255);
        for y in 0..20 {
            for x in 0..30 {
                if canvas.pixel(x, y) == Some(RED) {
                    assert!((5..25).contains(&x) && (5..15).contains(&y), "({x},{y})");
                }
            }
        }
        assert_eq!(canvas.pixel(15, 10), Some(RED));
    }

    #[test]
    fn test_blit_image_scales_and_skips_transparent() {
        let mut image = RgbaImage::new(2, 2);
        image.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        image.put_pixel(1, 1, image::Rgba([255, 0, 0, 255]));

        let mut canvas = Canvas::new(4, 4);
        canvas.blit_image(&image, 0, 0, 4, 4);
        assert_eq!(count(&canvas, RED), 8);
        assert_eq!(canvas.pixel(3, 0), Some(Color::BLACK));
    }

    #[test]
    fn test_resize_reallocates() {
        let mut canvas = Canvas::new(2, 2);
        canvas.fill(RED);
        canvas.resize(3, 1);
        assert_eq!(canvas.width(), 3);
        assert_eq!(canvas.height(), 1);
        assert_eq!(count(&canvas, Color::BLACK), 3);
    }
}
