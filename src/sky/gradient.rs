use crate::render::canvas::Surface;
use crate::render::color::{Color, interpolate};

/// Paints `height` full-width scanlines blending from `top` at row 0 towards
/// `bottom`, with row `y` using factor `y / height`.
pub fn paint_gradient<S: Surface + ?Sized>(
    surface: &mut S,
    height: u32,
    width: u32,
    top: Color,
    bottom: Color,
) {
    if height == 0 {
        return;
    }
    for y in 0..height {
        let factor = y as f64 / height as f64;
        let color = interpolate(top, bottom, factor);
        surface.draw_hline(0, width as i32 - 1, y as i32, color, 255);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::canvas::Canvas;

    #[test]
    fn test_gradient_rows() {
        let mut canvas = Canvas::new(4, 10);
        paint_gradient(&mut canvas, 10, 4, Color::BLACK, Color::rgb(100, 100, 100));

        assert_eq!(canvas.pixel(0, 0), Some(Color::BLACK));
        assert_eq!(canvas.pixel(3, 5), Some(Color::rgb(50, 50, 50)));
        assert_eq!(canvas.pixel(2, 9), Some(Color::rgb(90, 90, 90)));
    }

    #[test]
    fn test_gradient_rows_are_uniform() {
        let mut canvas = Canvas::new(7, 3);
        paint_gradient(&mut canvas, 3, 7, Color::rgb(0, 30, 60), Color::rgb(90, 0, 0));
        for y in 0..3 {
            let first = canvas.pixel(0, y);
            for x in 1..7 {
                assert_eq!(canvas.pixel(x, y), first);
            }
        }
    }

    #[test]
    fn test_zero_height_is_noop() {
        let mut canvas = Canvas::new(2, 2);
        paint_gradient(&mut canvas, 0, 2, Color::WHITE, Color::WHITE);
        assert_eq!(canvas.pixel(0, 0), Some(Color::BLACK));
    }
}
