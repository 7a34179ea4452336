/// An opaque 8-bit-per-channel RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scales every channel by `brightness / 255`.
    pub fn dimmed(self, brightness: u8) -> Self {
        let scale = |c: u8| ((c as u32 * brightness as u32) / 255) as u8;
        Color::rgb(scale(self.r), scale(self.g), scale(self.b))
    }
}

impl From<Color> for crossterm::style::Color {
    fn from(c: Color) -> Self {
        crossterm::style::Color::Rgb {
            r: c.r,
            g: c.g,
            b: c.b,
        }
    }
}

/// Linear blend from `a` to `b`, channel by channel, truncating toward zero.
///
/// The factor is clamped to `[0, 1]` so the result always stays inside the
/// segment between the two colors.
pub fn interpolate(a: Color, b: Color, factor: f64) -> Color {
    let t = if factor.is_nan() {
        0.0
    } else {
        factor.clamp(0.0, 1.0)
    };
    let channel = |from: u8, to: u8| {
        let from = from as f64;
        (from + (to as f64 - from) * t) as u8
    };
    Color::rgb(channel(a.r, b.r), channel(a.g, b.g), channel(a.b, b.b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_endpoints() {
        let a = Color::rgb(10, 200, 33);
        let b = Color::rgb(250, 4, 90);
        assert_eq!(interpolate(a, b, 0.0), a);
        assert_eq!(interpolate(a, b, 1.0), b);
    }

    #[test]
    fn test_interpolate_midpoint() {
        let result = interpolate(Color::BLACK, Color::rgb(100, 100, 100), 0.5);
        assert_eq!(result, Color::rgb(50, 50, 50));
    }

    #[test]
    fn test_interpolate_truncates() {
        // 0 + 255 * 0.3 = 76.5
        let result = interpolate(Color::BLACK, Color::WHITE, 0.3);
        assert_eq!(result, Color::rgb(76, 76, 76));
    }

    #[test]
    fn test_interpolate_descending_channels() {
        let result = interpolate(Color::rgb(200, 100, 0), Color::rgb(100, 0, 0), 0.5);
        assert_eq!(result, Color::rgb(150, 50, 0));
    }

    #[test]
    fn test_interpolate_clamps_out_of_range_factor() {
        let a = Color::rgb(10, 10, 40);
        let b = Color::rgb(255, 120, 70);
        assert_eq!(interpolate(a, b, -3.0), a);
        assert_eq!(interpolate(a, b, 7.5), b);
        assert_eq!(interpolate(a, b, f64::NAN), a);
    }

    #[test]
    fn test_dimmed() {
        assert_eq!(Color::WHITE.dimmed(255), Color::WHITE);
        assert_eq!(Color::WHITE.dimmed(0), Color::BLACK);
        assert_eq!(Color::rgb(200, 100, 50).dimmed(180), Color::rgb(141, 70, 35));
    }
}
