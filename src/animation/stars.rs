use super::{Bounds, Particle, random_between};
use crate::render::canvas::Surface;
use crate::render::color::Color;

pub const MIN_BRIGHTNESS: i32 = 180;
pub const MAX_BRIGHTNESS: i32 = 255;
const MAX_TWINKLE_STEP: i32 = 3;

const STAR_COLORS: [Color; 3] = [
    Color::rgb(255, 255, 255),
    Color::rgb(255, 244, 214),
    Color::rgb(202, 216, 255),
];

/// A fixed point of light whose brightness random-walks between
/// [`MIN_BRIGHTNESS`] and [`MAX_BRIGHTNESS`].
#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub x: i32,
    pub y: i32,
    pub radius: i32,
    pub color: Color,
    brightness: i32,
    direction: i32,
}

impl Star {
    pub fn new(x: i32, y: i32, radius: i32, color: Color) -> Self {
        Self {
            x,
            y,
            radius,
            color,
            brightness: MAX_BRIGHTNESS,
            direction: if rand::random::<bool>() { 1 } else { -1 },
        }
    }

    pub fn brightness(&self) -> i32 {
        self.brightness
    }

    fn step(&mut self, delta: i32) {
        self.brightness += delta * self.direction;
        if self.brightness > MAX_BRIGHTNESS {
            self.brightness = MAX_BRIGHTNESS;
            self.direction = -self.direction;
        } else if self.brightness < MIN_BRIGHTNESS {
            self.brightness = MIN_BRIGHTNESS;
            self.direction = -self.direction;
        }
    }
}

impl Particle for Star {
    fn spawn(bounds: Bounds) -> Self {
        // Keep stars in the upper two thirds so they sit behind the clock.
        let sky_height = (bounds.height as i32 * 2 / 3).max(1);
        let radius = if rand::random::<f32>() < 0.15 { 1 } else { 0 };
        let color = STAR_COLORS[rand::random::<u32>() as usize % STAR_COLORS.len()];
        Star::new(
            random_between(0, bounds.width as i32 - 1),
            random_between(0, sky_height - 1),
            radius,
            color,
        )
    }

    fn update(&mut self, _bounds: Bounds) {
        self.step(random_between(0, MAX_TWINKLE_STEP));
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let color = self.color.dimmed(self.brightness.clamp(0, 255) as u8);
        surface.fill_circle(self.x, self.y, self.radius, color, 255);
    }
}
