use super::{Bounds, Particle, random_between};
use crate::render::canvas::Surface;
use crate::render::color::Color;

pub const RAIN_COLOR: Color = Color::rgb(180, 180, 255);
pub const RAIN_ALPHA: u8 = 100;

/// Respawn window above the viewport, in pixels.
pub const RESPAWN_MIN_Y: i32 = -50;
pub const RESPAWN_MAX_Y: i32 = -10;

/// A short vertical streak falling at a constant speed.
#[derive(Debug, Clone, PartialEq)]
pub struct Raindrop {
    pub x: i32,
    pub y: f32,
    pub length: i32,
    pub speed: f32,
}

impl Raindrop {
    pub fn new(x: i32, y: f32, length: i32, speed: f32) -> Self {
        Self {
            x,
            y,
            length,
            speed,
        }
    }

    fn respawn(&mut self, bounds: Bounds) {
        self.y = random_between(RESPAWN_MIN_Y, RESPAWN_MAX_Y) as f32;
        self.x = random_between(0, bounds.width as i32 - 1);
    }
}

impl Particle for Raindrop {
    fn spawn(bounds: Bounds) -> Self {
        let h = bounds.height as i32;
        let length = random_between((h / 40).max(2), (h / 24).max(3));
        let speed = random_between((h / 90).max(2), (h / 50).max(3)) as f32;
        Raindrop::new(
            random_between(0, bounds.width as i32 - 1),
            random_between(-h, 0) as f32,
            length,
            speed,
        )
    }

    fn update(&mut self, bounds: Bounds) {
        self.y += self.speed;
        if self.y > bounds.height as f32 {
            self.respawn(bounds);
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let top = self.y.round() as i32;
        surface.draw_line(
            (self.x, top),
            (self.x, top + self.length),
            RAIN_COLOR,
            RAIN_ALPHA,
        );
    }
}
