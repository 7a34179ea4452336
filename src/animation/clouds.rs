use super::{Bounds, Particle, random_between, random_f32};
use crate::render::canvas::Surface;
use crate::render::color::Color;

pub const CLOUD_COLOR: Color = Color::rgb(100, 100, 120);

/// A translucent ellipse drifting to the right, re-entering from the left.
#[derive(Debug, Clone, PartialEq)]
pub struct Cloud {
    pub x: f32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub alpha: u8,
    pub speed: f32,
}

impl Cloud {
    pub fn new(x: f32, y: i32, width: i32, height: i32, alpha: u8, speed: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            alpha,
            speed,
        }
    }
}

impl Particle for Cloud {
    fn spawn(bounds: Bounds) -> Self {
        let w = bounds.width as i32;
        let h = bounds.height as i32;
        let width = random_between((w / 8).max(4), (w / 3).max(6));
        let height = random_between((width / 4).max(2), (width / 2).max(3));
        Cloud::new(
            random_between(-width, w) as f32,
            random_between(0, (h / 3).max(1)),
            width,
            height,
            random_between(120, 200) as u8,
            random_f32(0.1, 0.6),
        )
    }

    fn update(&mut self, bounds: Bounds) {
        self.x += self.speed;
        if self.x > bounds.width as f32 {
            self.x = -self.width as f32;
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        surface.fill_ellipse(
            self.x.round() as i32,
            self.y,
            self.width,
            self.height,
            CLOUD_COLOR,
            self.alpha,
        );
    }
}
