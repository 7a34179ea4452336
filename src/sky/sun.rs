use crate::render::canvas::Surface;
use crate::render::color::Color;
use crate::sky::moon::MoonPlacement;

pub const SUN: Color = Color::rgb(255, 223, 0);
pub const RAY_COUNT: usize = 12;

/// Draws a sun with rays where the moon would sit at night.
pub fn render_sun<S: Surface + ?Sized>(surface: &mut S) {
    let placement = MoonPlacement::for_surface(surface.width(), surface.height());
    let r = placement.radius;
    if r <= 0 {
        return;
    }
    let (cx, cy) = (placement.center_x, placement.center_y);
    surface.fill_circle(cx, cy, r, SUN, 255);

    let inner = r as f64 * 1.2;
    let outer = r as f64 * 1.4;
    let thickness = (r / 25).max(0);
    for i in 0..RAY_COUNT {
        let angle = (360.0 / RAY_COUNT as f64 * i as f64).to_radians();
        let (sin, cos) = angle.sin_cos();
        let from = (
            cx + (inner * cos).round() as i32,
            cy - (inner * sin).round() as i32,
        );
        let to = (
            cx + (outer * cos).round() as i32,
            cy - (outer * sin).round() as i32,
        );
        for offset in -thickness..=thickness {
            surface.draw_line(
                (from.0 + offset, from.1),
                (to.0 + offset, to.1),
                SUN,
                255,
            );
        }
    }
}
