use crate::render::canvas::Surface;
use crate::render::color::Color;
use std::fmt;

pub const MOON: Color = Color::rgb(200, 200, 200);

/// Coarse eight-way classification of the lunar cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoonPhase {
    New,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    Full,
    WaningGibbous,
    ThirdQuarter,
    WaningCrescent,
}

impl MoonPhase {
    /// Buckets a phase value in `[0, 1)` so each named phase is centered on
    /// its eighth of the cycle (new moon covers both ends).
    pub fn from_value(value: f64) -> Self {
        let bucket = ((value * 8.0).round() as i64).rem_euclid(8);
        match bucket {
            0 => MoonPhase::New,
            1 => MoonPhase::WaxingCrescent,
            2 => MoonPhase::FirstQuarter,
            3 => MoonPhase::WaxingGibbous,
            4 => MoonPhase::Full,
            5 => MoonPhase::WaningGibbous,
            6 => MoonPhase::ThirdQuarter,
            _ => MoonPhase::WaningCrescent,
        }
    }

    /// Whether the point `(dx, dy)` relative to the disc center lies in
    /// shadow. Points outside the disc are never asked about.
    ///
    /// Quarters shadow half the disc, crescents shadow an offset block
    /// that leaves a quarter-width sliver lit, and gibbous phases shadow a
    /// half disc from which a half ellipse of width `r/2` is relit.
    pub fn is_shadowed(self, dx: i32, dy: i32, radius: i32) -> bool {
        let r = radius.max(1) as f64;
        let (x, y) = (dx as f64, dy as f64);
        let inside_half_ellipse = {
            let a = r / 2.0;
            (x / a).powi(2) + (y / r).powi(2) <= 1.0
        };

        match self {
            MoonPhase::New => true,
            MoonPhase::Full => false,
            MoonPhase::FirstQuarter => x < 0.0,
            MoonPhase::ThirdQuarter => x > 0.0,
            MoonPhase::WaxingCrescent => x < r / 2.0,
            MoonPhase::WaningCrescent => x > -r / 2.0,
            MoonPhase::WaxingGibbous => x < 0.0 && !inside_half_ellipse,
            MoonPhase::WaningGibbous => x > 0.0 && !inside_half_ellipse,
        }
    }
}

impl fmt::Display for MoonPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MoonPhase::New => "new moon",
            MoonPhase::WaxingCrescent => "waxing crescent",
            MoonPhase::FirstQuarter => "first quarter",
            MoonPhase::WaxingGibbous => "waxing gibbous",
            MoonPhase::Full => "full moon",
            MoonPhase::WaningGibbous => "waning gibbous",
            MoonPhase::ThirdQuarter => "third quarter",
            MoonPhase::WaningCrescent => "waning crescent",
        };
        f.write_str(name)
    }
}

/// Disc geometry in the top-right corner, scaled to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoonPlacement {
    pub center_x: i32,
    pub center_y: i32,
    pub radius: i32,
}

impl MoonPlacement {
    pub fn for_surface(width: u32, height: u32) -> Self {
        let radius = (width.min(height) / 8) as i32;
        let margin = (height as i32 / 48).max(1);
        Self {
            center_x: width as i32 - radius - margin,
            center_y: radius + margin,
            radius,
        }
    }
}

/// Draws the moon for `phase_value` using `shadow` for the unlit part.
pub fn render_moon<S: Surface + ?Sized>(surface: &mut S, phase_value: f64, shadow: Color) {
    let placement = MoonPlacement::for_surface(surface.width(), surface.height());
    let phase = MoonPhase::from_value(phase_value);
    draw_disc(surface, placement, phase, shadow);
}

fn draw_disc<S: Surface + ?Sized>(
    surface: &mut S,
    placement: MoonPlacement,
    phase: MoonPhase,
    shadow: Color,
) {
    let r = placement.radius;
    if r <= 0 {
        return;
    }
    let r2 = r * r;
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy > r2 {
                continue;
            }
            let color = if phase.is_shadowed(dx, dy, r) {
                shadow
            } else {
                MOON
            };
            surface.put_pixel(placement.center_x + dx, placement.center_y + dy, color);
        }
    }
}
