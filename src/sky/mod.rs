pub mod gradient;
pub mod moon;
pub mod phase;
pub mod sun;

use crate::animation::{Bounds, Cloud, ParticleSystem, Raindrop, Star};
use crate::render::canvas::Surface;
use crate::weather::types::WeatherCondition;

pub use gradient::paint_gradient;
pub use moon::{MoonPhase, render_moon};
pub use phase::{BackgroundColors, DayPhase, resolve_background};
pub use sun::render_sun;

const CLOUD_COUNT: usize = 5;

fn star_count(bounds: Bounds) -> usize {
    (bounds.width as usize * bounds.height as usize) / 3000 + 20
}

fn raindrop_count(bounds: Bounds) -> usize {
    (bounds.width as usize * bounds.height as usize) / 1500 + 30
}

/// Which overlays are drawn on top of the gradient this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SkyLayers {
    pub stars: bool,
    pub clouds: bool,
    pub rain: bool,
    pub moon: bool,
    pub sun: bool,
}

impl SkyLayers {
    /// Picks overlays for the time of day and the primary weather condition.
    /// Without a condition the sky is treated as clear.
    pub fn select(phase: DayPhase, condition: Option<WeatherCondition>) -> Self {
        let night = phase.is_night();
        let condition = condition.unwrap_or(WeatherCondition::Clear);
        let rain = condition.is_raining();
        let clouds = condition.is_cloudy();

        Self {
            stars: night && condition.is_clear(),
            clouds,
            rain,
            moon: night && !clouds && !rain,
            sun: !night && condition.is_clear(),
        }
    }
}

/// Background, particles and moon for one viewport.
pub struct Sky {
    bounds: Bounds,
    stars: ParticleSystem<Star>,
    clouds: ParticleSystem<Cloud>,
    rain: ParticleSystem<Raindrop>,
}

impl Sky {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            stars: ParticleSystem::new(bounds, star_count(bounds)),
            clouds: ParticleSystem::new(bounds, CLOUD_COUNT),
            rain: ParticleSystem::new(bounds, raindrop_count(bounds)),
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Re-spawns every particle for the new viewport. No-op when unchanged.
    pub fn resize(&mut self, bounds: Bounds) {
        if bounds != self.bounds {
            *self = Sky::new(bounds);
        }
    }

    pub fn stars(&self) -> &ParticleSystem<Star> {
        &self.stars
    }

    pub fn clouds(&self) -> &ParticleSystem<Cloud> {
        &self.clouds
    }

    pub fn rain(&self) -> &ParticleSystem<Raindrop> {
        &self.rain
    }

    /// Advances only the systems that are visible.
    pub fn update(&mut self, layers: SkyLayers) {
        if layers.stars {
            self.stars.update();
        }
        if layers.clouds {
            self.clouds.update();
        }
        if layers.rain {
            self.rain.update();
        }
    }

    pub fn render(
        &self,
        surface: &mut dyn Surface,
        background: &BackgroundColors,
        layers: SkyLayers,
        moon_phase: f64,
    ) {
        let width = surface.width();
        let height = surface.height();
        paint_gradient(surface, height, width, background.top, background.bottom);

        if layers.stars {
            self.stars.render(surface);
        }
        if layers.moon {
            render_moon(surface, moon_phase, background.top);
        }
        if layers.sun {
            render_sun(surface);
        }
        if layers.clouds {
            self.clouds.render(surface);
        }
        if layers.rain {
            self.rain.render(surface);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_night_shows_stars_and_moon() {
        let layers = SkyLayers::select(DayPhase::Night, Some(WeatherCondition::Clear));
        assert_eq!(
            layers,
            SkyLayers {
                stars: true,
                clouds: false,
                rain: false,
                moon: true,
                sun: false,
            }
        );
    }

    #[test]
    fn test_clear_day_shows_only_the_sun() {
        for phase in [DayPhase::Dawn, DayPhase::Day, DayPhase::DuskTransition] {
            let layers = SkyLayers::select(phase, Some(WeatherCondition::Clear));
            assert_eq!(
                layers,
                SkyLayers {
                    sun: true,
                    ..Default::default()
                }
            );
        }
    }

    #[test]
    fn test_sun_and_moon_never_together() {
        let conditions = [
            None,
            Some(WeatherCondition::Clear),
            Some(WeatherCondition::Cloudy),
            Some(WeatherCondition::Rainy),
            Some(WeatherCondition::Snowy),
        ];
        for phase in DayPhase::all() {
            for condition in conditions {
                let layers = SkyLayers::select(phase, condition);
                assert!(!(layers.sun && layers.moon));
                if layers.sun {
                    assert!(!phase.is_night());
                }
            }
        }
    }

    #[test]
    fn test_cloudy_day_hides_sun() {
        let layers = SkyLayers::select(DayPhase::Day, Some(WeatherCondition::Cloudy));
        assert!(!layers.sun);
        assert!(layers.clouds);
    }

    #[test]
    fn test_render_draws_sun_over_gradient() {
        let bounds = Bounds::new(160, 96);
        let sky = Sky::new(bounds);
        let mut canvas = crate::render::canvas::Canvas::new(160, 96);
        let background = BackgroundColors {
            phase: DayPhase::Day,
            top: phase::DAY,
            bottom: phase::DAY,
        };
        let layers = SkyLayers::select(DayPhase::Day, Some(WeatherCondition::Clear));
        sky.render(&mut canvas, &background, layers, 0.5);
        assert_eq!(canvas.pixel(146, 14), Some(sun::SUN));
        assert_eq!(canvas.pixel(20, 80), Some(phase::DAY));
    }

    #[test]
    fn test_rain_any_time() {
        for phase in DayPhase::all() {
            let layers = SkyLayers::select(phase, Some(WeatherCondition::Rainy));
            assert!(layers.rain);
            assert!(!layers.moon);
            assert!(!layers.stars);
        }
    }

    #[test]
    fn test_stars_and_clouds_never_together() {
        let conditions = [
            None,
            Some(WeatherCondition::Clear),
            Some(WeatherCondition::Cloudy),
            Some(WeatherCondition::Rainy),
            Some(WeatherCondition::Snowy),
            Some(WeatherCondition::Other),
        ];
        for phase in DayPhase::all() {
            for condition in conditions {
                let layers = SkyLayers::select(phase, condition);
                assert!(!(layers.stars && layers.clouds));
            }
        }
    }

    #[test]
    fn test_unknown_weather_is_clear() {
        let layers = SkyLayers::select(DayPhase::DeepNight, None);
        assert!(layers.stars);
        assert!(layers.moon);
    }

    #[test]
    fn test_resize_respawns_for_new_bounds() {
        let mut sky = Sky::new(Bounds::new(60, 30));
        sky.resize(Bounds::new(300, 100));
        assert_eq!(sky.bounds(), Bounds::new(300, 100));
        assert_eq!(sky.stars().len(), 30);
        assert_eq!(sky.rain().len(), 50);
        assert_eq!(sky.clouds().bounds(), Bounds::new(300, 100));
    }
}
