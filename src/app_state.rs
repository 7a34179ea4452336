use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use std::time::{Duration, Instant};

use crate::astronomy::{SunTimes, moon_phase, sun_times_for};
use crate::geolocation::GeoLocation;
use crate::hud;
use crate::sky::{BackgroundColors, SkyLayers, resolve_background};
use crate::weather::types::{WeatherCondition, WeatherFetch, WeatherSnapshot, WeatherUnits};

/// Fires once per `interval`; the first check is always due.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    last: Option<Instant>,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        match self.last {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        }
    }

    /// Returns whether the tick was due and, if so, restarts the interval.
    pub fn fire(&mut self, now: Instant) -> bool {
        let due = self.is_due(now);
        if due {
            self.last = Some(now);
        }
        due
    }
}

/// Everything the frame loop renders from, updated between frames.
pub struct AppState {
    pub location: GeoLocation,
    pub units: WeatherUnits,
    snapshot: WeatherSnapshot,
    last_failure: Option<String>,
    cached_weather_text: String,
    sun_times: Option<SunTimes>,
    sun_date: Option<NaiveDate>,
    background: BackgroundColors,
    moon_phase: f64,
    hourly: Ticker,
    sky: Ticker,
}

impl AppState {
    pub fn new(
        location: GeoLocation,
        units: WeatherUnits,
        refresh_interval: Duration,
        sky_interval: Duration,
        now: &DateTime<Tz>,
    ) -> Self {
        let snapshot = WeatherSnapshot::unavailable();
        Self {
            location,
            units,
            cached_weather_text: hud::weather_text(&snapshot, units),
            snapshot,
            last_failure: None,
            sun_times: None,
            sun_date: None,
            background: BackgroundColors::fallback(now),
            moon_phase: moon_phase(now),
            hourly: Ticker::new(refresh_interval),
            sky: Ticker::new(sky_interval),
        }
    }

    pub fn snapshot(&self) -> &WeatherSnapshot {
        &self.snapshot
    }

    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    pub fn background(&self) -> &BackgroundColors {
        &self.background
    }

    pub fn sun_times(&self) -> Option<&SunTimes> {
        self.sun_times.as_ref()
    }

    pub fn moon_phase(&self) -> f64 {
        self.moon_phase
    }

    pub fn weather_text(&self) -> &str {
        &self.cached_weather_text
    }

    pub fn condition(&self) -> Option<WeatherCondition> {
        self.snapshot.primary_condition()
    }

    pub fn layers(&self) -> SkyLayers {
        SkyLayers::select(self.background.phase, self.condition())
    }

    /// Replaces the snapshot. A failure keeps nothing of the previous one.
    pub fn apply_fetch(&mut self, fetch: WeatherFetch) {
        self.last_failure = fetch.failure_reason().map(str::to_string);
        self.snapshot = fetch.into_snapshot();
        self.cached_weather_text = hud::weather_text(&self.snapshot, self.units);
    }

    /// Advances the slow clocks. Returns `true` when the hourly tick fired
    /// and a weather refresh should be requested.
    pub fn tick(&mut self, now: &DateTime<Tz>, instant: Instant) -> bool {
        let hourly = self.hourly.fire(instant);
        let date_changed = self.sun_date != Some(now.date_naive());

        if hourly || date_changed {
            self.update_sun_times(now);
        }

        let sky_due = self.sky.fire(instant);
        if hourly || date_changed || sky_due {
            self.update_sky(now);
        }

        hourly
    }

    fn update_sun_times(&mut self, now: &DateTime<Tz>) {
        self.sun_date = Some(now.date_naive());
        self.sun_times = sun_times_for(self.location.latitude, self.location.longitude, now);
        match &self.sun_times {
            Some(sun) => tracing::info!(
                sunrise = %sun.sunrise.format("%H:%M"),
                sunset = %sun.sunset.format("%H:%M"),
                "sun times updated"
            ),
            None => tracing::warn!(
                latitude = self.location.latitude,
                "no sunrise or sunset today, using a fixed day/night sky"
            ),
        }
    }

    fn update_sky(&mut self, now: &DateTime<Tz>) {
        let background = match &self.sun_times {
            Some(sun) => resolve_background(now, sun),
            None => BackgroundColors::fallback(now),
        };
        if background.phase != self.background.phase {
            tracing::debug!(from = %self.background.phase, to = %background.phase, "day phase changed");
        }
        self.background = background;
        self.moon_phase = moon_phase(now);
    }
}
