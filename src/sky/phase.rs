use crate::astronomy::SunTimes;
use crate::render::color::{Color, interpolate};
use chrono::{DateTime, TimeDelta, Timelike};
use chrono_tz::Tz;
use std::fmt;

pub const NIGHT: Color = Color::rgb(10, 10, 40);
pub const DAWN: Color = Color::rgb(255, 120, 70);
pub const DAY: Color = Color::rgb(135, 206, 250);
pub const SUNSET: Color = Color::rgb(255, 90, 40);

/// Minutes before sunrise where dawn starts, and after sunset where dusk ends.
pub const TWILIGHT_MINUTES: i64 = 45;
/// Minutes after sunrise (and before sunset) spent blending towards full day.
pub const TRANSITION_MINUTES: i64 = 30;

/// Named time-of-day window, in chronological order across one local day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayPhase {
    DeepNight,
    Dawn,
    MorningTransition,
    Day,
    PreSunsetTransition,
    DuskTransition,
    Night,
}

/// Boundaries of the phase windows for one sunrise/sunset pair. Each window
/// is half-open, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseWindows {
    pub dawn_start: DateTime<Tz>,
    pub sunrise: DateTime<Tz>,
    pub morning_end: DateTime<Tz>,
    pub evening_start: DateTime<Tz>,
    pub sunset: DateTime<Tz>,
    pub dusk_end: DateTime<Tz>,
}

impl PhaseWindows {
    pub fn new(sun: &SunTimes) -> Self {
        let twilight = TimeDelta::minutes(TWILIGHT_MINUTES);
        let transition = TimeDelta::minutes(TRANSITION_MINUTES);
        Self {
            dawn_start: sun.sunrise - twilight,
            sunrise: sun.sunrise,
            morning_end: sun.sunrise + transition,
            evening_start: sun.sunset - transition,
            sunset: sun.sunset,
            dusk_end: sun.sunset + twilight,
        }
    }

    /// First window whose end lies after `now`. The boundary chain is
    /// checked in order, so every instant maps to exactly one phase even
    /// when a short day collapses some windows to nothing.
    pub fn classify(&self, now: &DateTime<Tz>) -> DayPhase {
        if *now < self.dawn_start {
            DayPhase::DeepNight
        } else if *now < self.sunrise {
            DayPhase::Dawn
        } else if *now < self.morning_end {
            DayPhase::MorningTransition
        } else if *now < self.evening_start {
            DayPhase::Day
        } else if *now < self.sunset {
            DayPhase::PreSunsetTransition
        } else if *now < self.dusk_end {
            DayPhase::DuskTransition
        } else {
            DayPhase::Night
        }
    }
}

impl DayPhase {
    pub fn classify(now: &DateTime<Tz>, sun: &SunTimes) -> Self {
        if !sun.is_well_formed() {
            return Self::fallback(now);
        }
        PhaseWindows::new(sun).classify(now)
    }

    /// Phase used when no usable sun times exist: plain day between 06:00
    /// and 18:00 local time, night otherwise.
    pub fn fallback(now: &DateTime<Tz>) -> Self {
        if (6..18).contains(&now.hour()) {
            DayPhase::Day
        } else {
            DayPhase::Night
        }
    }

    pub fn is_night(self) -> bool {
        matches!(self, DayPhase::DeepNight | DayPhase::Night)
    }

    pub fn all() -> [DayPhase; 7] {
        [
            DayPhase::DeepNight,
            DayPhase::Dawn,
            DayPhase::MorningTransition,
            DayPhase::Day,
            DayPhase::PreSunsetTransition,
            DayPhase::DuskTransition,
            DayPhase::Night,
        ]
    }
}

impl fmt::Display for DayPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DayPhase::DeepNight => "deep night",
            DayPhase::Dawn => "dawn",
            DayPhase::MorningTransition => "morning",
            DayPhase::Day => "day",
            DayPhase::PreSunsetTransition => "pre-sunset",
            DayPhase::DuskTransition => "dusk",
            DayPhase::Night => "night",
        };
        f.write_str(name)
    }
}

/// Top and bottom stops of the vertical sky gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundColors {
    pub phase: DayPhase,
    pub top: Color,
    pub bottom: Color,
}

impl BackgroundColors {
    fn from_top(phase: DayPhase, top: Color) -> Self {
        Self {
            phase,
            top,
            bottom: interpolate(top, Color::BLACK, 0.5),
        }
    }

    pub fn fallback(now: &DateTime<Tz>) -> Self {
        let phase = DayPhase::fallback(now);
        let top = if phase == DayPhase::Day { DAY } else { NIGHT };
        Self::from_top(phase, top)
    }
}

fn fraction(from: &DateTime<Tz>, now: &DateTime<Tz>, span: TimeDelta) -> f64 {
    let span_ms = span.num_milliseconds();
    if span_ms <= 0 {
        return 1.0;
    }
    (*now - *from).num_milliseconds() as f64 / span_ms as f64
}

/// Sky colors for `now` given the day's sun times.
///
/// Malformed sun times (sunrise not strictly before sunset) never reach the
/// interpolation arithmetic; a solid day or night sky is used instead.
pub fn resolve_background(now: &DateTime<Tz>, sun: &SunTimes) -> BackgroundColors {
    if !sun.is_well_formed() {
        return BackgroundColors::fallback(now);
    }

    let w = PhaseWindows::new(sun);
    let transition = TimeDelta::minutes(TRANSITION_MINUTES);
    let phase = w.classify(now);

    let top = match phase {
        DayPhase::DeepNight | DayPhase::Night => NIGHT,
        DayPhase::Dawn => interpolate(
            NIGHT,
            DAWN,
            fraction(&w.dawn_start, now, w.sunrise - w.dawn_start),
        ),
        DayPhase::MorningTransition => {
            interpolate(DAWN, DAY, fraction(&w.sunrise, now, transition))
        }
        DayPhase::Day => DAY,
        DayPhase::PreSunsetTransition => {
            interpolate(DAY, SUNSET, fraction(&w.evening_start, now, transition))
        }
        DayPhase::DuskTransition => interpolate(
            SUNSET,
            NIGHT,
            fraction(&w.sunset, now, w.dusk_end - w.sunset),
        ),
    };

    BackgroundColors::from_top(phase, top)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::UTC;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Tz> {
        UTC.with_ymd_and_hms(2026, 6, 1, h, m, s).unwrap()
    }

    fn sun() -> SunTimes {
        SunTimes {
            sunrise: at(6, 0, 0),
            sunset: at(20, 0, 0),
        }
    }

    #[test]
    fn test_classify_each_window() {
        let sun = sun();
        assert_eq!(DayPhase::classify(&at(3, 0, 0), &sun), DayPhase::DeepNight);
        assert_eq!(DayPhase::classify(&at(5, 30, 0), &sun), DayPhase::Dawn);
        assert_eq!(DayPhase::classify(&at(6, 10, 0), &sun), DayPhase::MorningTransition);
        assert_eq!(DayPhase::classify(&at(12, 0, 0), &sun), DayPhase::Day);
        assert_eq!(DayPhase::classify(&at(19, 45, 0), &sun), DayPhase::PreSunsetTransition);
        assert_eq!(DayPhase::classify(&at(20, 30, 0), &sun), DayPhase::DuskTransition);
        assert_eq!(DayPhase::classify(&at(23, 0, 0), &sun), DayPhase::Night);
    }

    #[test]
    fn test_classify_boundaries_are_half_open() {
        let sun = sun();
        assert_eq!(DayPhase::classify(&at(5, 15, 0), &sun), DayPhase::Dawn);
        assert_eq!(DayPhase::classify(&at(5, 14, 59), &sun), DayPhase::DeepNight);
        assert_eq!(DayPhase::classify(&at(6, 0, 0), &sun), DayPhase::MorningTransition);
        assert_eq!(DayPhase::classify(&at(6, 30, 0), &sun), DayPhase::Day);
        assert_eq!(DayPhase::classify(&at(19, 30, 0), &sun), DayPhase::PreSunsetTransition);
        assert_eq!(DayPhase::classify(&at(20, 0, 0), &sun), DayPhase::DuskTransition);
        assert_eq!(DayPhase::classify(&at(20, 45, 0), &sun), DayPhase::Night);
    }

    #[test]
    fn test_dawn_blend_midpoint() {
        let colors = resolve_background(&at(5, 37, 30), &sun());
        assert_eq!(colors.phase, DayPhase::Dawn);
        assert_eq!(colors.top, interpolate(NIGHT, DAWN, 0.5));
    }

    #[test]
    fn test_morning_blend_starts_at_dawn_color() {
        let colors = resolve_background(&at(6, 0, 0), &sun());
        assert_eq!(colors.top, DAWN);
    }

    #[test]
    fn test_pre_sunset_and_dusk_blends() {
        let sun = sun();
        let pre = resolve_background(&at(19, 45, 0), &sun);
        assert_eq!(pre.top, interpolate(DAY, SUNSET, 0.5));

        let dusk = resolve_background(&at(20, 0, 0), &sun);
        assert_eq!(dusk.top, SUNSET);
    }

    #[test]
    fn test_bottom_is_half_darkened_top() {
        for (h, m) in [(2, 0), (5, 40), (6, 20), (13, 0), (19, 50), (20, 20), (22, 0)] {
            let colors = resolve_background(&at(h, m, 0), &sun());
            assert_eq!(colors.bottom, interpolate(colors.top, Color::BLACK, 0.5));
        }
    }

    #[test]
    fn test_malformed_sun_times_fall_back() {
        let inverted = SunTimes {
            sunrise: at(20, 0, 0),
            sunset: at(6, 0, 0),
        };
        assert_eq!(resolve_background(&at(12, 0, 0), &inverted).top, DAY);
        assert_eq!(resolve_background(&at(2, 0, 0), &inverted).top, NIGHT);

        let empty = SunTimes {
            sunrise: at(12, 0, 0),
            sunset: at(12, 0, 0),
        };
        assert_eq!(resolve_background(&at(12, 0, 0), &empty).top, DAY);
        assert_eq!(DayPhase::classify(&at(23, 0, 0), &empty), DayPhase::Night);
    }

    #[test]
    fn test_short_day_still_partitions() {
        // Forty minutes of daylight: the morning and evening blends overlap.
        let short = SunTimes {
            sunrise: at(11, 40, 0),
            sunset: at(12, 20, 0),
        };
        let phase = DayPhase::classify(&at(12, 5, 0), &short);
        assert_eq!(phase, DayPhase::MorningTransition);
        let colors = resolve_background(&at(12, 5, 0), &short);
        assert_eq!(colors.phase, phase);
    }

    #[test]
    fn test_is_night() {
        assert!(DayPhase::DeepNight.is_night());
        assert!(DayPhase::Night.is_night());
        assert!(!DayPhase::Dawn.is_night());
        assert!(!DayPhase::DuskTransition.is_night());
        assert!(!DayPhase::Day.is_night());
    }
}
