//! Closed-form solar and lunar calculations.
//!
//! Accuracy is a few minutes for sunrise/sunset and a few hours for the
//! lunar phase, which is plenty for picking sky colors.

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

pub const EARTH_AXIAL_TILT: f64 = 23.45;

/// Zenith angle of the sun's center at rise/set, including refraction and
/// the solar disc radius.
pub const SUNRISE_ZENITH: f64 = 90.833;

/// Mean length of the synodic month in days.
pub const SYNODIC_MONTH_DAYS: f64 = 29.530588853;

const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunTimes {
    pub sunrise: DateTime<Tz>,
    pub sunset: DateTime<Tz>,
}

impl SunTimes {
    pub fn is_well_formed(&self) -> bool {
        self.sunrise < self.sunset
    }

    pub fn day_length(&self) -> TimeDelta {
        self.sunset - self.sunrise
    }
}

pub fn deg_to_rad(deg: f64) -> f64 {
    deg * (std::f64::consts::PI / 180.0)
}

pub fn rad_to_deg(rad: f64) -> f64 {
    rad * (180.0 / std::f64::consts::PI)
}

fn intermediate_angle_b(day_of_year: u32) -> f64 {
    deg_to_rad((day_of_year as f64 - 1.0) * (360.0 / 365.0))
}

/// Equation of time in minutes.
pub fn equation_of_time(day_of_year: u32) -> f64 {
    let b = intermediate_angle_b(day_of_year);
    229.18
        * (0.000075 + 0.001868 * b.cos()
            - 0.032077 * b.sin()
            - 0.014615 * (2.0 * b).cos()
            - 0.040849 * (2.0 * b).sin())
}

/// Solar declination in degrees.
pub fn solar_declination(day_of_year: u32) -> f64 {
    EARTH_AXIAL_TILT * deg_to_rad(360.0 * ((284 + day_of_year) as f64 / 365.0)).sin()
}

/// Sunrise and sunset for `date` at the given coordinates, expressed in
/// `tz`. Returns `None` when the sun never crosses the horizon that day
/// (polar day or polar night).
pub fn sun_times(latitude: f64, longitude: f64, date: NaiveDate, tz: Tz) -> Option<SunTimes> {
    let n = date.ordinal();
    let eot = equation_of_time(n);
    let lat = deg_to_rad(latitude);
    let decl = deg_to_rad(solar_declination(n));

    let cos_h = deg_to_rad(SUNRISE_ZENITH).cos() / (lat.cos() * decl.cos()) - lat.tan() * decl.tan();
    if !cos_h.is_finite() || !(-1.0..=1.0).contains(&cos_h) {
        return None;
    }
    let half_arc = rad_to_deg(cos_h.acos());

    let sunrise_minutes = 720.0 - 4.0 * (longitude + half_arc) - eot;
    let sunset_minutes = 720.0 - 4.0 * (longitude - half_arc) - eot;

    let midnight_utc = date.and_hms_opt(0, 0, 0)?.and_utc();
    let at = |minutes: f64| {
        let offset = TimeDelta::milliseconds((minutes * 60_000.0).round() as i64);
        (midnight_utc + offset).with_timezone(&tz)
    };

    Some(SunTimes {
        sunrise: at(sunrise_minutes),
        sunset: at(sunset_minutes),
    })
}

/// Sun times for the local calendar day that contains `now`.
pub fn sun_times_for(latitude: f64, longitude: f64, now: &DateTime<Tz>) -> Option<SunTimes> {
    sun_times(latitude, longitude, now.date_naive(), now.timezone())
}

fn reference_new_moon() -> DateTime<Utc> {
    // 2000-01-06 18:14 UTC
    DateTime::from_timestamp(947_182_440, 0).unwrap_or_default()
}

/// Position in the synodic cycle at `now`: 0 is new moon, ~0.5 full moon.
/// Always in `[0, 1)`.
pub fn moon_phase<T: TimeZone>(now: &DateTime<T>) -> f64 {
    let elapsed = now.with_timezone(&Utc) - reference_new_moon();
    let days = elapsed.num_milliseconds() as f64 / 1000.0 / SECONDS_PER_DAY;
    let phase = (days / SYNODIC_MONTH_DAYS).rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs
    if phase >= 1.0 { 0.0 } else { phase }
}
