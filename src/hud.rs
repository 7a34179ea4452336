use chrono::{DateTime, TimeZone};
use image::RgbaImage;
use std::fmt::Display;

use crate::render::canvas::Surface;
use crate::render::color::Color;
use crate::render::font::BitmapFont;
use crate::weather::types::{WeatherSnapshot, WeatherUnits};

pub const CLOCK_FORMAT: &str = "%H:%M:%S";
pub const DATE_FORMAT: &str = "%A, %B %d, %Y";
pub const WEATHER_UNAVAILABLE: &str = "Weather Unavailable";

pub const TEXT_COLOR: Color = Color::WHITE;
pub const GLOW_COLOR: Color = Color::BLACK;
pub const CLOCK_GLOW: u32 = 3;
pub const TEXT_GLOW: u32 = 2;

const CLOCK_HEIGHT_PCT: u32 = 30;
const LINE_HEIGHT_PCT: u32 = 10;
const MAX_WIDTH_PCT: u32 = 95;

pub fn clock_text<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    now.format(CLOCK_FORMAT).to_string()
}

pub fn date_text<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    now.format(DATE_FORMAT).to_string()
}

pub fn weather_text(snapshot: &WeatherSnapshot, units: WeatherUnits) -> String {
    let symbol = units.temperature_symbol();
    match (snapshot.temperature, snapshot.feels_like) {
        (Some(temp), Some(feels)) => {
            format!("{temp:.1}{symbol}, feels like {feels:.1}{symbol}")
        }
        (Some(temp), None) => format!("{temp:.1}{symbol}"),
        (None, _) => WEATHER_UNAVAILABLE.to_string(),
    }
}

/// Draws `text` `glow` times in `glow_color` at offsets (-k, -k), then once
/// in `color` at `(x, y)`.
#[allow(clippy::too_many_arguments)]
pub fn draw_glow_text<S: Surface + ?Sized>(
    surface: &mut S,
    font: &BitmapFont,
    x: i32,
    y: i32,
    text: &str,
    color: Color,
    glow_color: Color,
    glow: u32,
) {
    for offset in 1..=glow as i32 {
        font.draw(surface, x - offset, y - offset, text, glow_color);
    }
    font.draw(surface, x, y, text, color);
}

/// One centered HUD line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudLine {
    pub text: String,
    pub font: BitmapFont,
    pub x: i32,
    pub y: i32,
    pub glow: u32,
}

impl HudLine {
    pub fn height(&self) -> i32 {
        self.font.line_height() as i32
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        draw_glow_text(
            surface,
            &self.font,
            self.x,
            self.y,
            &self.text,
            TEXT_COLOR,
            GLOW_COLOR,
            self.glow,
        );
    }
}

/// Clock at a third of the free height, date and weather stacked below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudLayout {
    pub clock: HudLine,
    pub date: HudLine,
    pub weather: HudLine,
}

impl HudLayout {
    pub fn compute(width: u32, height: u32, clock: &str, date: &str, weather: &str) -> Self {
        let max_width = width * MAX_WIDTH_PCT / 100;
        let gap = (height as i32 / 24).max(1);

        let clock_font = BitmapFont::fitting(height * CLOCK_HEIGHT_PCT / 100, clock, max_width);
        let date_font = BitmapFont::fitting(height * LINE_HEIGHT_PCT / 100, date, max_width);
        let weather_font = BitmapFont::fitting(height * LINE_HEIGHT_PCT / 100, weather, max_width);

        let centered_x = |font: &BitmapFont, text: &str| {
            let (w, _) = font.measure(text);
            (width as i32 - w as i32) / 2
        };

        let clock_y = (height as i32 - clock_font.line_height() as i32) / 3;
        let clock = HudLine {
            text: clock.to_string(),
            font: clock_font,
            x: centered_x(&clock_font, clock),
            y: clock_y,
            glow: CLOCK_GLOW,
        };

        let date_y = clock.y + clock.height() + gap;
        let date = HudLine {
            text: date.to_string(),
            font: date_font,
            x: centered_x(&date_font, date),
            y: date_y,
            glow: TEXT_GLOW,
        };

        let weather_y = date.y + date.height() + gap;
        let weather = HudLine {
            text: weather.to_string(),
            font: weather_font,
            x: centered_x(&weather_font, weather),
            y: weather_y,
            glow: TEXT_GLOW,
        };

        Self {
            clock,
            date,
            weather,
        }
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        self.clock.draw(surface);
        self.date.draw(surface);
        self.weather.draw(surface);
    }
}

/// Side length of a condition icon on a surface `height` pixels tall.
pub fn icon_size(height: u32) -> u32 {
    (height / 5).min(crate::weather::icons::ICON_SIZE)
}

/// Condition icons left to right along the top-left corner.
pub fn draw_icons<'a, S, I>(surface: &mut S, icons: I)
where
    S: Surface + ?Sized,
    I: IntoIterator<Item = &'a RgbaImage>,
{
    let size = icon_size(surface.height());
    if size == 0 {
        return;
    }
    for (i, icon) in icons.into_iter().enumerate() {
        surface.blit_image(icon, i as i32 * size as i32, 0, size, size);
    }
}
