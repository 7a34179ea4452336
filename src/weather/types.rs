use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit system requested from the weather service.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WeatherUnits {
    #[default]
    Imperial,
    Metric,
    Standard,
}

impl WeatherUnits {
    pub fn as_query(&self) -> &'static str {
        match self {
            WeatherUnits::Imperial => "imperial",
            WeatherUnits::Metric => "metric",
            WeatherUnits::Standard => "standard",
        }
    }

    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            WeatherUnits::Imperial => "°F",
            WeatherUnits::Metric => "°C",
            WeatherUnits::Standard => "K",
        }
    }
}

/// Coarse sky condition derived from a report's condition keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherCondition {
    Clear,
    Cloudy,
    Rainy,
    Snowy,
    Other,
}

impl WeatherCondition {
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword.trim().to_ascii_lowercase().as_str() {
            "clear" => WeatherCondition::Clear,
            "clouds" | "cloudy" | "overcast" | "mist" | "fog" | "haze" | "smoke" => {
                WeatherCondition::Cloudy
            }
            "rain" | "drizzle" | "thunderstorm" => WeatherCondition::Rainy,
            "snow" => WeatherCondition::Snowy,
            _ => WeatherCondition::Other,
        }
    }

    pub fn is_clear(&self) -> bool {
        matches!(self, WeatherCondition::Clear)
    }

    pub fn is_cloudy(&self) -> bool {
        matches!(self, WeatherCondition::Cloudy)
    }

    pub fn is_raining(&self) -> bool {
        matches!(self, WeatherCondition::Rainy)
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WeatherCondition::Clear => "clear",
            WeatherCondition::Cloudy => "cloudy",
            WeatherCondition::Rainy => "rainy",
            WeatherCondition::Snowy => "snowy",
            WeatherCondition::Other => "other",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionReport {
    /// Lowercased condition group such as `clear`, `clouds` or `rain`.
    pub keyword: String,
    pub description: String,
    pub icon_code: Option<String>,
    pub icon: Option<RgbaImage>,
}

impl ConditionReport {
    pub fn condition(&self) -> WeatherCondition {
        WeatherCondition::from_keyword(&self.keyword)
    }
}

/// Current conditions at one location. A failed fetch is represented by
/// [`WeatherSnapshot::unavailable`], with every field empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherSnapshot {
    pub temperature: Option<f64>,
    pub feels_like: Option<f64>,
    pub pressure: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_direction: Option<f64>,
    pub reports: Vec<ConditionReport>,
}

impl WeatherSnapshot {
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn is_available(&self) -> bool {
        self.temperature.is_some()
    }

    pub fn primary_condition(&self) -> Option<WeatherCondition> {
        self.reports.first().map(ConditionReport::condition)
    }

    pub fn icons(&self) -> impl Iterator<Item = &RgbaImage> {
        self.reports.iter().filter_map(|r| r.icon.as_ref())
    }
}

/// Outcome of one refresh attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherFetch {
    Fetched(WeatherSnapshot),
    Failed { reason: String },
}

impl WeatherFetch {
    pub fn is_fetched(&self) -> bool {
        matches!(self, WeatherFetch::Fetched(_))
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            WeatherFetch::Fetched(_) => None,
            WeatherFetch::Failed { reason } => Some(reason),
        }
    }

    pub fn snapshot(&self) -> WeatherSnapshot {
        self.clone().into_snapshot()
    }

    pub fn into_snapshot(self) -> WeatherSnapshot {
        match self {
            WeatherFetch::Fetched(snapshot) => snapshot,
            WeatherFetch::Failed { .. } => WeatherSnapshot::unavailable(),
        }
    }
}

/// Where to look up the weather.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    pub zip_code: String,
    pub country_code: String,
}

impl WeatherQuery {
    pub fn new(zip_code: impl Into<String>, country_code: impl Into<String>) -> Self {
        Self {
            zip_code: zip_code.into(),
            country_code: country_code.into(),
        }
    }
}
