use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::render::terminal::VideoDriver;
use crate::weather::icons::DEFAULT_ICON_BASE_URL;
use crate::weather::openweathermap::DEFAULT_BASE_URL;
use crate::weather::types::{WeatherQuery, WeatherUnits};

pub const ENV_LATITUDE: &str = "SKYCLOCK_LATITUDE";
pub const ENV_LONGITUDE: &str = "SKYCLOCK_LONGITUDE";
pub const ENV_API_KEY: &str = "SKYCLOCK_API_KEY";

pub const MAX_FPS: u32 = 240;

#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LocationConfig {
    #[serde(default = "default_true")]
    pub auto: bool,
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WeatherConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_zip_code")]
    pub zip_code: String,
    #[serde(default = "default_country_code")]
    pub country_code: String,
    #[serde(default)]
    pub units: WeatherUnits,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_icon_base_url")]
    pub icon_base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_icon_timeout_secs")]
    pub icon_timeout_secs: u64,
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DisplayConfig {
    /// Canvas size in pixels. Unset follows the terminal.
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default = "default_sky_refresh_secs")]
    pub sky_refresh_secs: u64,
    #[serde(default)]
    pub video_driver: VideoDriver,
    /// `auto` for the controlling terminal, otherwise a device path.
    #[serde(default = "default_display")]
    pub display: String,
}

fn default_true() -> bool {
    true
}

pub fn default_latitude() -> f64 {
    39.515362
}

pub fn default_longitude() -> f64 {
    -76.411751
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_zip_code() -> String {
    "21047".to_string()
}

fn default_country_code() -> String {
    "us".to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_icon_base_url() -> String {
    DEFAULT_ICON_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_icon_timeout_secs() -> u64 {
    5
}

fn default_refresh_interval_secs() -> u64 {
    3600
}

fn default_fps() -> u32 {
    60
}

fn default_sky_refresh_secs() -> u64 {
    60
}

fn default_display() -> String {
    "auto".to_string()
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            auto: true,
            latitude: default_latitude(),
            longitude: default_longitude(),
            timezone: default_timezone(),
            city: None,
            country: None,
        }
    }
}

impl LocationConfig {
    pub fn tz(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .trim()
            .parse::<Tz>()
            .map_err(|_| ConfigError::InvalidTimezone(self.timezone.clone()))
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            zip_code: default_zip_code(),
            country_code: default_country_code(),
            units: WeatherUnits::default(),
            base_url: default_base_url(),
            icon_base_url: default_icon_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            icon_timeout_secs: default_icon_timeout_secs(),
            refresh_interval_secs: default_refresh_interval_secs(),
        }
    }
}

impl WeatherConfig {
    pub fn query(&self) -> WeatherQuery {
        WeatherQuery::new(self.zip_code.trim(), self.country_code.trim())
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            fps: default_fps(),
            sky_refresh_secs: default_sky_refresh_secs(),
            video_driver: VideoDriver::default(),
            display: default_display(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            eprintln!(
                "Warning: Config file not found. Create one at {:?} to customize settings.",
                config_path
            );
            let config = Self::from_env()?;
            if config.weather.api_key.is_none() {
                eprintln!(
                    "Tip: Set weather.api_key in config.toml or {} to show live weather.",
                    ENV_API_KEY
                );
            }
            return Ok(config);
        }

        let mut config = Self::load_from_path(&config_path)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults with the `SKYCLOCK_*` environment applied on top.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(val) = env::var(ENV_LATITUDE) {
            let lat = val
                .trim()
                .parse::<f64>()
                .map_err(|_| ConfigError::InvalidEnvVar {
                    name: ENV_LATITUDE,
                    value: val.clone(),
                })?;
            self.location.latitude = lat;
            self.location.auto = false;
        }

        if let Ok(val) = env::var(ENV_LONGITUDE) {
            let lon = val
                .trim()
                .parse::<f64>()
                .map_err(|_| ConfigError::InvalidEnvVar {
                    name: ENV_LONGITUDE,
                    value: val.clone(),
                })?;
            self.location.longitude = lon;
            self.location.auto = false;
        }

        if let Ok(val) = env::var(ENV_API_KEY) {
            let key = val.trim();
            if !key.is_empty() {
                self.weather.api_key = Some(key.to_string());
            }
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(-90.0..=90.0).contains(&self.location.latitude) {
            return Err(ConfigError::InvalidLatitude(self.location.latitude));
        }

        if !(-180.0..=180.0).contains(&self.location.longitude) {
            return Err(ConfigError::InvalidLongitude(self.location.longitude));
        }

        self.location.tz()?;

        if self.display.fps == 0 || self.display.fps > MAX_FPS {
            return Err(ConfigError::InvalidFps(self.display.fps));
        }

        if self.display.width == Some(0) || self.display.height == Some(0) {
            return Err(ConfigError::InvalidDimensions {
                width: self.display.width.unwrap_or_default(),
                height: self.display.height.unwrap_or_default(),
            });
        }

        if self.display.width.is_some() != self.display.height.is_some() {
            return Err(ConfigError::PartialDimensions);
        }

        Ok(())
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            source: e,
        })?;

        let value: toml::Value = toml::from_str(&content).map_err(ConfigError::ParseError)?;

        if let Some(loc) = value.get("location") {
            let has_lat = loc.get("latitude").is_some();
            let has_lon = loc.get("longitude").is_some();
            if has_lat && !has_lon {
                eprintln!(
                    "Warning: latitude is set but longitude is missing, defaulting longitude to {}.",
                    default_longitude()
                );
            } else if has_lon && !has_lat {
                eprintln!(
                    "Warning: longitude is set but latitude is missing, defaulting latitude to {}.",
                    default_latitude()
                );
            }
        }

        toml::Value::try_into(value).map_err(ConfigError::ParseError)
    }

    pub fn get_config_dir() -> Result<PathBuf, ConfigError> {
        let config_dir = if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(xdg_config)
        } else {
            dirs::config_dir()
                .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
                .ok_or(ConfigError::NoConfigDir)?
        };

        Ok(config_dir.join("skyclock"))
    }

    pub fn get_config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::get_config_dir()?.join("config.toml"))
    }

    /// Configured log file, or `<cache dir>/skyclock/skyclock.log`.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file.clone().or_else(|| {
            dirs::cache_dir().map(|dir| dir.join("skyclock").join("skyclock.log"))
        })
    }
}
