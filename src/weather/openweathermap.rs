use super::WeatherProvider;
use super::types::{ConditionReport, WeatherQuery, WeatherSnapshot, WeatherUnits};
use crate::error::{NetworkError, WeatherError};
use crate::http;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

#[derive(Deserialize, Debug)]
struct CurrentWeatherResponse {
    main: MainReadings,
    #[serde(default)]
    wind: Option<WindReadings>,
    #[serde(default)]
    weather: Vec<ConditionEntry>,
}

#[derive(Deserialize, Debug)]
struct MainReadings {
    temp: f64,
    feels_like: f64,
    pressure: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Deserialize, Debug)]
struct WindReadings {
    speed: Option<f64>,
    deg: Option<f64>,
}

#[derive(Deserialize, Debug)]
struct ConditionEntry {
    main: String,
    #[serde(default)]
    description: String,
    icon: Option<String>,
}

/// Current conditions from OpenWeatherMap, looked up by postal code.
pub struct OpenWeatherMapProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    units: WeatherUnits,
    timeout: Duration,
}

impl OpenWeatherMapProvider {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        units: WeatherUnits,
        timeout: Duration,
    ) -> Result<Self, NetworkError> {
        Ok(Self {
            client: http::client(timeout)?,
            base_url: base_url.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            units,
            timeout,
        })
    }

    fn request_url(&self, api_key: &str, query: &WeatherQuery) -> Result<String, WeatherError> {
        let zip = format!("{},{}", query.zip_code, query.country_code);
        url::Url::parse_with_params(
            &self.base_url,
            &[
                ("zip", zip.as_str()),
                ("appid", api_key),
                ("units", self.units.as_query()),
            ],
        )
        .map(String::from)
        .map_err(|_| WeatherError::Network(NetworkError::InvalidUrl(self.base_url.clone())))
    }
}

pub(crate) fn parse_current_weather(body: &[u8]) -> Result<WeatherSnapshot, WeatherError> {
    let response: CurrentWeatherResponse =
        serde_json::from_slice(body).map_err(|e| WeatherError::Parse(e.to_string()))?;

    let (wind_speed, wind_direction) = match response.wind {
        Some(wind) => (wind.speed, wind.deg),
        None => (None, None),
    };

    Ok(WeatherSnapshot {
        temperature: Some(response.main.temp),
        feels_like: Some(response.main.feels_like),
        pressure: response.main.pressure,
        humidity: response.main.humidity,
        wind_speed,
        wind_direction,
        reports: response
            .weather
            .into_iter()
            .map(|entry| ConditionReport {
                keyword: entry.main.to_lowercase(),
                description: entry.description,
                icon_code: entry.icon.filter(|code| !code.is_empty()),
                icon: None,
            })
            .collect(),
    })
}

#[async_trait]
impl WeatherProvider for OpenWeatherMapProvider {
    async fn current_weather(&self, query: &WeatherQuery) -> Result<WeatherSnapshot, WeatherError> {
        let api_key = self.api_key.as_deref().ok_or(WeatherError::MissingApiKey)?;
        let url = self.request_url(api_key, query)?;

        let body = http::get_bytes(&self.client, &url, &self.base_url, self.timeout)
            .await
            .map_err(WeatherError::Network)?;

        parse_current_weather(&body)
    }

    fn name(&self) -> &str {
        "OpenWeatherMap"
    }
}
