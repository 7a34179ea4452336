pub mod icons;
pub mod openweathermap;
pub mod types;

use crate::config::WeatherConfig;
use crate::error::{IconError, NetworkError, WeatherError};
use async_trait::async_trait;
use image::RgbaImage;
use std::sync::Arc;
use std::time::Duration;

pub use icons::HttpIconProvider;
pub use openweathermap::OpenWeatherMapProvider;
pub use types::{
    ConditionReport, WeatherCondition, WeatherFetch, WeatherQuery, WeatherSnapshot, WeatherUnits,
};

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current_weather(&self, query: &WeatherQuery) -> Result<WeatherSnapshot, WeatherError>;

    fn name(&self) -> &str;
}

#[async_trait]
pub trait IconProvider: Send + Sync {
    async fn fetch_icon(&self, code: &str) -> Result<RgbaImage, IconError>;
}

/// Fetches a snapshot and its icons, turning every failure into a
/// [`WeatherFetch::Failed`] or a missing icon.
#[derive(Clone)]
pub struct WeatherClient {
    provider: Arc<dyn WeatherProvider>,
    icons: Option<Arc<dyn IconProvider>>,
}

impl WeatherClient {
    pub fn new(provider: Arc<dyn WeatherProvider>, icons: Option<Arc<dyn IconProvider>>) -> Self {
        Self { provider, icons }
    }

    /// OpenWeatherMap data and icons configured from `[weather]`.
    pub fn from_config(config: &WeatherConfig) -> Result<Self, NetworkError> {
        let provider = OpenWeatherMapProvider::new(
            config.base_url.clone(),
            config.api_key.clone(),
            config.units,
            Duration::from_secs(config.request_timeout_secs),
        )?;
        let icons = HttpIconProvider::new(
            config.icon_base_url.clone(),
            Duration::from_secs(config.icon_timeout_secs),
        )?;
        Ok(Self::new(Arc::new(provider), Some(Arc::new(icons))))
    }

    pub async fn fetch(&self, query: &WeatherQuery) -> WeatherFetch {
        let mut snapshot = match self.provider.current_weather(query).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(
                    provider = self.provider.name(),
                    kind = e.kind(),
                    "weather fetch failed: {}",
                    e
                );
                return WeatherFetch::Failed {
                    reason: e.to_string(),
                };
            }
        };

        if let Some(icons) = &self.icons {
            for report in &mut snapshot.reports {
                let Some(code) = report.icon_code.as_deref() else {
                    continue;
                };
                match icons.fetch_icon(code).await {
                    Ok(icon) => report.icon = Some(icon),
                    Err(e) => tracing::warn!(code, kind = e.kind(), "icon unavailable: {}", e),
                }
            }
        }

        tracing::info!(
            provider = self.provider.name(),
            temperature = ?snapshot.temperature,
            condition = ?snapshot.primary_condition(),
            "weather updated"
        );
        WeatherFetch::Fetched(snapshot)
    }
}
