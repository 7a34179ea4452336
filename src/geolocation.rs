use crate::config::LocationConfig;
use crate::error::{ConfigError, GeolocationError};
use crate::http;
use chrono_tz::Tz;
use serde::Deserialize;
use std::time::Duration;

const IPINFO_URL: &str = "https://ipinfo.io/json";
const REQUEST_TIMEOUT_SECS: u64 = 10;
const MAX_RETRIES: u32 = 3;
const INITIAL_RETRY_DELAY_MS: u64 = 500;

#[derive(Deserialize, Debug)]
struct IpInfoResponse {
    loc: String,
    city: Option<String>,
    country: Option<String>,
    timezone: Option<String>,
}

/// Where the clock is. Resolved once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoLocation {
    pub city: String,
    pub country: String,
    pub timezone: Tz,
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoLocation {
    /// Used whenever detection fails and nothing is configured.
    pub fn fallback() -> Self {
        Self {
            city: "Baltimore".to_string(),
            country: "United States".to_string(),
            timezone: chrono_tz::America::New_York,
            latitude: 39.515362,
            longitude: -76.411751,
        }
    }

    /// Location taken verbatim from `[location]`.
    pub fn from_config(config: &LocationConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            city: config.city.clone().unwrap_or_default(),
            country: config.country.clone().unwrap_or_default(),
            timezone: config.tz()?,
            latitude: config.latitude,
            longitude: config.longitude,
        })
    }
}

/// Configured location when `auto` is off, otherwise IP geolocation,
/// falling back to [`GeoLocation::fallback`]. Never fails.
pub async fn resolve_location(config: &LocationConfig) -> GeoLocation {
    if !config.auto {
        match GeoLocation::from_config(config) {
            Ok(location) => return location,
            Err(e) => {
                tracing::warn!(kind = e.kind(), "configured location unusable: {}", e);
                return GeoLocation::fallback();
            }
        }
    }

    match detect_location().await {
        Ok(location) => {
            tracing::info!(
                city = %location.city,
                country = %location.country,
                timezone = %location.timezone,
                "location detected"
            );
            location
        }
        Err(e) => {
            tracing::warn!(kind = e.kind(), "location detection failed: {}", e);
            GeoLocation::fallback()
        }
    }
}

pub async fn detect_location() -> Result<GeoLocation, GeolocationError> {
    with_retries(Duration::from_millis(INITIAL_RETRY_DELAY_MS), fetch_location).await
}

/// Runs `lookup` up to `MAX_RETRIES` times, doubling the delay after each
/// retryable network failure. Other errors are returned at once.
async fn with_retries<F, Fut>(
    initial_delay: Duration,
    mut lookup: F,
) -> Result<GeoLocation, GeolocationError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<GeoLocation, GeolocationError>>,
{
    let mut attempt = 1;
    loop {
        let net_err = match lookup().await {
            Ok(location) => return Ok(location),
            Err(GeolocationError::Unreachable(net_err)) if net_err.is_retryable() => net_err,
            Err(e) => return Err(e),
        };

        if attempt == MAX_RETRIES {
            return Err(GeolocationError::RetriesExhausted {
                attempts: attempt,
                last: net_err,
            });
        }

        let delay = initial_delay * 2_u32.pow(attempt - 1);
        tracing::debug!(
            attempt,
            delay_ms = delay.as_millis() as u64,
            "retrying location lookup: {}",
            net_err
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

async fn fetch_location() -> Result<GeoLocation, GeolocationError> {
    let timeout = Duration::from_secs(REQUEST_TIMEOUT_SECS);
    let client = http::client(timeout).map_err(GeolocationError::Unreachable)?;
    let body = http::get_bytes(&client, IPINFO_URL, IPINFO_URL, timeout)
        .await
        .map_err(GeolocationError::Unreachable)?;

    parse_ipinfo(&body)
}

fn parse_ipinfo(body: &[u8]) -> Result<GeoLocation, GeolocationError> {
    let info: IpInfoResponse =
        serde_json::from_slice(body).map_err(|e| GeolocationError::ParseError(e.to_string()))?;

    let (latitude, longitude) = info.loc.split_once(',').ok_or_else(|| {
        GeolocationError::ParseError("Invalid location format from ipinfo.io".to_string())
    })?;

    let latitude = latitude
        .trim()
        .parse::<f64>()
        .map_err(|_| GeolocationError::ParseError("Invalid latitude format".to_string()))?;

    let longitude = longitude
        .trim()
        .parse::<f64>()
        .map_err(|_| GeolocationError::ParseError("Invalid longitude format".to_string()))?;

    let timezone = info
        .timezone
        .as_deref()
        .ok_or_else(|| GeolocationError::ParseError("Missing timezone".to_string()))?
        .parse::<Tz>()
        .map_err(|_| GeolocationError::ParseError("Unknown timezone".to_string()))?;

    Ok(GeoLocation {
        city: info.city.unwrap_or_default(),
        country: info.country.unwrap_or_default(),
        timezone,
        latitude,
        longitude,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ipinfo() {
        let body = br#"{
            "ip": "203.0.113.7",
            "city": "Bel Air",
            "region": "Maryland",
            "country": "US",
            "loc": "39.5359,-76.3483",
            "timezone": "America/New_York"
        }"#;
        let location = parse_ipinfo(body).unwrap();
        assert_eq!(location.city, "Bel Air");
        assert_eq!(location.country, "US");
        assert_eq!(location.timezone, chrono_tz::America::New_York);
        assert_eq!(location.latitude, 39.5359);
        assert_eq!(location.longitude, -76.3483);
    }

    #[test]
    fn test_parse_ipinfo_bad_loc() {
        let err = parse_ipinfo(br#"{"loc": "nowhere", "timezone": "UTC"}"#).unwrap_err();
        assert_eq!(err.kind(), "ParseError");

        let err = parse_ipinfo(br#"{"loc": "abc,1.0", "timezone": "UTC"}"#).unwrap_err();
        assert_eq!(err.kind(), "ParseError");
    }

    #[test]
    fn test_parse_ipinfo_unknown_timezone() {
        let err = parse_ipinfo(br#"{"loc": "1.0,2.0", "timezone": "Nowhere/Land"}"#).unwrap_err();
        assert_eq!(err.kind(), "ParseError");
    }

    #[test]
    fn test_fallback_location() {
        let location = GeoLocation::fallback();
        assert_eq!(location.city, "Baltimore");
        assert_eq!(location.country, "United States");
        assert_eq!(location.timezone, chrono_tz::America::New_York);
        assert_eq!((location.latitude, location.longitude), (39.515362, -76.411751));
    }

    #[tokio::test]
    async fn test_resolve_uses_config_when_not_auto() {
        let config = LocationConfig {
            auto: false,
            latitude: 48.8566,
            longitude: 2.3522,
            timezone: "Europe/Paris".to_string(),
            city: Some("Paris".to_string()),
            country: Some("France".to_string()),
        };
        let location = resolve_location(&config).await;
        assert_eq!(location.city, "Paris");
        assert_eq!(location.timezone, chrono_tz::Europe::Paris);
        assert_eq!(location.latitude, 48.8566);
    }

    fn timeout() -> GeolocationError {
        GeolocationError::Unreachable(crate::error::NetworkError::Timeout {
            url: IPINFO_URL.to_string(),
            timeout_secs: REQUEST_TIMEOUT_SECS,
        })
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let mut calls = 0;
        let result = with_retries(Duration::from_millis(1), || {
            calls += 1;
            let outcome = if calls < MAX_RETRIES {
                Err(timeout())
            } else {
                Ok(GeoLocation::fallback())
            };
            async move { outcome }
        })
        .await;
        assert_eq!(result.unwrap(), GeoLocation::fallback());
        assert_eq!(calls, MAX_RETRIES);
    }

    #[tokio::test]
    async fn test_retries_exhausted_keeps_last_error() {
        let mut calls = 0;
        let err = with_retries(Duration::from_millis(1), || {
            calls += 1;
            async { Err(timeout()) }
        })
        .await
        .unwrap_err();
        assert_eq!(calls, MAX_RETRIES);
        assert_eq!(err.kind(), "RetriesExhausted");
        assert!(err.to_string().contains("timed out"), "{err}");
    }

    #[tokio::test]
    async fn test_parse_error_is_not_retried() {
        let mut calls = 0;
        let err = with_retries(Duration::from_millis(1), || {
            calls += 1;
            async { Err(GeolocationError::ParseError("bad loc".to_string())) }
        })
        .await
        .unwrap_err();
        assert_eq!(calls, 1);
        assert_eq!(err.kind(), "ParseError");
    }

    #[tokio::test]
    async fn test_resolve_bad_configured_timezone_falls_back() {
        let config = LocationConfig {
            auto: false,
            timezone: "Not/AZone".to_string(),
            ..Default::default()
        };
        assert_eq!(resolve_location(&config).await, GeoLocation::fallback());
    }
}
