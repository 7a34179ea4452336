use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine a configuration directory")]
    NoConfigDir,

    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Latitude {0} is out of range (-90 to 90)")]
    InvalidLatitude(f64),

    #[error("Longitude {0} is out of range (-180 to 180)")]
    InvalidLongitude(f64),

    #[error("Unknown timezone '{0}'")]
    InvalidTimezone(String),

    #[error("Frame rate {0} is out of range (1 to 240)")]
    InvalidFps(u32),

    #[error("Display dimensions must be non-zero, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Display width and height must be set together")]
    PartialDimensions,

    #[error("Invalid value '{value}' for environment variable {name}")]
    InvalidEnvVar { name: &'static str, value: String },
}

impl ConfigError {
    pub fn kind(&self) -> &'static str {
        match self {
            ConfigError::NoConfigDir => "NoConfigDir",
            ConfigError::ReadError { .. } => "ReadError",
            ConfigError::ParseError(_) => "ParseError",
            ConfigError::InvalidLatitude(_) => "InvalidLatitude",
            ConfigError::InvalidLongitude(_) => "InvalidLongitude",
            ConfigError::InvalidTimezone(_) => "InvalidTimezone",
            ConfigError::InvalidFps(_) => "InvalidFps",
            ConfigError::InvalidDimensions { .. } => "InvalidDimensions",
            ConfigError::PartialDimensions => "PartialDimensions",
            ConfigError::InvalidEnvVar { .. } => "InvalidEnvVar",
        }
    }
}

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Failed to create HTTP client: {0}")]
    ClientCreation(#[source] reqwest::Error),

    #[error("Request to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    #[error("Could not connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Invalid response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid URL '{0}'")]
    InvalidUrl(String),
}

impl NetworkError {
    pub fn from_reqwest(error: reqwest::Error, url: &str, timeout_secs: u64) -> Self {
        let url = url.to_string();
        if error.is_timeout() {
            NetworkError::Timeout { url, timeout_secs }
        } else if let Some(status) = error.status() {
            NetworkError::Status {
                url,
                status: status.as_u16(),
            }
        } else if error.is_connect() || error.is_request() {
            NetworkError::Connect { url, source: error }
        } else {
            NetworkError::Body { url, source: error }
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            NetworkError::Timeout { .. } | NetworkError::Connect { .. } => true,
            NetworkError::Status { status, .. } => *status >= 500 || *status == 429,
            NetworkError::ClientCreation(_)
            | NetworkError::Body { .. }
            | NetworkError::InvalidUrl(_) => false,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            NetworkError::ClientCreation(_) => "ClientCreation",
            NetworkError::Timeout { .. } => "Timeout",
            NetworkError::Connect { .. } => "Connect",
            NetworkError::Status { .. } => "Status",
            NetworkError::Body { .. } => "Body",
            NetworkError::InvalidUrl(_) => "InvalidUrl",
        }
    }
}

#[derive(Debug, Error)]
pub enum GeolocationError {
    #[error("Geolocation service unreachable: {0}")]
    Unreachable(#[source] NetworkError),

    #[error("Could not parse geolocation response: {0}")]
    ParseError(String),

    #[error("Geolocation failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: NetworkError,
    },
}

impl GeolocationError {
    pub fn kind(&self) -> &'static str {
        match self {
            GeolocationError::Unreachable(_) => "Unreachable",
            GeolocationError::ParseError(_) => "ParseError",
            GeolocationError::RetriesExhausted { .. } => "RetriesExhausted",
        }
    }
}

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Weather service unreachable: {0}")]
    Network(#[source] NetworkError),

    #[error("Unexpected weather payload: {0}")]
    Parse(String),

    #[error("No API key configured for the weather service")]
    MissingApiKey,
}

impl WeatherError {
    pub fn kind(&self) -> &'static str {
        match self {
            WeatherError::Network(_) => "Network",
            WeatherError::Parse(_) => "Parse",
            WeatherError::MissingApiKey => "MissingApiKey",
        }
    }
}

#[derive(Debug, Error)]
pub enum IconError {
    #[error("Icon download failed: {0}")]
    Network(#[source] NetworkError),

    #[error("Icon could not be decoded: {0}")]
    Decode(#[from] image::ImageError),
}

impl IconError {
    pub fn kind(&self) -> &'static str {
        match self {
            IconError::Network(_) => "Network",
            IconError::Decode(_) => "Decode",
        }
    }
}
