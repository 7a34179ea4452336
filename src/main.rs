use clap::Parser;
use skyclock::app::App;
use skyclock::config::Config;
use skyclock::geolocation::resolve_location;
use skyclock::logging;
use skyclock::render::{DisplayTarget, TerminalRenderer, VideoDriver};
use skyclock::weather::WeatherClient;
use std::io;
use std::sync::atomic::Ordering;

#[derive(Parser)]
#[command(
    version,
    about = "Fullscreen terminal clock with an animated sky and live weather",
    long_about = None
)]
struct Cli {
    /// Where to draw: `auto` for this terminal or a tty device path such as /dev/tty1
    display: Option<String>,

    /// How pixels map to cells: `halfblock` or `block`
    video_driver: Option<VideoDriver>,

    /// Canvas width in pixels (defaults to the terminal size)
    width: Option<u32>,

    /// Canvas height in pixels (defaults to the terminal size)
    height: Option<u32>,

    /// IANA timezone for the clock, e.g. America/New_York
    timezone: Option<String>,

    /// Postal code to look up the weather for
    zip_code: Option<String>,

    /// Country code for the postal code, e.g. us
    country_code: Option<String>,

    /// OpenWeatherMap API key
    api_key: Option<String>,
}

impl Cli {
    fn apply(self, config: &mut Config) {
        if let Some(display) = self.display {
            config.display.display = display;
        }
        if let Some(driver) = self.video_driver {
            config.display.video_driver = driver;
        }
        if self.width.is_some() {
            config.display.width = self.width;
        }
        if self.height.is_some() {
            config.display.height = self.height;
        }
        if let Some(timezone) = self.timezone {
            config.location.timezone = timezone;
        }
        if let Some(zip_code) = self.zip_code {
            config.weather.zip_code = zip_code;
        }
        if let Some(country_code) = self.country_code {
            config.weather.country_code = country_code;
        }
        if let Some(api_key) = self.api_key {
            config.weather.api_key = Some(api_key);
        }
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let timezone_override = cli.timezone.is_some();

    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            eprintln!("\nContinuing with defaults (Baltimore, America/New_York).");
            eprintln!("\nTo customize, create a config file at:");
            eprintln!("  $XDG_CONFIG_HOME/skyclock/config.toml");
            eprintln!("  or ~/.config/skyclock/config.toml");
            eprintln!("\nExample config.toml:");
            eprintln!("  [weather]");
            eprintln!("  api_key = \"...\"");
            eprintln!("  zip_code = \"21047\"");
            eprintln!();
            Config::from_env().unwrap_or_else(|e| {
                eprintln!("Ignoring environment overrides: {}", e);
                Config::default()
            })
        }
    };
    cli.apply(&mut config);
    if let Err(e) = config.validate() {
        eprintln!("Invalid settings: {}", e);
        std::process::exit(2);
    }

    logging::init(config.log_path().as_deref());
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting skyclock");

    let mut location = resolve_location(&config.location).await;
    if timezone_override {
        if let Ok(tz) = config.location.tz() {
            location.timezone = tz;
        }
    }

    let (client, unavailable_reason) = match WeatherClient::from_config(&config.weather) {
        Ok(client) => (Some(client), String::new()),
        Err(e) => {
            tracing::warn!(kind = e.kind(), "weather client unavailable: {}", e);
            (None, e.to_string())
        }
    };

    let target = DisplayTarget::parse(&config.display.display);
    let mut renderer = TerminalRenderer::new(target, config.display.video_driver)?;
    renderer.init()?;

    let mut app = App::new(
        &config,
        location,
        client,
        unavailable_reason,
        renderer.pixel_size(),
    );

    let shutdown = app.shutdown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received");
            shutdown.store(true, Ordering::Relaxed);
        }
    });

    let result = app.run(&mut renderer).await;

    renderer.cleanup()?;

    if let Err(ref e) = result {
        tracing::error!("display failed: {}", e);
    }
    result
}
