use crate::animation::Bounds;
use crate::app_state::AppState;
use crate::config::Config;
use crate::geolocation::GeoLocation;
use crate::hud::{self, HudLayout};
use crate::render::{Canvas, Surface, TerminalRenderer};
use crate::sky::Sky;
use crate::weather::{WeatherClient, WeatherFetch, WeatherQuery};
use chrono::Utc;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Sends each requested query through `client` and reports the outcome.
/// Without a client every request fails with `unavailable_reason`.
pub fn spawn_fetch_worker(
    client: Option<WeatherClient>,
    unavailable_reason: String,
    mut requests: mpsc::Receiver<WeatherQuery>,
    results: mpsc::Sender<WeatherFetch>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(query) = requests.recv().await {
            let fetch = match &client {
                Some(client) => client.fetch(&query).await,
                None => WeatherFetch::Failed {
                    reason: unavailable_reason.clone(),
                },
            };
            if results.send(fetch).await.is_err() {
                break;
            }
        }
    })
}

pub fn is_quit_key(key: &KeyEvent) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Handles input until `deadline`. `next_event` is given the time left and
/// returns `None` once that passes quietly, or `Some(quit)` after one event.
/// It is always called at least once so input is read even on a late frame.
pub fn wait_until<F>(deadline: Instant, mut next_event: F) -> io::Result<bool>
where
    F: FnMut(Duration) -> io::Result<Option<bool>>,
{
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match next_event(remaining)? {
            Some(true) => return Ok(true),
            None => return Ok(false),
            Some(false) if Instant::now() >= deadline => return Ok(false),
            Some(false) => {}
        }
    }
}

pub struct App {
    state: AppState,
    sky: Sky,
    canvas: Canvas,
    fixed_size: Option<(u32, u32)>,
    frame_duration: Duration,
    query: WeatherQuery,
    fetch_pending: bool,
    requests: mpsc::Sender<WeatherQuery>,
    results: mpsc::Receiver<WeatherFetch>,
    shutdown: Arc<AtomicBool>,
}

impl App {
    pub fn new(
        config: &Config,
        location: GeoLocation,
        client: Option<WeatherClient>,
        unavailable_reason: String,
        terminal_size: (u32, u32),
    ) -> Self {
        let fixed_size = match (config.display.width, config.display.height) {
            (Some(w), Some(h)) => Some((w, h)),
            _ => None,
        };
        let (width, height) = fixed_size.unwrap_or(terminal_size);

        let now = Utc::now().with_timezone(&location.timezone);
        let state = AppState::new(
            location,
            config.weather.units,
            Duration::from_secs(config.weather.refresh_interval_secs.max(1)),
            Duration::from_secs(config.display.sky_refresh_secs.max(1)),
            &now,
        );

        let (request_tx, request_rx) = mpsc::channel(1);
        let (result_tx, result_rx) = mpsc::channel(1);
        spawn_fetch_worker(client, unavailable_reason, request_rx, result_tx);

        Self {
            state,
            sky: Sky::new(Bounds::new(width, height)),
            canvas: Canvas::new(width, height),
            fixed_size,
            frame_duration: Duration::from_secs(1) / config.display.fps.max(1),
            query: config.weather.query(),
            fetch_pending: false,
            requests: request_tx,
            results: result_rx,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that stops the loop before the next frame when set.
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.fixed_size.is_some() || (width, height) == (self.canvas.width(), self.canvas.height())
        {
            return;
        }
        tracing::debug!(width, height, "canvas resized");
        self.canvas.resize(width, height);
        self.sky.resize(Bounds::new(width, height));
    }

    fn poll_weather(&mut self) {
        while let Ok(fetch) = self.results.try_recv() {
            self.fetch_pending = false;
            if let Some(reason) = fetch.failure_reason() {
                tracing::warn!("weather unavailable: {}", reason);
            }
            self.state.apply_fetch(fetch);
        }
    }

    fn request_weather(&mut self) {
        if self.fetch_pending {
            tracing::debug!("previous weather request still running");
            return;
        }
        match self.requests.try_send(self.query.clone()) {
            Ok(()) => self.fetch_pending = true,
            Err(e) => tracing::warn!("could not queue weather refresh: {}", e),
        }
    }

    fn draw_frame(&mut self) {
        let now = Utc::now().with_timezone(&self.state.location.timezone);
        if self.state.tick(&now, Instant::now()) {
            self.request_weather();
        }

        let layers = self.state.layers();
        self.sky.update(layers);
        self.sky.render(
            &mut self.canvas,
            self.state.background(),
            layers,
            self.state.moon_phase(),
        );

        hud::draw_icons(&mut self.canvas, self.state.snapshot().icons());
        let layout = HudLayout::compute(
            self.canvas.width(),
            self.canvas.height(),
            &hud::clock_text(&now),
            &hud::date_text(&now),
            self.state.weather_text(),
        );
        layout.draw(&mut self.canvas);
    }

    /// Returns `true` when the user asked to quit.
    fn handle_event(&mut self, event: Event, renderer: &mut TerminalRenderer) -> io::Result<bool> {
        match event {
            Event::Key(key) => return Ok(is_quit_key(&key)),
            Event::Resize(cols, rows) => {
                renderer.manual_resize(cols, rows)?;
                let (w, h) = renderer.pixel_size();
                self.resize(w, h);
            }
            _ => {}
        }
        Ok(false)
    }

    pub async fn run(&mut self, renderer: &mut TerminalRenderer) -> io::Result<()> {
        tracing::info!(
            width = self.canvas.width(),
            height = self.canvas.height(),
            city = %self.state.location.city,
            timezone = %self.state.location.timezone,
            "clock started"
        );

        loop {
            let frame_start = Instant::now();
            if self.shutdown.load(Ordering::Relaxed) {
                break;
            }

            self.poll_weather();
            self.draw_frame();
            renderer.present(&self.canvas)?;
            renderer.flush()?;

            let deadline = frame_start + self.frame_duration;
            if renderer.is_interactive() {
                let quit = wait_until(deadline, |timeout| {
                    if !event::poll(timeout)? {
                        return Ok(None);
                    }
                    let event = event::read()?;
                    self.handle_event(event, renderer).map(Some)
                })?;
                if quit {
                    break;
                }
            } else {
                tokio::time::sleep(deadline.saturating_duration_since(Instant::now())).await;
            }
        }

        tracing::info!("clock stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_quit_keys() {
        assert!(is_quit_key(&key(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(is_quit_key(&key(KeyCode::Char('Q'), KeyModifiers::SHIFT)));
        assert!(is_quit_key(&key(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(is_quit_key(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!is_quit_key(&key(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(!is_quit_key(&key(KeyCode::Enter, KeyModifiers::NONE)));
    }

    #[test]
    fn test_release_is_ignored() {
        let mut release = key(KeyCode::Char('q'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert!(!is_quit_key(&release));
    }

    #[test]
    fn test_wait_keeps_frame_budget_through_events() {
        let budget = Duration::from_millis(40);
        let start = Instant::now();
        let mut calls = 0;
        let quit = wait_until(start + budget, |_| {
            calls += 1;
            std::thread::sleep(Duration::from_millis(2));
            Ok(Some(false))
        })
        .unwrap();
        assert!(!quit);
        assert!(start.elapsed() >= budget);
        assert!(calls > 1);
    }

    #[test]
    fn test_wait_stops_on_quit() {
        let mut calls = 0;
        let quit = wait_until(Instant::now() + Duration::from_secs(5), |_| {
            calls += 1;
            Ok(Some(calls == 3))
        })
        .unwrap();
        assert!(quit);
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_wait_polls_once_when_frame_is_late() {
        let mut timeouts = Vec::new();
        let quit = wait_until(Instant::now() - Duration::from_millis(5), |timeout| {
            timeouts.push(timeout);
            Ok(None)
        })
        .unwrap();
        assert!(!quit);
        assert_eq!(timeouts, vec![Duration::ZERO]);
    }

    #[tokio::test]
    async fn test_worker_without_client_reports_failure() {
        let (req_tx, req_rx) = mpsc::channel(1);
        let (res_tx, mut res_rx) = mpsc::channel(1);
        let handle = spawn_fetch_worker(None, "no client".to_string(), req_rx, res_tx);

        req_tx
            .send(WeatherQuery::new("21047", "us"))
            .await
            .unwrap();
        let fetch = res_rx.recv().await.unwrap();
        assert_eq!(fetch.failure_reason(), Some("no client"));

        drop(req_tx);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_app_requests_weather_on_first_frame() {
        let config = Config::default();
        let mut app = App::new(
            &config,
            GeoLocation::fallback(),
            None,
            "offline".to_string(),
            (80, 48),
        );
        app.draw_frame();
        assert!(app.fetch_pending);
        assert_eq!(app.canvas.width(), 80);

        let fetch = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                app.poll_weather();
                if !app.fetch_pending {
                    break;
                }
                tokio::task::yield_now().await;
            }
        })
        .await;
        assert!(fetch.is_ok());
        assert_eq!(app.state.weather_text(), hud::WEATHER_UNAVAILABLE);
        assert_eq!(app.state.last_failure(), Some("offline"));
    }

    #[tokio::test]
    async fn test_resize_follows_terminal_unless_fixed() {
        let config = Config::default();
        let mut app = App::new(&config, GeoLocation::fallback(), None, String::new(), (80, 48));
        app.resize(120, 60);
        assert_eq!((app.canvas.width(), app.canvas.height()), (120, 60));
        assert_eq!(app.sky.bounds(), Bounds::new(120, 60));

        let mut config = Config::default();
        config.display.width = Some(800);
        config.display.height = Some(480);
        let mut app = App::new(&config, GeoLocation::fallback(), None, String::new(), (80, 48));
        app.resize(120, 60);
        assert_eq!((app.canvas.width(), app.canvas.height()), (800, 480));
    }
}
