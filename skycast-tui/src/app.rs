//! The dashboard loop.
//!
//! `App` owns all mutable state. Everything that changes it arrives as an
//! [`AppMessage`] over one mpsc channel: key presses from the input pump,
//! the startup location resolution, and the two fetch completions. The
//! receiving loop is the only mutator, so no locks are needed.
//!
//! A location change spawns the current-conditions and forecast fetches as
//! two independent tasks. Neither waits for the other, in-flight requests
//! are not cancelled on a newer change, and completions apply in arrival
//! order (last writer wins). A failed fetch sends nothing: the previous
//! state keeps rendering and the error goes to the log stream.

use std::io;
use std::sync::Arc;

use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use tokio::sync::mpsc;
use tracing::{info, warn};

use skycast_core::{
    CurrentConditions, ForecastEntry, IpLocationSource, WeatherProvider, resolve_city,
};

use crate::ui;

#[derive(Debug)]
pub enum AppMessage {
    Key(KeyEvent),
    Resize,
    LocationResolved(String),
    CurrentUpdated(CurrentConditions),
    ForecastUpdated(Vec<ForecastEntry>),
}

pub struct App {
    provider: Arc<dyn WeatherProvider>,
    geocode_key: Option<String>,
    initial_location: Option<String>,

    pub current: Option<CurrentConditions>,
    pub forecast: Vec<ForecastEntry>,
    pub location: String,
    pub show_input: bool,
    pub input: String,
    pub scroll: u16,
    /// Height of the scrollable panel as last drawn; one scroll step.
    pub viewport_height: u16,

    quit: bool,
    tx: mpsc::UnboundedSender<AppMessage>,
    rx: mpsc::UnboundedReceiver<AppMessage>,
}

impl App {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        geocode_key: Option<String>,
        initial_location: Option<String>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            provider,
            geocode_key,
            initial_location,
            current: None,
            forecast: Vec::new(),
            location: String::new(),
            show_input: false,
            input: String::new(),
            scroll: 0,
            viewport_height: 0,
            quit: false,
            tx,
            rx,
        }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        spawn_input_pump(self.tx.clone());
        self.startup();

        let result = self.event_loop(&mut terminal).await;

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        while !self.quit {
            terminal.draw(|f| ui::render(f, self))?;

            let Some(msg) = self.rx.recv().await else {
                break;
            };
            self.handle_message(msg);

            // Drain whatever else queued up before the next draw.
            while let Ok(msg) = self.rx.try_recv() {
                self.handle_message(msg);
            }
        }
        Ok(())
    }

    /// One-shot startup location resolution. An explicit `--location`
    /// bypasses detection exactly like manual entry would.
    fn startup(&mut self) {
        if let Some(location) = self.initial_location.take() {
            self.set_location(location);
        } else if let Some(key) = self.geocode_key.clone() {
            let tx = self.tx.clone();
            tokio::spawn(async move {
                let source = IpLocationSource::new();
                if let Some(city) = resolve_city(&source, &key).await {
                    let _ = tx.send(AppMessage::LocationResolved(city));
                }
            });
        }
    }

    pub fn handle_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::Key(key) => self.handle_key(key),
            AppMessage::Resize => {}
            AppMessage::LocationResolved(city) => {
                info!("Location resolved to {city:?}");
                self.set_location(city);
            }
            AppMessage::CurrentUpdated(conditions) => self.current = Some(conditions),
            AppMessage::ForecastUpdated(entries) => self.forecast = entries,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.show_input {
            match key.code {
                KeyCode::Enter => {
                    let typed = std::mem::take(&mut self.input);
                    self.show_input = false;
                    self.set_location(typed);
                }
                KeyCode::Esc => self.show_input = false,
                KeyCode::Backspace => {
                    self.input.pop();
                }
                KeyCode::Char(c) => self.input.push(c),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char('m') => {
                self.show_input = true;
                self.input = self.location.clone();
            }
            KeyCode::PageDown => {
                self.scroll = self.scroll.saturating_add(self.viewport_height);
            }
            KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_sub(self.viewport_height);
            }
            _ => {}
        }
    }

    /// Overwrite the location and kick off both fetches. Re-submitting an
    /// unchanged value simply refetches; state is replaced wholesale either
    /// way, so nothing accumulates.
    pub fn set_location(&mut self, location: String) {
        self.location = location;
        self.spawn_fetches();
    }

    fn spawn_fetches(&self) {
        let location = self.location.clone();
        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            match provider.current(&location).await {
                Ok(conditions) => {
                    let _ = tx.send(AppMessage::CurrentUpdated(conditions));
                }
                Err(e) => warn!("Current-conditions fetch for {location:?} failed: {e:#}"),
            }
        });

        let location = self.location.clone();
        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            match provider.forecast(&location).await {
                Ok(entries) => {
                    let _ = tx.send(AppMessage::ForecastUpdated(entries));
                }
                Err(e) => warn!("Forecast fetch for {location:?} failed: {e:#}"),
            }
        });
    }
}

/// Forward terminal events into the message channel. Runs on a blocking
/// thread; exits once the receiving side is gone.
fn spawn_input_pump(tx: mpsc::UnboundedSender<AppMessage>) {
    tokio::task::spawn_blocking(move || {
        loop {
            let msg = match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => AppMessage::Key(key),
                Ok(Event::Resize(_, _)) => AppMessage::Resize,
                Ok(_) => continue,
                Err(e) => {
                    warn!("Terminal event read failed: {e}");
                    break;
                }
            };
            if tx.send(msg).is_err() {
                break;
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use ratatui::crossterm::event::KeyModifiers;
    use skycast_core::{SunTimes, Wind};
    use std::time::Duration;

    #[derive(Debug)]
    struct StubProvider;

    #[async_trait]
    impl WeatherProvider for StubProvider {
        async fn current(&self, location: &str) -> anyhow::Result<CurrentConditions> {
            Ok(CurrentConditions {
                place_name: location.to_string(),
                observed_at: 1_700_000_000,
                category: "Clear".into(),
                temperature_c: Some(21.4),
                wind: Some(Wind { speed_mps: 3.0, direction_deg: Some(0.0) }),
                sun: Some(SunTimes { sunrise: 1_699_970_000, sunset: 1_700_005_000 }),
            })
        }

        async fn forecast(&self, _location: &str) -> anyhow::Result<Vec<ForecastEntry>> {
            Ok((0..10)
                .map(|i| ForecastEntry {
                    at: 1_700_000_000 + i * 10_800,
                    temperature_c: 10.0,
                    category: "Clouds".into(),
                })
                .collect())
        }
    }

    #[derive(Debug)]
    struct FailingProvider;

    #[async_trait]
    impl WeatherProvider for FailingProvider {
        async fn current(&self, _location: &str) -> anyhow::Result<CurrentConditions> {
            Err(anyhow!("network down"))
        }

        async fn forecast(&self, _location: &str) -> anyhow::Result<Vec<ForecastEntry>> {
            Err(anyhow!("network down"))
        }
    }

    fn app_with(provider: Arc<dyn WeatherProvider>) -> App {
        App::new(provider, None, None)
    }

    fn press(code: KeyCode) -> AppMessage {
        AppMessage::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    async fn drain(app: &mut App, n: usize) {
        for _ in 0..n {
            let msg = app.rx.recv().await.expect("message");
            app.handle_message(msg);
        }
    }

    #[tokio::test]
    async fn location_change_completes_both_fetches() {
        let mut app = app_with(Arc::new(StubProvider));

        app.set_location("Paris".into());
        drain(&mut app, 2).await;

        assert_eq!(app.location, "Paris");
        let current = app.current.as_ref().expect("current conditions");
        assert_eq!(current.place_name, "Paris");
        assert_eq!(app.forecast.len(), 10);
    }

    #[tokio::test]
    async fn refetching_the_same_location_replaces_state() {
        let mut app = app_with(Arc::new(StubProvider));

        app.set_location("Paris".into());
        drain(&mut app, 2).await;
        app.set_location("Paris".into());
        drain(&mut app, 2).await;

        // Wholesale replacement: still 10 entries, not 20.
        assert_eq!(app.forecast.len(), 10);
    }

    #[tokio::test]
    async fn failed_fetches_leave_prior_state_in_place() {
        let mut app = app_with(Arc::new(FailingProvider));

        app.set_location("Atlantis".into());
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(app.rx.try_recv().is_err());
        assert!(app.current.is_none());
        assert!(app.forecast.is_empty());
    }

    #[tokio::test]
    async fn no_geocode_key_means_no_location_and_no_fetch() {
        let mut app = app_with(Arc::new(StubProvider));

        app.startup();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(app.rx.try_recv().is_err());
        assert_eq!(app.location, "");
        assert!(app.current.is_none());
    }

    #[tokio::test]
    async fn menu_key_toggles_input_prefilled_with_location() {
        let mut app = app_with(Arc::new(StubProvider));
        app.location = "Paris".into();

        app.handle_message(press(KeyCode::Char('m')));
        assert!(app.show_input);
        assert_eq!(app.input, "Paris");

        app.handle_message(press(KeyCode::Esc));
        assert!(!app.show_input);
        assert_eq!(app.location, "Paris");
    }

    #[tokio::test]
    async fn typing_and_enter_submits_a_new_location() {
        let mut app = app_with(Arc::new(StubProvider));

        app.handle_message(press(KeyCode::Char('m')));
        for c in "Oslo".chars() {
            app.handle_message(press(KeyCode::Char(c)));
        }
        app.handle_message(press(KeyCode::Enter));

        assert!(!app.show_input);
        assert_eq!(app.location, "Oslo");
        drain(&mut app, 2).await;
        assert_eq!(app.current.as_ref().map(|c| c.place_name.as_str()), Some("Oslo"));
    }

    #[tokio::test]
    async fn page_keys_scroll_by_one_viewport_height() {
        let mut app = app_with(Arc::new(StubProvider));
        app.viewport_height = 20;

        app.handle_message(press(KeyCode::PageDown));
        app.handle_message(press(KeyCode::PageDown));
        assert_eq!(app.scroll, 40);

        app.handle_message(press(KeyCode::PageUp));
        assert_eq!(app.scroll, 20);
        app.handle_message(press(KeyCode::PageUp));
        app.handle_message(press(KeyCode::PageUp));
        assert_eq!(app.scroll, 0);
    }

    #[tokio::test]
    async fn quit_key_ends_the_loop() {
        let mut app = app_with(Arc::new(StubProvider));
        app.handle_message(press(KeyCode::Char('q')));
        assert!(app.quit);
    }
}
